//! # Bounded field capture
//!
//! [CaptureBuffer] wraps a caller owned byte slice and enforces the capture
//! rules in one place: data never grows past `capacity - 1` bytes, and the
//! buffer carries a NUL terminator behind the data on every exit path of
//! [copy_until](crate::adapter::Adapter::copy_until). The last slice byte is
//! reserved for that terminator, so a slice of capacity N holds at most
//! N - 1 data bytes and a zero or one byte slice cannot hold data at all.

/// Bounded view over a caller owned capture region
pub struct CaptureBuffer<'a> {
    buffer: &'a mut [u8],

    /// Next buffer index to store a data byte at
    position: usize,
}

impl<'a> CaptureBuffer<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Appends one data byte.
    ///
    /// Returns the byte back untouched if only the terminator slot is left.
    pub fn push(&mut self, byte: u8) -> Result<(), u8> {
        if self.position + 1 >= self.buffer.len() {
            return Err(byte);
        }

        self.buffer[self.position] = byte;
        self.position += 1;
        Ok(())
    }

    /// True once the data region (capacity minus the terminator slot) is filled
    pub fn is_full(&self) -> bool {
        self.position + 1 >= self.buffer.len()
    }

    /// Writes the NUL terminator behind the captured data.
    ///
    /// A zero capacity buffer has no terminator slot and stays untouched.
    pub fn terminate(&mut self) {
        if let Some(slot) = self.buffer.get_mut(self.position) {
            *slot = 0;
        }
    }

    /// Captured data without the terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Captured data as text, None if it is not valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// Number of data bytes captured so far
    pub fn len(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Size of the underlying region including the terminator slot
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Resets the capture for reuse, previously stored bytes stay in place
    pub fn clear(&mut self) {
        self.position = 0;
    }
}
