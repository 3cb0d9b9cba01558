//! # Length-prefixed payload extraction
//!
//! Inbound connection data arrives framed as `+IPD,<length>:<payload>`. The
//! extractor announces the length it found, allocates an owned region bounded
//! by the caller's cap and copies the payload out of the stream. Payload
//! beyond the cap is read and discarded, so the channel stays aligned with
//! whatever the radio sends next even when the caller keeps only a prefix.
//!
//! [Adapter::receive_http_payload](crate::adapter::Adapter::receive_http_payload)
//! applies the same machinery to an HTTP response, keyed on its
//! `Content-Length` header instead of the `+IPD` marker.
//!
//! ## Example
//!
//! ```
//! use esp8266_lite::adapter::Adapter;
//! use esp8266_lite::example::{ExampleClock, ExampleSerialPort};
//!
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(ExampleSerialPort::new(), ExampleClock::default());
//!
//! // Connection is already open; send a raw request and collect the body
//! adapter.write_bytes(b"GET / HTTP/1.0\r\n\r\n").unwrap();
//!
//! let body = adapter.receive_http_payload(64).unwrap().unwrap();
//! assert_eq!(b"hello", body.data());
//! ```

use crate::adapter::{Adapter, Error};
use crate::buffer::CaptureBuffer;
use crate::responses;
use crate::scan::{leading_decimal, Deadline, ScanResult};
use alloc::vec;
use alloc::vec::Vec;
use embedded_io::{Read, ReadReady, Write};
use fugit::TimerDurationU32;
use fugit_timer::Timer;

/// Digits accepted in a `+IPD` length field, enough for the 2048 byte
/// maximum frame the radio produces
const PACKET_LENGTH_DIGITS: usize = 5;

/// Digits accepted in a `Content-Length` header value
const CONTENT_LENGTH_DIGITS: usize = 16;

/// Owned payload region handed to the caller.
///
/// The region is allocated zero filled with one spare byte behind the data,
/// so [Packet::data] is always followed by a NUL within the allocation.
/// Dropping the packet releases the region.
#[derive(Debug, PartialEq, Eq)]
pub struct Packet {
    region: Vec<u8>,
    filled: usize,
}

impl Packet {
    pub(crate) fn zeroed(size: usize) -> Self {
        Self {
            region: vec![0; size],
            filled: 0,
        }
    }

    /// Stores a payload byte if a data slot is left, silently drops it otherwise
    pub(crate) fn push_capped(&mut self, byte: u8) {
        if self.filled + 1 < self.region.len() {
            self.region[self.filled] = byte;
            self.filled += 1;
        }
    }

    /// Payload bytes captured before the cap or the deadline cut the copy short
    pub fn data(&self) -> &[u8] {
        &self.region[..self.filled]
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Size of the backing region including the terminator slot
    pub fn allocated_size(&self) -> usize {
        self.region.len()
    }

    /// Releases the backing region, data bytes first, zero filled behind them
    pub fn into_inner(self) -> Vec<u8> {
        self.region
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}

impl<S, C, const TIMER_HZ: u32> Adapter<S, C, TIMER_HZ>
where
    S: Read + ReadReady + Write,
    C: Timer<TIMER_HZ>,
{
    /// Receives one `+IPD` framed packet within the configured connect window.
    ///
    /// See [Adapter::receive_packet_within].
    pub fn receive_packet(&mut self, max_allocate: usize) -> Result<Option<Packet>, Error<S::Error>> {
        self.receive_packet_within(max_allocate, self.timeouts.connect)
    }

    /// Receives one `+IPD` framed packet.
    ///
    /// Waits for the packet marker, reads the decimal length field and copies
    /// at most `max_allocate - 1` payload bytes into an owned region. Surplus
    /// payload is read and discarded so the channel stays aligned with the
    /// next response. `Ok(None)` means no packet arrived intact during the
    /// window, which on an idle connection is the normal case.
    ///
    /// `window` bounds the whole operation measured from entry. If it expires
    /// in the middle of the payload the packet is returned partially filled
    /// and the unread payload tail stays on the channel.
    pub fn receive_packet_within(
        &mut self,
        max_allocate: usize,
        window: TimerDurationU32<TIMER_HZ>,
    ) -> Result<Option<Packet>, Error<S::Error>> {
        let deadline = Deadline::after(self.clock.now(), window);

        if self.wait_for_token(responses::PACKET_MARKER, self.timeouts.connect)? != ScanResult::Success {
            return Ok(None);
        }

        let mut digits = [0; PACKET_LENGTH_DIGITS];
        let length = match self.decimal_field(&mut digits, b':')? {
            Some(length) => length,
            None => return Ok(None),
        };

        Ok(Some(self.collect_payload(length, max_allocate, &deadline)?))
    }

    /// Receives an HTTP response body within the configured connect window.
    ///
    /// See [Adapter::receive_http_payload_within].
    pub fn receive_http_payload(&mut self, max_allocate: usize) -> Result<Option<Packet>, Error<S::Error>> {
        self.receive_http_payload_within(max_allocate, self.timeouts.connect)
    }

    /// Receives the body of an HTTP response, keyed on its `Content-Length`
    /// header.
    ///
    /// Headers are consumed and discarded up to the blank separator line, then
    /// the body is collected like a packet payload: capped at
    /// `max_allocate - 1` bytes, surplus drained. `Ok(None)` means no response
    /// with a `Content-Length` header and a header terminator arrived during
    /// the window.
    pub fn receive_http_payload_within(
        &mut self,
        max_allocate: usize,
        window: TimerDurationU32<TIMER_HZ>,
    ) -> Result<Option<Packet>, Error<S::Error>> {
        let deadline = Deadline::after(self.clock.now(), window);

        if self.wait_for_token(responses::CONTENT_LENGTH_HEADER, self.timeouts.connect)? != ScanResult::Success {
            return Ok(None);
        }

        let mut digits = [0; CONTENT_LENGTH_DIGITS];
        let length = match self.decimal_field(&mut digits, b'\r')? {
            Some(length) => length,
            None => return Ok(None),
        };

        // The body starts behind the header separator
        if self.wait_for_token(responses::HEADER_END, self.timeouts.connect)? != ScanResult::Success {
            return Ok(None);
        }

        Ok(Some(self.collect_payload(length, max_allocate, &deadline)?))
    }

    /// Captures a decimal length field up to `delimiter`.
    ///
    /// Any capture outcome other than success discredits the framing, so the
    /// whole packet is abandoned with `None`.
    fn decimal_field(&mut self, digits: &mut [u8], delimiter: u8) -> Result<Option<usize>, Error<S::Error>> {
        let mut field = CaptureBuffer::new(digits);
        if self.copy_until(&mut field, delimiter, self.timeouts.command)? != ScanResult::Success {
            return Ok(None);
        }

        Ok(Some(leading_decimal(field.as_bytes())))
    }

    /// Copies up to the allocation cap and drains the rest of `length` payload bytes
    pub(crate) fn collect_payload(
        &mut self,
        length: usize,
        max_allocate: usize,
        deadline: &Deadline<TIMER_HZ>,
    ) -> Result<Packet, Error<S::Error>> {
        // The reported length wins as long as it stays under the caller's
        // cap; one slot is always reserved for the trailing NUL.
        let size = if max_allocate > length {
            length + 1
        } else {
            max_allocate.max(1)
        };

        // Stays defined when the length field saturated to usize::MAX
        #[cfg(feature = "log")]
        if size <= length {
            log::debug!("keeping {} of {} payload bytes", size - 1, length);
        }

        let mut packet = Packet::zeroed(size);

        for _ in 0..length {
            let byte = loop {
                if deadline.reached(self.clock.now()) {
                    return Ok(packet);
                }

                if let Some(byte) = self.poll_byte()? {
                    break byte;
                }
            };

            packet.push_capped(byte);
        }

        Ok(packet)
    }
}
