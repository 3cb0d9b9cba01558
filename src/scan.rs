//! # Response scanning primitives
//!
//! All response handling is built on four byte-at-a-time scanners:
//!
//! * [Adapter::wait_for_token]: recognizes a single response phrase
//! * [Adapter::wait_for_either]: races a confirmation phrase against a rejection phrase
//! * [Adapter::skip_until]: discards the stream up to a delimiter
//! * [Adapter::copy_until]: captures a delimited field into a bounded buffer
//!
//! The radio is pushing bytes while we scan, so every primitive consumes the
//! stream as it goes and never rewinds. Each call is bounded by a response
//! window measured against the adapter clock; an expired window yields
//! [ScanResult::Timeout], never an error, so callers decide how severe a
//! silent radio is.
//!
//! The primitives are public so that commands this driver does not model can
//! be layered on top using [Adapter::write_bytes] plus a matching scan.

use crate::adapter::{Adapter, Error};
use crate::buffer::CaptureBuffer;
use embedded_io::{Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;

/// Outcome of a single scan over the response stream
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanResult {
    /// The expected phrase or delimiter arrived in full
    Success,
    /// The rejection phrase completed first
    Failure,
    /// The response window elapsed without a match
    Timeout,
    /// The capture buffer filled up before the delimiter arrived
    LengthExceeded,
}

/// Incremental matching state for one response phrase.
///
/// Holds the count of phrase bytes matched so far. A mismatching stream byte
/// resets the cursor and is dropped without being re-checked against the
/// phrase start, so overlapping occurrences sharing a prefix can be missed.
/// Response phrases end in CRLF and do not self-overlap in practice.
pub(crate) struct TokenCursor<'a> {
    token: &'a [u8],
    matched: usize,
}

impl<'a> TokenCursor<'a> {
    /// The token must be non-empty; callers treat empty tokens as already matched.
    pub(crate) fn new(token: &'a [u8]) -> Self {
        Self { token, matched: 0 }
    }

    /// Feeds one stream byte, true once the whole token has been seen.
    pub(crate) fn advance(&mut self, byte: u8) -> bool {
        if byte == self.token[self.matched] {
            self.matched += 1;
            return self.matched == self.token.len();
        }

        self.matched = 0;
        false
    }
}

/// Absolute expiry bounding one blocking operation
pub(crate) struct Deadline<const TIMER_HZ: u32> {
    expires_at: TimerInstantU32<TIMER_HZ>,
}

impl<const TIMER_HZ: u32> Deadline<TIMER_HZ> {
    pub(crate) fn after(now: TimerInstantU32<TIMER_HZ>, window: TimerDurationU32<TIMER_HZ>) -> Self {
        Self { expires_at: now + window }
    }

    /// True once the window has fully elapsed
    pub(crate) fn reached(&self, now: TimerInstantU32<TIMER_HZ>) -> bool {
        now >= self.expires_at
    }
}

/// Parses the leading decimal digits of a captured field.
///
/// Digits stop at the first non-digit byte. A field without any leading
/// digit yields 0, indistinguishable from a genuine zero. Values beyond
/// the usize range saturate.
pub(crate) fn leading_decimal(field: &[u8]) -> usize {
    let mut value: usize = 0;

    for &byte in field {
        if !byte.is_ascii_digit() {
            break;
        }

        value = value.saturating_mul(10).saturating_add((byte - b'0') as usize);
    }

    value
}

impl<S, C, const TIMER_HZ: u32> Adapter<S, C, TIMER_HZ>
where
    S: Read + ReadReady + Write,
    C: Timer<TIMER_HZ>,
{
    /// Consumes stream bytes until `token` has arrived in full or the window elapses.
    ///
    /// On [ScanResult::Success] the stream is positioned directly behind the
    /// matched token. On [ScanResult::Timeout] every byte that arrived during
    /// the window has been consumed and discarded. An empty token matches
    /// immediately without touching the stream.
    pub fn wait_for_token(
        &mut self,
        token: &[u8],
        window: TimerDurationU32<TIMER_HZ>,
    ) -> Result<ScanResult, Error<S::Error>> {
        if token.is_empty() {
            return Ok(ScanResult::Success);
        }

        let mut cursor = TokenCursor::new(token);
        let deadline = Deadline::after(self.clock.now(), window);

        while !deadline.reached(self.clock.now()) {
            if let Some(byte) = self.poll_byte()? {
                if cursor.advance(byte) {
                    return Ok(ScanResult::Success);
                }
            }
        }

        Ok(ScanResult::Timeout)
    }

    /// Races a confirmation token against a rejection token on the same stream.
    ///
    /// Both cursors advance independently on every byte. The confirmation
    /// token is checked first, so it wins if both complete on the same byte.
    /// An empty `pass` matches immediately; an empty `fail` never completes.
    pub fn wait_for_either(
        &mut self,
        pass: &[u8],
        fail: &[u8],
        window: TimerDurationU32<TIMER_HZ>,
    ) -> Result<ScanResult, Error<S::Error>> {
        if pass.is_empty() {
            return Ok(ScanResult::Success);
        }

        let mut pass_cursor = TokenCursor::new(pass);
        let mut fail_cursor = (!fail.is_empty()).then(|| TokenCursor::new(fail));
        let deadline = Deadline::after(self.clock.now(), window);

        while !deadline.reached(self.clock.now()) {
            if let Some(byte) = self.poll_byte()? {
                if pass_cursor.advance(byte) {
                    return Ok(ScanResult::Success);
                }

                if let Some(cursor) = fail_cursor.as_mut() {
                    if cursor.advance(byte) {
                        return Ok(ScanResult::Failure);
                    }
                }
            }
        }

        Ok(ScanResult::Timeout)
    }

    /// Discards stream bytes until `delimiter` has been consumed.
    ///
    /// Each call consumes its own occurrence of the delimiter, so repeated
    /// calls step over consecutive fields.
    pub fn skip_until(
        &mut self,
        delimiter: u8,
        window: TimerDurationU32<TIMER_HZ>,
    ) -> Result<ScanResult, Error<S::Error>> {
        let deadline = Deadline::after(self.clock.now(), window);

        while !deadline.reached(self.clock.now()) {
            if let Some(byte) = self.poll_byte()? {
                if byte == delimiter {
                    return Ok(ScanResult::Success);
                }
            }
        }

        Ok(ScanResult::Timeout)
    }

    /// Copies stream bytes into `field` until `delimiter` has been consumed.
    ///
    /// The delimiter is removed from the stream but not stored. Once the
    /// data region of `field` is full, [ScanResult::LengthExceeded] is
    /// returned and the rest of the field stays unread on the channel.
    /// `field` is NUL terminated on every exit path, including timeouts,
    /// so partial captures are always safe to inspect.
    pub fn copy_until(
        &mut self,
        field: &mut CaptureBuffer<'_>,
        delimiter: u8,
        window: TimerDurationU32<TIMER_HZ>,
    ) -> Result<ScanResult, Error<S::Error>> {
        let deadline = Deadline::after(self.clock.now(), window);

        while !deadline.reached(self.clock.now()) {
            if let Some(byte) = self.poll_byte()? {
                if byte == delimiter {
                    field.terminate();
                    return Ok(ScanResult::Success);
                }

                if field.push(byte).is_err() || field.is_full() {
                    field.terminate();
                    return Ok(ScanResult::LengthExceeded);
                }
            }
        }

        field.terminate();
        Ok(ScanResult::Timeout)
    }

    /// Polls the channel once: one byte if the radio sent one, None otherwise.
    pub(crate) fn poll_byte(&mut self) -> Result<Option<u8>, Error<S::Error>> {
        match self.read_byte() {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(error)) => Err(error),
        }
    }
}
