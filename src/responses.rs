//! Response phrases the radio terminates its answers with.
//!
//! All phrases are matched byte-wise against the raw stream, including the
//! trailing CRLF where the radio sends one. Prefix phrases like
//! [DNS_RESULT_PREFIX] position the stream on the value behind them.

/// Command confirmed
pub const OK: &[u8] = b"OK\r\n";

/// Command rejected
pub const ERROR: &[u8] = b"ERROR\r\n";

/// Join attempt rejected, wrong key or access point unreachable
pub const FAIL: &[u8] = b"FAIL\r\n";

/// Transmission confirmed by the radio
pub const SEND_OK: &[u8] = b"SEND OK\r\n";

/// Leads the resolved address of a DNS lookup
pub const DNS_RESULT_PREFIX: &[u8] = b"+CIPDOMAIN:";

/// Leads the quoted station address in a CIFSR response
pub const STATION_IP_PREFIX: &[u8] = b":STAIP,";

/// Leads a length-prefixed frame of connection data
pub const PACKET_MARKER: &[u8] = b"+IPD,";

/// HTTP header announcing the body length
pub const CONTENT_LENGTH_HEADER: &[u8] = b"Content-Length: ";

/// Blank line separating HTTP headers from the body
pub const HEADER_END: &[u8] = b"\r\n\r\n";
