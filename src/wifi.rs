//! # WIFI access point client
//!
//! Joining a network, leaving it, DNS resolution and station address
//! queries. All join related settings (`_DEF` command variants) persist in
//! radio flash, so a power cycled radio reconnects on its own.
//!
//! ## Example
//!
//! ````
//! # use core::net::Ipv4Addr;
//! # use esp8266_lite::adapter::Adapter;
//! # use esp8266_lite::example::{ExampleClock, ExampleSerialPort};
//! #
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(ExampleSerialPort::new(), ExampleClock::default());
//!
//! // Setting target WIFI access point
//! adapter.join("test_wifi", Some("secret"), None).unwrap();
//!
//! // Resolving a hostname through the radio
//! let address = adapter.dns_lookup("example.org").unwrap();
//! assert_eq!(Ipv4Addr::new(93, 184, 216, 34), address);
//! ````

use crate::adapter::{confirmed, Adapter, Error};
use crate::buffer::CaptureBuffer;
use crate::commands;
use crate::responses;
use core::net::Ipv4Addr;
use core::str::FromStr;
use embedded_io::{Read, ReadReady, Write};
use fugit_timer::Timer;

/// Capacity for a textual IPv4 address, `255.255.255.255` plus terminator
const IP_ADDRESS_LENGTH: usize = 16;

impl<S, C, const TIMER_HZ: u32> Adapter<S, C, TIMER_HZ>
where
    S: Read + ReadReady + Write,
    C: Timer<TIMER_HZ>,
{
    /// Configures station mode with DHCP client addressing.
    ///
    /// Both settings persist in radio flash. The DHCP command is issued even
    /// when the mode change fails; the first failed outcome is reported.
    pub fn set_station_mode(&mut self) -> Result<(), Error<S::Error>> {
        self.send_command_with_prefix(commands::SET_STATION_MODE, None)?;
        let mode = self.wait_for_token(responses::OK, self.timeouts.command)?;

        self.send_command_with_prefix(commands::ENABLE_STATION_DHCP, None)?;
        let dhcp = self.wait_for_token(responses::OK, self.timeouts.command)?;

        confirmed(mode)?;
        confirmed(dhcp)
    }

    /// Joins an access point and persists the credentials in radio flash.
    ///
    /// Completes with the radio's verdict: joined, or [Error::Rejected] on
    /// the `FAIL` phrase (wrong key, access point not found). The credentials
    /// go out exactly as given; quotes, commas and backslashes inside SSID or
    /// password have to be pre-escaped by the caller.
    ///
    /// For an open network pass no password. To pin a BSSID on an open
    /// network pass an empty password, the argument order is fixed.
    pub fn join(&mut self, ssid: &str, password: Option<&str>, bssid: Option<&str>) -> Result<(), Error<S::Error>> {
        let args = commands::join_args(ssid, password, bssid).ok_or(Error::ArgumentTooLong)?;
        self.send_command_with_prefix(commands::JOIN_ACCESS_POINT, Some(args.as_bytes()))?;
        confirmed(self.wait_for_either(responses::OK, responses::FAIL, self.timeouts.join)?)
    }

    /// Announces the disconnect to the access point
    pub fn leave(&mut self) -> Result<(), Error<S::Error>> {
        self.send_command_with_prefix(commands::QUIT_ACCESS_POINT, None)?;
        confirmed(self.wait_for_token(responses::OK, self.timeouts.command)?)
    }

    /// Resolves a hostname through the radio.
    ///
    /// The domain is streamed out directly instead of being assembled in a
    /// line buffer, so its length is not bounded by the driver. Resolution
    /// shares the join window, DNS over a fresh association can take a
    /// while.
    pub fn dns_lookup(&mut self, domain: &str) -> Result<Ipv4Addr, Error<S::Error>> {
        self.serial.write_all(commands::PREFIX).map_err(Error::Serial)?;
        self.serial.write_all(commands::DNS_LOOKUP).map_err(Error::Serial)?;
        self.serial.write_all(b"\"").map_err(Error::Serial)?;
        self.serial.write_all(domain.as_bytes()).map_err(Error::Serial)?;
        self.serial.write_all(b"\"").map_err(Error::Serial)?;
        self.serial.write_all(commands::CRLF).map_err(Error::Serial)?;
        self.serial.flush().map_err(Error::Serial)?;

        confirmed(self.wait_for_either(responses::DNS_RESULT_PREFIX, responses::ERROR, self.timeouts.join)?)?;

        let mut raw = [0; IP_ADDRESS_LENGTH];
        let mut field = CaptureBuffer::new(&mut raw);
        self.copy_until(&mut field, b'\r', self.timeouts.command)?;

        // The result line is followed by a blank line and OK. Swallow it so
        // the channel is clean for the next exchange.
        self.wait_for_token(responses::OK, self.timeouts.command)?;

        Self::parse_address(&field)
    }

    /// Queries the station IPv4 address.
    ///
    /// `0.0.0.0` means the access point has not assigned an address yet.
    pub fn local_ip(&mut self) -> Result<Ipv4Addr, Error<S::Error>> {
        self.send_command_with_prefix(commands::GET_LOCAL_IP, None)?;

        // The response lists STAIP before STAMAC; position on the quoted
        // address value
        self.wait_for_token(responses::STATION_IP_PREFIX, self.timeouts.command)?;
        self.skip_until(b'"', self.timeouts.command)?;

        let mut raw = [0; IP_ADDRESS_LENGTH];
        let mut field = CaptureBuffer::new(&mut raw);
        self.copy_until(&mut field, b'"', self.timeouts.command)?;

        // The trailing OK also swallows the MAC line and decides whether the
        // response was complete; the capture is only parsed afterwards
        confirmed(self.wait_for_token(responses::OK, self.timeouts.command)?)?;

        Self::parse_address(&field)
    }

    /// Parses a captured address field
    fn parse_address(field: &CaptureBuffer<'_>) -> Result<Ipv4Addr, Error<S::Error>> {
        let text = field.as_str().ok_or(Error::Parse)?;
        Ipv4Addr::from_str(text).map_err(|_| Error::Parse)
    }
}
