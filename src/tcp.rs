//! # Connection handling
//!
//! One connection at a time: open, send, receive via
//! [receive_packet](crate::adapter::Adapter::receive_packet), close. The
//! radio multiplexes nothing in single connection mode, so no link id is
//! carried.
//!
//! ## Example
//!
//! ````
//! # use esp8266_lite::adapter::Adapter;
//! # use esp8266_lite::example::{ExampleClock, ExampleSerialPort};
//! # use esp8266_lite::tcp::Protocol;
//! #
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(ExampleSerialPort::new(), ExampleClock::default());
//!
//! adapter.connect("93.184.216.34", 80, Protocol::Tcp).unwrap();
//! adapter.send(b"hello!").unwrap();
//!
//! let packet = adapter.receive_packet(32).unwrap().unwrap();
//! assert_eq!(b"nice to see you!", packet.data());
//!
//! adapter.close().unwrap();
//! ````

use crate::adapter::{confirmed, Adapter, Error};
use crate::commands;
use crate::responses;
use embedded_io::{Read, ReadReady, Write};
use fugit_timer::Timer;
use numtoa::NumToA;

/// Transport protocol of an outbound connection
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Ssl,
}

impl Protocol {
    /// Quoted connection type plus separating comma for [commands::CONNECT]
    pub(crate) fn argument(&self) -> &'static str {
        match self {
            Protocol::Tcp => "\"TCP\",",
            Protocol::Udp => "\"UDP\",",
            Protocol::Ssl => "\"SSL\",",
        }
    }
}

impl<S, C, const TIMER_HZ: u32> Adapter<S, C, TIMER_HZ>
where
    S: Read + ReadReady + Write,
    C: Timer<TIMER_HZ>,
{
    /// Opens a connection to a remote host.
    ///
    /// `host` may be an address literal or a DNS name, it is transmitted as
    /// given. Completes with the radio's verdict within the connect window.
    pub fn connect(&mut self, host: &str, port: u16, protocol: Protocol) -> Result<(), Error<S::Error>> {
        let args = commands::connect_args(protocol, host, port).ok_or(Error::ArgumentTooLong)?;
        self.send_command_with_prefix(commands::CONNECT, Some(args.as_bytes()))?;
        confirmed(self.wait_for_either(responses::OK, responses::ERROR, self.timeouts.connect)?)
    }

    /// Closes the open connection.
    ///
    /// Without an open connection the radio rejects the command.
    pub fn close(&mut self) -> Result<(), Error<S::Error>> {
        self.send_command_with_prefix(commands::CLOSE_CONNECTION, None)?;
        confirmed(self.wait_for_either(responses::OK, responses::ERROR, self.timeouts.command)?)
    }

    /// Sends payload over the open connection.
    ///
    /// Announces the length, waits for the radio's go-ahead, streams the
    /// bytes and finally waits for the transmission receipt. Nothing of the
    /// payload is written if the announcement is rejected.
    pub fn send(&mut self, data: &[u8]) -> Result<(), Error<S::Error>> {
        let mut digits = [0; 20];
        self.send_command_with_prefix(commands::SEND_DATA, Some(data.len().numtoa_str(10, &mut digits).as_bytes()))?;
        confirmed(self.wait_for_either(responses::OK, responses::ERROR, self.timeouts.command)?)?;

        self.serial.write_all(data).map_err(Error::Serial)?;
        self.serial.flush().map_err(Error::Serial)?;

        confirmed(self.wait_for_token(responses::SEND_OK, self.timeouts.command)?)
    }
}
