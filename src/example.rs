//! Mocks for doc examples
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_io::{ErrorType, Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;

/// Serial channel mock scripted like a freshly booted radio
///
/// Outbound bytes are collected until they form a known command line, which
/// queues the matching canned response for reading.
#[derive(Default)]
pub struct ExampleSerialPort {
    /// Outbound bytes collected so far
    line: Vec<u8>,

    /// Pending inbound bytes
    rx: VecDeque<u8>,
}

impl ExampleSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    fn dispatch(&mut self) {
        if let Some(response) = Self::scripted_response(self.line.as_slice()) {
            self.rx.extend(response.iter().copied());
            self.line.clear();
            return;
        }

        // Unknown complete lines are swallowed like unsupported commands
        if self.line.ends_with(b"\r\n") {
            self.line.clear();
        }
    }

    fn scripted_response(line: &[u8]) -> Option<&'static [u8]> {
        let response: &'static [u8] = match line {
            b"AT\r\n" | b"ATE0\r\n" | b"AT+CWMODE_DEF=1\r\n" | b"AT+CWDHCP_DEF=1,1\r\n" => b"\r\n\r\nOK\r\n",
            b"AT+GMR\r\n" => {
                b"AT version:1.3.0.0(Jul 14 2016 18:54:01)\r\nSDK version:2.0.0(656edbf)\r\ncompile time:Jul 19 2016 18:43:55\r\n\r\nOK\r\n"
            }
            b"AT+CWJAP_DEF=\"test_wifi\",\"secret\"\r\n" => b"WIFI CONNECTED\r\nWIFI GOT IP\r\n\r\nOK\r\n",
            b"AT+CIPDOMAIN=\"example.org\"\r\n" => b"+CIPDOMAIN:93.184.216.34\r\n\r\nOK\r\n",
            b"AT+CIPSTART=\"TCP\",\"93.184.216.34\",80\r\n" => b"CONNECT\r\n\r\nOK\r\n",
            b"AT+CIPSEND=6\r\n" => b"\r\nOK\r\n",
            b"hello!" => b"\r\nSEND OK\r\n+IPD,16:nice to see you!",
            b"AT+CIPCLOSE\r\n" => b"CLOSED\r\n\r\nOK\r\n",
            b"GET / HTTP/1.0\r\n\r\n" => {
                b"+IPD,62:HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello"
            }
            _ => return None,
        };

        Some(response)
    }
}

impl ErrorType for ExampleSerialPort {
    type Error = Infallible;
}

impl Read for ExampleSerialPort {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        match self.rx.pop_front() {
            Some(byte) => {
                buf[0] = byte;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl ReadReady for ExampleSerialPort {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl Write for ExampleSerialPort {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.line.extend_from_slice(buf);
        self.dispatch();
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Clock mock advancing one tick per query
#[derive(Default)]
pub struct ExampleClock {
    now: u32,
}

impl Timer<1_000> for ExampleClock {
    type Error = Infallible;

    fn now(&mut self) -> TimerInstantU32<1_000> {
        self.now += 1;
        TimerInstantU32::from_ticks(self.now)
    }

    fn start(&mut self, _duration: TimerDurationU32<1_000>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        unimplemented!()
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        nb::Result::Err(nb::Error::WouldBlock)
    }
}
