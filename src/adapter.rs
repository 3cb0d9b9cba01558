//! # Radio adapter
//!
//! Central driver type owning the serial channel and the clock. All
//! operations follow the same scheme: put a command line on the wire, then
//! scan the unbuffered response stream byte by byte until the expected
//! phrase arrives or the response window elapses. No state is carried
//! between operations, the whole working set is the channel, the clock and
//! the timeout table.
//!
//! ## Example
//!
//! ```
//! use esp8266_lite::adapter::Adapter;
//! use esp8266_lite::example::{ExampleClock, ExampleSerialPort};
//!
//! let mut adapter: Adapter<_, _, 1_000> = Adapter::new(ExampleSerialPort::new(), ExampleClock::default());
//!
//! // Probe the radio and disable command echo
//! adapter.init().unwrap();
//!
//! let version = adapter.firmware_version().unwrap();
//! assert_eq!("1.3.0.0(Jul 14 2016 18:54:01)", version.at_version.as_str());
//! ```

use crate::buffer::CaptureBuffer;
use crate::commands;
use crate::responses;
use crate::scan::ScanResult;
use embedded_io::{Read, ReadReady, Write};
use fugit::{ExtU32, TimerDurationU32};
use fugit_timer::Timer;
use heapless::String;
use numtoa::NumToA;

/// Errors surfaced by driver operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Serial channel fault while reading or writing
    Serial(E),

    /// The radio answered with its rejection phrase (`ERROR` or `FAIL`)
    Rejected,

    /// The expected response did not arrive within the window
    Timeout,

    /// A captured field outgrew its buffer
    Overflow,

    /// A captured field could not be decoded, bad UTF-8 or address syntax
    Parse,

    /// Command arguments do not fit the assembly buffer
    ArgumentTooLong,
}

/// Response windows per operation class
///
/// The defaults match the latencies of stock ESP-AT firmware. Scenarios with
/// slow access points or lossy links can widen them via
/// [Adapter::set_timeouts].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timeouts<const TIMER_HZ: u32> {
    /// Plain command/response exchanges
    pub command: TimerDurationU32<TIMER_HZ>,

    /// Joining an access point and DNS resolution
    pub join: TimerDurationU32<TIMER_HZ>,

    /// Connection establishment and packet reception
    pub connect: TimerDurationU32<TIMER_HZ>,

    /// Liveness probe, a radio busy with its boot sequence simply stays silent
    pub self_test: TimerDurationU32<TIMER_HZ>,
}

impl<const TIMER_HZ: u32> Default for Timeouts<TIMER_HZ> {
    fn default() -> Self {
        Self {
            command: 1_000.millis(),
            join: 30_000.millis(),
            connect: 5_000.millis(),
            self_test: 10_000.millis(),
        }
    }
}

/// Version and build information reported by the radio
///
/// `AT+GMR` answers with three labelled lines:
///
/// ```text
/// AT version:1.3.0.0(Jul 14 2016 18:54:01)
/// SDK version:2.0.0(656edbf)
/// compile time:Jul 19 2016 18:43:55
/// ```
///
/// The text behind each `:` lands in the matching field, truncated to the
/// field capacity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirmwareVersion {
    /// AT firmware version
    pub at_version: String<32>,

    /// Espressif SDK version
    pub sdk_version: String<32>,

    /// Firmware build timestamp
    pub compile_time: String<32>,
}

/// Central driver for one ESP8266 radio
///
/// `S` is the serial channel, `C` the clock used for deadline bookkeeping
/// and `TIMER_HZ` its tick rate. The driver polls both; neither interrupts
/// nor buffering are required from the platform.
pub struct Adapter<S, C, const TIMER_HZ: u32>
where
    S: Read + ReadReady + Write,
    C: Timer<TIMER_HZ>,
{
    /// Byte channel to the radio
    pub(crate) serial: S,

    /// Clock for response deadlines
    pub(crate) clock: C,

    /// Response windows per operation class
    pub(crate) timeouts: Timeouts<TIMER_HZ>,
}

/// Maps a scan outcome onto an operation result
pub(crate) fn confirmed<E>(outcome: ScanResult) -> Result<(), Error<E>> {
    match outcome {
        ScanResult::Success => Ok(()),
        ScanResult::Failure => Err(Error::Rejected),
        ScanResult::Timeout => Err(Error::Timeout),
        ScanResult::LengthExceeded => Err(Error::Overflow),
    }
}

impl<S, C, const TIMER_HZ: u32> Adapter<S, C, TIMER_HZ>
where
    S: Read + ReadReady + Write,
    C: Timer<TIMER_HZ>,
{
    /// Creates a driver over an opened serial channel
    pub fn new(serial: S, clock: C) -> Self {
        Self {
            serial,
            clock,
            timeouts: Timeouts::default(),
        }
    }

    /// Creates a driver with custom response windows
    pub fn with_timeouts(serial: S, clock: C, timeouts: Timeouts<TIMER_HZ>) -> Self {
        Self { serial, clock, timeouts }
    }

    /// Currently configured response windows
    pub fn timeouts(&self) -> &Timeouts<TIMER_HZ> {
        &self.timeouts
    }

    /// Replaces the response window table
    pub fn set_timeouts(&mut self, timeouts: Timeouts<TIMER_HZ>) {
        self.timeouts = timeouts;
    }

    /// Releases the serial channel and the clock
    pub fn free(self) -> (S, C) {
        (self.serial, self.clock)
    }

    /// Probes the radio with a bare `AT`.
    ///
    /// A healthy radio confirms with `OK`. A silent radio usually means
    /// wrong wiring, wrong baud rate or a module still in its boot sequence,
    /// hence the generous window.
    pub fn test(&mut self) -> Result<(), Error<S::Error>> {
        self.send_command(commands::TEST, None)?;
        confirmed(self.wait_for_token(responses::OK, self.timeouts.self_test)?)
    }

    /// Brings the radio into a known state.
    ///
    /// Probes it and disables command echo, so responses do not carry copies
    /// of the commands that triggered them.
    pub fn init(&mut self) -> Result<(), Error<S::Error>> {
        self.test()?;
        self.disable_echo()
    }

    /// Restarts the radio, equivalent to a power cycle.
    ///
    /// The confirmation arrives before the restart. Allow the radio a few
    /// seconds to boot before issuing further commands.
    pub fn reset(&mut self) -> Result<(), Error<S::Error>> {
        self.send_command_with_prefix(commands::RESET, None)?;
        confirmed(self.wait_for_token(responses::OK, self.timeouts.command)?)
    }

    /// Queries version and build information.
    ///
    /// The three response lines are captured without individual gating, the
    /// trailing `OK` decides whether the response was complete. The captures
    /// are only decoded behind that gate, so a garbled line leaves the
    /// channel aligned for the next exchange.
    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, Error<S::Error>> {
        self.send_command_with_prefix(commands::VERSION, None)?;

        let mut raw_at = [0; 32];
        let mut raw_sdk = [0; 32];
        let mut raw_compile = [0; 32];
        let at_version = self.version_field(&mut raw_at)?;
        let sdk_version = self.version_field(&mut raw_sdk)?;
        let compile_time = self.version_field(&mut raw_compile)?;

        confirmed(self.wait_for_token(responses::OK, self.timeouts.command)?)?;

        Ok(FirmwareVersion {
            at_version: Self::version_text(&at_version)?,
            sdk_version: Self::version_text(&sdk_version)?,
            compile_time: Self::version_text(&compile_time)?,
        })
    }

    /// Puts the radio into deep sleep for the given number of milliseconds.
    ///
    /// The radio only wakes on its own if XPD_DCDC is wired to EXT_RSTB.
    /// Without that strap it sleeps until reset.
    pub fn deep_sleep(&mut self, sleep_time_ms: u32) -> Result<(), Error<S::Error>> {
        let mut digits = [0; 10];
        self.send_command_with_prefix(
            commands::DEEP_SLEEP,
            Some(sleep_time_ms.numtoa_str(10, &mut digits).as_bytes()),
        )?;

        confirmed(self.wait_for_token(responses::OK, self.timeouts.command)?)
    }

    /// Sets and persists the radio UART rate.
    ///
    /// The remaining options stay at 8 data bits, 1 stop bit, no parity and
    /// no flow control. The rate changes directly after the confirmation, so
    /// the host UART has to follow suit before the next command.
    pub fn set_baud_rate(&mut self, baud: u32) -> Result<(), Error<S::Error>> {
        let args = commands::baud_args(baud).ok_or(Error::ArgumentTooLong)?;
        self.send_command_with_prefix(commands::SET_BAUD, Some(args.as_bytes()))?;
        confirmed(self.wait_for_token(responses::OK, self.timeouts.command)?)
    }

    /// Sets the RF TX power ceiling, `0..=82` in steps of 0.25 dBm
    pub fn set_rf_power(&mut self, rf_power: u8) -> Result<(), Error<S::Error>> {
        let mut digits = [0; 3];
        self.send_command_with_prefix(commands::SET_RF_POWER, Some(rf_power.numtoa_str(10, &mut digits).as_bytes()))?;
        confirmed(self.wait_for_token(responses::OK, self.timeouts.command)?)
    }

    /// True if at least one byte is buffered on the channel
    pub fn byte_ready(&mut self) -> Result<bool, Error<S::Error>> {
        self.serial.read_ready().map_err(Error::Serial)
    }

    /// Reads a single byte from the radio, [nb::Error::WouldBlock] if none
    /// is buffered.
    ///
    /// Together with [Adapter::write_bytes] and the scanning primitives this
    /// allows layering commands the driver does not model.
    pub fn read_byte(&mut self) -> nb::Result<u8, Error<S::Error>> {
        if !self.byte_ready()? {
            return Err(nb::Error::WouldBlock);
        }

        let mut byte = [0; 1];
        if self.serial.read(&mut byte).map_err(Error::Serial)? == 0 {
            return Err(nb::Error::WouldBlock);
        }

        Ok(byte[0])
    }

    /// Writes raw bytes to the radio and flushes the channel
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error<S::Error>> {
        self.serial.write_all(data).map_err(Error::Serial)?;
        self.serial.flush().map_err(Error::Serial)
    }

    /// Writes a bare command plus optional arguments, CRLF terminated.
    ///
    /// Response handling is left to the caller, this only puts the line on
    /// the wire.
    pub(crate) fn send_command(&mut self, command: &[u8], args: Option<&[u8]>) -> Result<(), Error<S::Error>> {
        #[cfg(feature = "log")]
        log::trace!("sending command {}", core::str::from_utf8(command).unwrap_or("<binary>"));

        self.serial.write_all(command).map_err(Error::Serial)?;

        if let Some(args) = args {
            if !args.is_empty() {
                self.serial.write_all(args).map_err(Error::Serial)?;
            }
        }

        self.serial.write_all(commands::CRLF).map_err(Error::Serial)?;
        self.serial.flush().map_err(Error::Serial)
    }

    /// Writes an extended command line: `AT+` plus name plus arguments
    pub(crate) fn send_command_with_prefix(
        &mut self,
        command: &[u8],
        args: Option<&[u8]>,
    ) -> Result<(), Error<S::Error>> {
        self.serial.write_all(commands::PREFIX).map_err(Error::Serial)?;
        self.send_command(command, args)
    }

    fn disable_echo(&mut self) -> Result<(), Error<S::Error>> {
        self.send_command(commands::DISABLE_ECHO, None)?;
        confirmed(self.wait_for_token(responses::OK, self.timeouts.command)?)
    }

    /// Skips to the next `:` and captures the rest of the line
    fn version_field<'a>(&mut self, raw: &'a mut [u8]) -> Result<CaptureBuffer<'a>, Error<S::Error>> {
        self.skip_until(b':', self.timeouts.command)?;

        let mut field = CaptureBuffer::new(raw);
        self.copy_until(&mut field, b'\r', self.timeouts.command)?;
        Ok(field)
    }

    /// Decodes one captured version line
    fn version_text(field: &CaptureBuffer<'_>) -> Result<String<32>, Error<S::Error>> {
        let text = field.as_str().ok_or(Error::Parse)?;
        String::try_from(text).map_err(|_| Error::Overflow)
    }
}
