use crate::adapter::Adapter;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use embedded_io::{ErrorType, Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer as FugitTimer;
use mockall::mock;

/// Transport error returned by the serial mock
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SerialFault;

impl embedded_io::Error for SerialFault {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

/// Scripted serial channel: canned inbound bytes plus an outbound write log
pub struct MockSerial {
    /// Pending inbound bytes
    rx: VecDeque<u8>,

    /// Everything the driver wrote, in write order
    written: Vec<u8>,

    /// Simulates a read fault at the given call index
    fail_read_at: Option<usize>,

    /// read() call count
    read_count: usize,

    /// If true, all writes fail
    fail_writes: bool,
}

impl MockSerial {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            written: Vec::new(),
            fail_read_at: None,
            read_count: 0,
            fail_writes: false,
        }
    }

    /// Queues inbound bytes as if the radio had sent them
    pub fn enqueue(&mut self, data: &[u8]) {
        self.rx.extend(data.iter().copied());
    }

    /// Outbound log
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Inbound bytes not yet consumed by the driver
    pub fn remaining(&self) -> Vec<u8> {
        self.rx.iter().copied().collect()
    }

    /// Simulates a read fault at the given call index
    pub fn fail_read_at(&mut self, call_index: usize) {
        self.fail_read_at = Some(call_index);
    }

    /// All subsequent writes fail
    pub fn fail_writes(&mut self) {
        self.fail_writes = true;
    }
}

impl ErrorType for MockSerial {
    type Error = SerialFault;
}

impl Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialFault> {
        if self.fail_read_at == Some(self.read_count) {
            return Err(SerialFault);
        }
        self.read_count += 1;

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

impl ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, SerialFault> {
        Ok(!self.rx.is_empty())
    }
}

impl Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, SerialFault> {
        if self.fail_writes {
            return Err(SerialFault);
        }

        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), SerialFault> {
        Ok(())
    }
}

mock! {
    pub Clock{}

    impl FugitTimer<1_000> for Clock {
        type Error = u32;

        fn now(&mut self) -> TimerInstantU32<1000>;
        fn start(&mut self, duration: TimerDurationU32<1000>) -> Result<(), u32>;
        fn cancel(&mut self) -> Result<(), u32>;
        fn wait(&mut self) -> nb::Result<(), u32>;
    }
}

impl MockClock {
    /// Short hand helper for returning a milliseconds duration
    pub fn duration_ms(duration: u32) -> TimerDurationU32<1_000> {
        TimerDurationU32::millis(duration)
    }
}

/// Clock advancing one millisecond tick per query
pub fn ticking_clock() -> MockClock {
    let mut clock = MockClock::new();
    let mut tick = 0u32;

    clock.expect_now().returning(move || {
        tick += 1;
        TimerInstantU32::from_ticks(tick)
    });

    clock
}

pub type TestAdapter = Adapter<MockSerial, MockClock, 1_000>;

/// Adapter over the given serial mock and a ticking clock
pub fn adapter(serial: MockSerial) -> TestAdapter {
    Adapter::new(serial, ticking_clock())
}
