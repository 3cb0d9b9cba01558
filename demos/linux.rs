//! Example that runs on Linux using a serial-USB-adapter.
use std::{env, time::Duration};

use esp8266_lite::adapter::Adapter;
use esp8266_lite::tcp::Protocol;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, StopBits};

// Timer frequency in Hz
const TIMER_HZ: u32 = 1000;

// Largest HTTP body kept before surplus bytes get discarded
const MAX_RESPONSE_SIZE: usize = 2048;

fn main() {
    env_logger::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        println!("Usage: {} <path-to-serial> <baudrate> <ssid> <psk>", args[0]);
        println!("Example: {} /dev/ttyUSB0 115200 mywifi hellopasswd123", args[0]);
        println!("\nNote: To run the example with debug logging, run it like this:");
        println!("\n  RUST_LOG=trace cargo run --example linux --features log -- /dev/ttyUSB0 115200 mywifi hellopasswd123");
        std::process::exit(1);
    }
    let dev = &args[1];
    let baud_rate: u32 = args[2].parse().unwrap();
    let ssid = &args[3];
    let psk = &args[4];

    println!("Starting (dev={}, baud={:?})...", dev, baud_rate);

    // Open serial port
    let port = serialport::new(dev, baud_rate)
        .data_bits(DataBits::Eight)
        .flow_control(FlowControl::None)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_millis(10))
        .open()
        .expect("Could not open serial port");

    // Drop remains of previous sessions before the first probe
    port.clear(ClearBuffer::Input).expect("Could not flush serial buffer");

    let mut adapter: Adapter<_, _, TIMER_HZ> = Adapter::new(link::SerialLink::new(port), timer::SysClock::new());

    // Probe the radio and disable command echo
    adapter.init().expect("Radio did not answer the AT probe");

    let version = adapter.firmware_version().expect("Could not query firmware version");
    println!("AT firmware {}, SDK {}", version.at_version, version.sdk_version);

    // Join WIFI access point
    println!("Join WiFi \"{}\"...", ssid);
    adapter.set_station_mode().expect("Could not switch to station mode");
    adapter.join(ssid, Some(psk), None).expect("Could not join access point");
    println!("Joined, station IP: {}", adapter.local_ip().expect("No station address assigned"));

    // Resolve IPv4 for ifconfig.net through the radio
    let remote_host = "ifconfig.net";
    let remote_ip = adapter.dns_lookup(remote_host).expect("DNS lookup failed");
    println!("{} resolves to {}", remote_host, remote_ip);

    // Create TCP connection
    println!("Connecting to {}...", remote_host);
    adapter
        .connect(&remote_ip.to_string(), 80, Protocol::Tcp)
        .unwrap_or_else(|_| panic!("Failed to connect to {}", remote_host));
    println!("Connected!");

    // Send HTTP request
    println!("Sending HTTP request...");
    let request = b"GET / HTTP/1.0\r\nAccept: text/plain\r\nHost: ifconfig.net\r\n\r\n";
    adapter.send(request).expect("Could not send HTTP request");

    // Read response body
    let body = adapter
        .receive_http_payload(MAX_RESPONSE_SIZE)
        .expect("Error while receiving data")
        .expect("No HTTP response before the timeout");
    println!("Read {} bytes", body.len());

    let text = std::str::from_utf8(body.data()).expect("HTTP response is not valid UTF8");
    println!("Your public IP, as returned by {}: {}", remote_host, text.trim());

    adapter.close().ok();
    adapter.leave().expect("Could not leave access point");
}

mod link {
    use serialport::SerialPort;
    use std::io::{self, Read as _, Write as _};

    /// Byte channel over a serial-USB adapter.
    ///
    /// The port timeout is kept short so reads behave like polls, a timed
    /// out read simply reports zero bytes.
    pub struct SerialLink {
        port: Box<dyn SerialPort>,
    }

    impl SerialLink {
        pub fn new(port: Box<dyn SerialPort>) -> Self {
            Self { port }
        }
    }

    impl embedded_io::ErrorType for SerialLink {
        type Error = io::Error;
    }

    impl embedded_io::Read for SerialLink {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
            match self.port.read(buf) {
                Ok(bytes_read) => Ok(bytes_read),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => Ok(0),
                Err(e) => Err(e),
            }
        }
    }

    impl embedded_io::ReadReady for SerialLink {
        fn read_ready(&mut self) -> Result<bool, io::Error> {
            let pending = self.port.bytes_to_read().map_err(io::Error::from)?;
            Ok(pending > 0)
        }
    }

    impl embedded_io::Write for SerialLink {
        fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
            self.port.write(buf)
        }

        fn flush(&mut self) -> Result<(), io::Error> {
            self.port.flush()
        }
    }
}

mod timer {
    use std::time::Instant;

    use fugit::{TimerDurationU32, TimerInstantU32};
    use fugit_timer::Timer;

    /// Millisecond clock backed by [std::time::Instant]
    pub struct SysClock {
        epoch: Instant,

        /// Expiry in ticks while a countdown is running
        armed: Option<u32>,
    }

    impl SysClock {
        pub fn new() -> Self {
            Self {
                epoch: Instant::now(),
                armed: None,
            }
        }

        fn elapsed_ms(&self) -> u32 {
            u32::try_from(self.epoch.elapsed().as_millis()).expect("u32 timer overflow")
        }
    }

    impl Timer<1000> for SysClock {
        type Error = &'static str;

        fn now(&mut self) -> TimerInstantU32<1000> {
            TimerInstantU32::from_ticks(self.elapsed_ms())
        }

        fn start(&mut self, duration: TimerDurationU32<1000>) -> Result<(), Self::Error> {
            self.armed = Some(self.elapsed_ms() + duration.ticks());
            Ok(())
        }

        fn cancel(&mut self) -> Result<(), Self::Error> {
            self.armed.take().map(|_| ()).ok_or("timer is not running")
        }

        fn wait(&mut self) -> nb::Result<(), Self::Error> {
            match self.armed {
                Some(expiry) if self.elapsed_ms() >= expiry => {
                    self.armed = None;
                    Ok(())
                }
                Some(_) => Err(nb::Error::WouldBlock),
                None => Err(nb::Error::Other("timer is not running")),
            }
        }
    }

}
