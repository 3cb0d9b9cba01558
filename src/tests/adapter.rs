use crate::adapter::{Adapter, Error, Timeouts};
use crate::tests::mock::{self, MockSerial, SerialFault};
use fugit::ExtU32;

#[test]
fn test_test_sends_bare_at() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"\r\nOK\r\n");
    let mut adapter = mock::adapter(serial);

    adapter.test().unwrap();

    assert_eq!(b"AT\r\n", adapter.serial.written());
}

#[test]
fn test_test_silent_radio_times_out() {
    let serial = MockSerial::new();
    let mut adapter = mock::adapter(serial);

    let result = adapter.test();

    assert_eq!(Err(Error::Timeout), result);
}

#[test]
fn test_test_error_phrase_is_not_a_verdict() {
    let mut serial = MockSerial::new();
    // The probe only recognizes OK, anything else runs into the window
    serial.enqueue(b"\r\nERROR\r\n");
    let mut adapter = mock::adapter(serial);

    let result = adapter.test();

    assert_eq!(Err(Error::Timeout), result);
}

#[test]
fn test_init_probes_and_disables_echo() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"\r\nOK\r\n\r\nOK\r\n");
    let mut adapter = mock::adapter(serial);

    adapter.init().unwrap();

    assert_eq!(b"AT\r\nATE0\r\n", adapter.serial.written());
}

#[test]
fn test_init_stops_after_failed_probe() {
    let serial = MockSerial::new();
    let mut adapter = mock::adapter(serial);

    let result = adapter.init();

    assert_eq!(Err(Error::Timeout), result);
    assert_eq!(b"AT\r\n", adapter.serial.written());
}

#[test]
fn test_reset_command() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"\r\nOK\r\n");
    let mut adapter = mock::adapter(serial);

    adapter.reset().unwrap();

    assert_eq!(b"AT+RST\r\n", adapter.serial.written());
}

#[test]
fn test_firmware_version_captures_all_fields() {
    let mut serial = MockSerial::new();
    serial.enqueue(
        b"AT version:1.3.0.0(Jul 14 2016 18:54:01)\r\nSDK version:2.0.0(656edbf)\r\ncompile time:Jul 19 2016 18:43:55\r\n\r\nOK\r\n",
    );
    let mut adapter = mock::adapter(serial);

    let version = adapter.firmware_version().unwrap();

    assert_eq!(b"AT+GMR\r\n", adapter.serial.written());
    assert_eq!("1.3.0.0(Jul 14 2016 18:54:01)", version.at_version.as_str());
    assert_eq!("2.0.0(656edbf)", version.sdk_version.as_str());
    assert_eq!("Jul 19 2016 18:43:55", version.compile_time.as_str());
}

#[test]
fn test_firmware_version_missing_ok_gate() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"AT version:1.3.0.0\r\nSDK version:2.0.0\r\ncompile time:Jul 19\r\n");
    let mut adapter = mock::adapter(serial);

    let result = adapter.firmware_version();

    assert_eq!(Err(Error::Timeout), result);
}

#[test]
fn test_firmware_version_garbled_field_leaves_channel_aligned() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"AT version:1.3\x80.0\r\nSDK version:2.0.0\r\ncompile time:Jul 19\r\n\r\nOK\r\nTAIL");
    let mut adapter = mock::adapter(serial);

    let result = adapter.firmware_version();

    // The whole response including the OK gate was consumed before decoding
    assert_eq!(Err(Error::Parse), result);
    assert_eq!(b"TAIL".to_vec(), adapter.serial.remaining());
}

#[test]
fn test_deep_sleep_formats_duration() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"\r\nOK\r\n");
    let mut adapter = mock::adapter(serial);

    adapter.deep_sleep(5000).unwrap();

    assert_eq!(b"AT+GSLP=5000\r\n", adapter.serial.written());
}

#[test]
fn test_set_baud_rate_keeps_serial_options() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"\r\nOK\r\n");
    let mut adapter = mock::adapter(serial);

    adapter.set_baud_rate(9600).unwrap();

    assert_eq!(b"AT+UART_DEF=9600,8,1,0,0\r\n", adapter.serial.written());
}

#[test]
fn test_set_rf_power_formats_level() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"\r\nOK\r\n");
    let mut adapter = mock::adapter(serial);

    adapter.set_rf_power(82).unwrap();

    assert_eq!(b"AT+RFPOWER=82\r\n", adapter.serial.written());
}

#[test]
fn test_read_byte_passes_stream_through() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"ab");
    let mut adapter = mock::adapter(serial);

    assert_eq!(Ok(b'a'), adapter.read_byte());
    assert_eq!(Ok(b'b'), adapter.read_byte());
    assert_eq!(Err(nb::Error::WouldBlock), adapter.read_byte());
}

#[test]
fn test_byte_ready_reports_pending_data() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"x");
    let mut adapter = mock::adapter(serial);

    assert!(adapter.byte_ready().unwrap());
    adapter.read_byte().unwrap();
    assert!(!adapter.byte_ready().unwrap());
}

#[test]
fn test_write_bytes_passes_raw_data() {
    let serial = MockSerial::new();
    let mut adapter = mock::adapter(serial);

    adapter.write_bytes(b"GET / HTTP/1.0\r\n\r\n").unwrap();

    assert_eq!(b"GET / HTTP/1.0\r\n\r\n", adapter.serial.written());
}

#[test]
fn test_write_fault_is_reported() {
    let mut serial = MockSerial::new();
    serial.fail_writes();
    let mut adapter = mock::adapter(serial);

    let result = adapter.test();

    assert_eq!(Err(Error::Serial(SerialFault)), result);
}

#[test]
fn test_custom_timeouts_are_kept() {
    let timeouts = Timeouts {
        command: 5.millis(),
        join: 10.millis(),
        connect: 15.millis(),
        self_test: 20.millis(),
    };

    let adapter = Adapter::<_, _, 1_000>::with_timeouts(MockSerial::new(), mock::ticking_clock(), timeouts);

    assert_eq!(timeouts, *adapter.timeouts());
}

#[test]
fn test_set_timeouts_replaces_table() {
    let mut adapter = mock::adapter(MockSerial::new());

    let timeouts = Timeouts {
        command: 1.millis(),
        join: 2.millis(),
        connect: 3.millis(),
        self_test: 4.millis(),
    };
    adapter.set_timeouts(timeouts);

    assert_eq!(timeouts, *adapter.timeouts());
}

#[test]
fn test_free_releases_channel_and_clock() {
    let mut serial = MockSerial::new();
    serial.enqueue(b"\r\nOK\r\n");
    let mut adapter = mock::adapter(serial);
    adapter.test().unwrap();

    let (serial, _clock) = adapter.free();

    assert_eq!(b"AT\r\n", serial.written());
}
