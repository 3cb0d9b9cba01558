//! AT command catalogue and argument assembly.
//!
//! Command names carry neither the `AT`/`AT+` prefix nor the CRLF
//! terminator, both are added on the wire by
//! [send_command](crate::adapter::Adapter::send_command). Names ending in
//! `=` take their arguments appended directly.

use crate::tcp::Protocol;
use heapless::String;
use numtoa::NumToA;

/// Bare attention command, doubles as the liveness probe
pub const TEST: &[u8] = b"AT";

/// Prefix shared by all extended commands
pub const PREFIX: &[u8] = b"AT+";

/// Disables command echo
pub const DISABLE_ECHO: &[u8] = b"ATE0";

/// Restarts the radio
pub const RESET: &[u8] = b"RST";

/// Queries firmware version information
pub const VERSION: &[u8] = b"GMR";

/// Enters deep sleep for the given number of milliseconds
pub const DEEP_SLEEP: &[u8] = b"GSLP=";

/// Sets the UART configuration, persisted in flash
pub const SET_BAUD: &[u8] = b"UART_DEF=";

/// Sets the RF TX power ceiling
pub const SET_RF_POWER: &[u8] = b"RFPOWER=";

/// Selects station mode, persisted in flash
pub const SET_STATION_MODE: &[u8] = b"CWMODE_DEF=1";

/// Enables the station DHCP client, persisted in flash
pub const ENABLE_STATION_DHCP: &[u8] = b"CWDHCP_DEF=1,1";

/// Joins an access point, credentials persisted in flash
pub const JOIN_ACCESS_POINT: &[u8] = b"CWJAP_DEF=";

/// Disconnects from the current access point
pub const QUIT_ACCESS_POINT: &[u8] = b"CWQAP";

/// Resolves a hostname to an IPv4 address
pub const DNS_LOOKUP: &[u8] = b"CIPDOMAIN=";

/// Queries the local station address
pub const GET_LOCAL_IP: &[u8] = b"CIFSR";

/// Opens a TCP, UDP or SSL connection
pub const CONNECT: &[u8] = b"CIPSTART=";

/// Closes the open connection
pub const CLOSE_CONNECTION: &[u8] = b"CIPCLOSE";

/// Announces payload transmission of the given length
pub const SEND_DATA: &[u8] = b"CIPSEND=";

/// Command line terminator
pub const CRLF: &[u8] = b"\r\n";

/// UART options behind the baud rate: 8 data bits, 1 stop bit, no parity,
/// no flow control
pub const SERIAL_OPTIONS: &str = ",8,1,0,0";

/// Quoted SSID, password and BSSID arguments for [JOIN_ACCESS_POINT].
///
/// Values go out exactly as given, no escaping is applied. `None` if the
/// assembled arguments exceed the line buffer.
pub fn join_args(ssid: &str, password: Option<&str>, bssid: Option<&str>) -> Option<String<128>> {
    let mut args = String::new();
    push_quoted(&mut args, ssid)?;

    if let Some(password) = password {
        args.push(',').ok()?;
        push_quoted(&mut args, password)?;
    }

    if let Some(bssid) = bssid {
        args.push(',').ok()?;
        push_quoted(&mut args, bssid)?;
    }

    Some(args)
}

/// Connection type, quoted host and port arguments for [CONNECT]
pub fn connect_args(protocol: Protocol, host: &str, port: u16) -> Option<String<128>> {
    let mut args = String::new();
    args.push_str(protocol.argument()).ok()?;
    push_quoted(&mut args, host)?;
    args.push(',').ok()?;

    let mut digits = [0; 5];
    args.push_str(port.numtoa_str(10, &mut digits)).ok()?;

    Some(args)
}

/// Baud rate plus the fixed serial options for [SET_BAUD]
pub fn baud_args(baud: u32) -> Option<String<24>> {
    let mut digits = [0; 10];
    let mut args = String::new();
    args.push_str(baud.numtoa_str(10, &mut digits)).ok()?;
    args.push_str(SERIAL_OPTIONS).ok()?;

    Some(args)
}

fn push_quoted<const N: usize>(args: &mut String<N>, value: &str) -> Option<()> {
    args.push('"').ok()?;
    args.push_str(value).ok()?;
    args.push('"').ok()
}
