use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

#[cfg(unix)]
pub mod address;
#[cfg(unix)]
pub mod maintenance;
#[cfg(unix)]
pub mod raw;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one raw request and print the response.
    Raw(RawArgs),
    /// Show or set this interface's IPMB address.
    Address(AddressArgs),
    /// Show or set the driver maintenance mode.
    Maintenance(MaintenanceArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, device: u32, format: OutputFormat) -> CliResult<i32> {
    match command {
        #[cfg(unix)]
        Command::Raw(args) => raw::run(args, device, format),
        #[cfg(unix)]
        Command::Address(args) => address::run(args, device, format),
        #[cfg(unix)]
        Command::Maintenance(args) => maintenance::run(args, device, format),
        #[cfg(not(unix))]
        Command::Raw(_) | Command::Address(_) | Command::Maintenance(_) => {
            let _ = (device, format);
            Err(CliError::new(
                crate::exit::INTERNAL,
                "the IPMI device driver is only available on unix hosts",
            ))
        }
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RawArgs {
    /// Network function (hex with 0x prefix, or decimal).
    #[arg(value_parser = parse_byte)]
    pub netfn: u8,
    /// Command number.
    #[arg(value_parser = parse_byte)]
    pub cmd: u8,
    /// Request data bytes.
    #[arg(value_parser = parse_byte)]
    pub data: Vec<u8>,
    /// Maximum time to wait for the response (e.g. 10s, 500ms).
    #[arg(long, default_value = "10s")]
    pub timeout: String,
    /// Slave address of the target controller. Default: the local BMC.
    #[arg(long, value_parser = parse_byte)]
    pub target: Option<u8>,
    /// IPMB channel used to reach --target.
    #[arg(long, default_value = "0")]
    pub channel: i16,
    /// Target LUN.
    #[arg(long, default_value = "0", value_parser = parse_byte)]
    pub lun: u8,
    /// Correlation id echoed back by the driver.
    #[arg(long, default_value = "1")]
    pub msgid: i64,
    /// Driver-level retries for this request.
    #[arg(long, requires = "retry_time")]
    pub retries: Option<i32>,
    /// Milliseconds between driver-level retries.
    #[arg(long, value_name = "MS", requires = "retries")]
    pub retry_time: Option<u32>,
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// New IPMB slave address for this interface.
    #[arg(long, value_parser = parse_byte)]
    pub set: Option<u8>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Off,
    On,
}

#[derive(Args, Debug)]
pub struct MaintenanceArgs {
    /// New maintenance mode.
    #[arg(long)]
    pub set: Option<ModeArg>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a byte given as `0x`-prefixed hex or decimal.
pub fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid byte value: {input}"))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_byte_hex_and_decimal() {
        assert_eq!(parse_byte("0x06"), Ok(0x06));
        assert_eq!(parse_byte("0XFF"), Ok(0xff));
        assert_eq!(parse_byte("32"), Ok(32));
    }

    #[test]
    fn parse_byte_rejects_out_of_range() {
        assert!(parse_byte("0x100").is_err());
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("ab").is_err());
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
