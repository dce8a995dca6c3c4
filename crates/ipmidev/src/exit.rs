use std::fmt;
use std::io;

use ipmidev_exchange::ExchangeError;
use ipmidev_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn io_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => TRANSPORT_ERROR,
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = match &err {
        TransportError::Platform { source, .. } | TransportError::Open { source, .. } => {
            io_code(source)
        }
        TransportError::BufferOverflow { .. } | TransportError::UnknownAddressType(_) => {
            DATA_INVALID
        }
        TransportError::MsgidRange(_) => USAGE,
        TransportError::ArgumentSize { .. } => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn exchange_error(context: &str, err: ExchangeError) -> CliError {
    match err {
        ExchangeError::Transport(err) => transport_error(context, err),
        ExchangeError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        ExchangeError::Truncated { .. }
        | ExchangeError::CorrelationMismatch { .. }
        | ExchangeError::MissingCompletionCode => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
