use std::path::PathBuf;

/// Errors that can occur at the device boundary.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A privileged call on the device returned an error.
    #[error("{op} failed: errno {errno} ({}): {source}", .name.unwrap_or("unknown"))]
    Platform {
        /// Name of the ioctl or system call that failed.
        op: &'static str,
        /// Raw OS error code.
        errno: i32,
        /// Symbolic errno, when recognised.
        name: Option<&'static str>,
        source: std::io::Error,
    },

    /// A message length does not fit the storage it refers to.
    #[error("message data length {len} exceeds buffer capacity {capacity}")]
    BufferOverflow { len: usize, capacity: usize },

    /// The correlation id does not fit the driver's `long` message id.
    #[error("correlation id {0} does not fit the driver message id")]
    MsgidRange(i64),

    /// The request code does not describe an argument of the size passed.
    #[error("request code {code:#010x} does not carry a {expected}-byte argument")]
    ArgumentSize { code: u32, expected: usize },

    /// The driver reported an address type this crate does not know.
    #[error("unknown IPMI address type {0:#x}")]
    UnknownAddressType(i32),

    /// No usable device node could be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl TransportError {
    /// Wrap a raw OS error code from `op`.
    pub fn platform(op: &'static str, errno: i32) -> Self {
        TransportError::Platform {
            op,
            errno,
            name: errno_name(errno),
            source: std::io::Error::from_raw_os_error(errno),
        }
    }

    /// Capture `errno` after a failed call to `op`.
    pub fn last_os_error(op: &'static str) -> Self {
        let source = std::io::Error::last_os_error();
        let errno = source.raw_os_error().unwrap_or(0);
        TransportError::Platform {
            op,
            errno,
            name: errno_name(errno),
            source,
        }
    }

    /// The raw OS error code, if this is a platform failure.
    pub fn errno(&self) -> Option<i32> {
        match self {
            TransportError::Platform { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// True when a truncating receive found a message larger than the buffer.
    pub fn is_message_too_large(&self) -> bool {
        #[cfg(unix)]
        {
            self.errno() == Some(libc::EMSGSIZE)
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// True when the call was interrupted by a signal before any transfer.
    pub fn is_interrupted(&self) -> bool {
        match self {
            TransportError::Platform { source, .. } => {
                source.kind() == std::io::ErrorKind::Interrupted
            }
            _ => false,
        }
    }
}

/// Symbolic name for the errno values the IPMI driver is known to return.
#[cfg(unix)]
pub fn errno_name(errno: i32) -> Option<&'static str> {
    let name = match errno {
        libc::EPERM => "EPERM",
        libc::ENOENT => "ENOENT",
        libc::EINTR => "EINTR",
        libc::EIO => "EIO",
        libc::ENXIO => "ENXIO",
        libc::EBADF => "EBADF",
        libc::EAGAIN => "EAGAIN",
        libc::ENOMEM => "ENOMEM",
        libc::EACCES => "EACCES",
        libc::EFAULT => "EFAULT",
        libc::EBUSY => "EBUSY",
        libc::ENODEV => "ENODEV",
        libc::EINVAL => "EINVAL",
        libc::ENOTTY => "ENOTTY",
        libc::EMSGSIZE => "EMSGSIZE",
        libc::ETIMEDOUT => "ETIMEDOUT",
        _ => return None,
    };
    Some(name)
}

#[cfg(not(unix))]
pub fn errno_name(_errno: i32) -> Option<&'static str> {
    None
}

pub type Result<T> = std::result::Result<T, TransportError>;
