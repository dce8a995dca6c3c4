use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TransportError};

/// Device node prefixes, tried in order. udev and devfs layouts differ
/// between distributions.
const DEVICE_PREFIXES: [&str; 3] = ["/dev/ipmi", "/dev/ipmi/", "/dev/ipmidev/"];

/// Candidate device node paths for interface number `interface`.
pub fn device_candidates(interface: u32) -> Vec<PathBuf> {
    DEVICE_PREFIXES
        .iter()
        .map(|prefix| PathBuf::from(format!("{prefix}{interface}")))
        .collect()
}

/// Open the IPMI device for interface `interface` read-write.
///
/// The returned file owns the descriptor; borrow it with
/// [`crate::IpmiDevice::from_fd`].
pub fn open_device(interface: u32) -> Result<File> {
    open_first(&device_candidates(interface))
}

fn open_first(candidates: &[PathBuf]) -> Result<File> {
    let mut failure: Option<TransportError> = None;
    for path in candidates {
        match open_rw(path) {
            Ok(file) => {
                debug!(?path, "opened IPMI device");
                return Ok(file);
            }
            Err(err) => {
                debug!(?path, %err, "IPMI device node unavailable");
                // Keep the most informative failure: anything beats "not found".
                let replace = match &failure {
                    None => true,
                    Some(TransportError::Open { source, .. }) => {
                        source.kind() == ErrorKind::NotFound
                    }
                    Some(_) => false,
                };
                if replace {
                    failure = Some(TransportError::Open {
                        path: path.clone(),
                        source: err,
                    });
                }
            }
        }
    }
    Err(failure.unwrap_or_else(|| TransportError::Open {
        path: PathBuf::new(),
        source: std::io::Error::new(ErrorKind::NotFound, "no device paths to try"),
    }))
}

fn open_rw(path: &Path) -> std::io::Result<File> {
    // std opens with O_CLOEXEC.
    OpenOptions::new().read(true).write(true).open(path)
}
