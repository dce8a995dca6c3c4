//! In-band request/response exchange with the local BMC.
//!
//! ipmidev talks to a baseboard management controller through the Linux IPMI
//! device driver: it encodes the driver's ioctl codes, lays out its ABI
//! structs, and runs one submit/wait/fetch/validate cycle per request.
//!
//! # Crate Structure
//!
//! - [`transport`]: ioctl codes, ABI structs and the raw device invoker
//! - [`exchange`]: the single-exchange orchestrator and its error taxonomy
//!
//! ```no_run
//! # #[cfg(unix)]
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use ipmidev::exchange::{exchange, ExchangeConfig};
//! use ipmidev::transport::{open_device, IpmiDevice};
//!
//! let file = open_device(0)?;
//! let device = IpmiDevice::from_fd(&file);
//! // Get Device ID
//! let reply = exchange(&device, &ExchangeConfig::default(), 0x06, 0x01, &[], 1)?;
//! println!("cc={:#04x} data={:02x?}", reply.completion_code, &reply.data[..]);
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use ipmidev_transport::*;
}

/// Re-export exchange types.
pub mod exchange {
    pub use ipmidev_exchange::*;
}
