//! Kernel-facing layer of ipmidev.
//!
//! Everything needed to talk to the Linux IPMI device driver through
//! ioctls:
//! - request-code arithmetic ([`ioc`]) and the driver's code table ([`CODES`])
//! - byte-exact driver structs ([`abi`]) and the [`Address`] sum type
//! - borrowed [`Request`] / [`Response`] messages
//! - the raw invoker, [`IpmiDevice`], behind the [`IpmiChannel`] trait
//!
//! This is the lowest layer of ipmidev. It never opens or closes the device
//! handle on its own; [`open_device`] is a helper for callers that do.

pub mod abi;
pub mod address;
pub mod codes;
pub mod error;
pub mod ioc;
pub mod message;
pub mod traits;

#[cfg(unix)]
pub mod device;
#[cfg(unix)]
pub mod open;

pub use address::Address;
pub use codes::{CommandCodes, CODES};
pub use error::{Result, TransportError};
pub use message::{Request, Response, TimingParams};
pub use traits::IpmiChannel;

#[cfg(unix)]
pub use device::{IpmiDevice, MaintenanceMode};
#[cfg(unix)]
pub use open::{device_candidates, open_device};
