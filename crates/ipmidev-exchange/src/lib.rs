//! One request/response exchange with the local BMC.
//!
//! Drives a single submit → wait → fetch → validate cycle over any
//! [`IpmiChannel`](ipmidev_transport::IpmiChannel):
//! - retries submission while the driver reports an interrupted call
//! - bounds the wait for the response by [`ExchangeConfig::timeout`]
//! - rejects responses whose correlation id does not match the request
//! - rejects truncated responses instead of returning partial data
//!
//! The completion code is split off but never interpreted here.

pub mod config;
pub mod error;
pub mod exchange;

pub use config::{target_address, ExchangeConfig, DEFAULT_TIMEOUT};
pub use error::{ExchangeError, Result};
pub use exchange::{exchange, exchange_raw, ExchangeState, Reply, RECV_BUFFER_CAPACITY};
