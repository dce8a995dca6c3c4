use std::time::Duration;

use crate::error::Result;
use crate::message::{Request, Response, TimingParams};

/// The privileged operations one exchange needs.
///
/// [`crate::IpmiDevice`] implements this over the kernel driver; tests implement
/// it with simulated channels. Implementations perform no retries.
pub trait IpmiChannel {
    /// Hand `request` to the driver using request code `code`.
    fn submit(&self, code: u32, request: &Request<'_>) -> Result<()>;

    /// Hand `request` to the driver with a per-request retry policy.
    fn submit_timed(&self, request: &Request<'_>, timing: TimingParams) -> Result<()>;

    /// Block until a message is ready to fetch or `timeout` elapses.
    ///
    /// Returns `Ok(false)` on timeout.
    fn wait_readable(&self, timeout: Duration) -> Result<bool>;

    /// Take the next queued message into `response` using request code `code`.
    fn fetch(&self, code: u32, response: &mut Response<'_>) -> Result<()>;
}
