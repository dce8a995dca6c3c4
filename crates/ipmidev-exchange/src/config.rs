use std::time::Duration;

use ipmidev_transport::abi::{IPMI_BMC_CHANNEL, IPMI_BMC_SLAVE_ADDR};
use ipmidev_transport::{Address, TimingParams};

/// Default bound on the wait for a response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Where the request goes. Default: the local BMC.
    pub address: Address,
    /// Bound on the wait for the response, measured from the end of
    /// submission. Default: 10 seconds.
    pub timeout: Duration,
    /// Driver-level retry policy. `None` uses the handle's defaults.
    pub timing: Option<TimingParams>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            address: Address::bmc(),
            timeout: DEFAULT_TIMEOUT,
            timing: None,
        }
    }
}

/// Address for a request to controller `target` on `channel`.
///
/// Requests to the local BMC (`target` 0, the BMC slave address, or this
/// interface's own address) go over the system interface; anything else is
/// bridged onto IPMB.
pub fn target_address(target: u8, channel: i16, lun: u8, my_address: u8) -> Address {
    if target == 0 || target == my_address || (target == IPMI_BMC_SLAVE_ADDR && channel == 0) {
        Address::SystemInterface {
            channel: IPMI_BMC_CHANNEL,
            lun,
        }
    } else {
        Address::Ipmb {
            channel,
            slave_addr: target,
            lun,
        }
    }
}
