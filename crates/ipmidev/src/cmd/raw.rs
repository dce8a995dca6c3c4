use ipmidev_exchange::{exchange, target_address, ExchangeConfig, Reply};
use ipmidev_transport::abi::IPMI_BMC_CHANNEL;
use ipmidev_transport::{open_device, Address, IpmiDevice, TimingParams};
use tracing::debug;

use crate::cmd::{parse_duration, RawArgs};
use crate::exit::{exchange_error, transport_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_reply, OutputFormat};

pub fn run(args: RawArgs, interface: u32, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let file = open_device(interface).map_err(|err| transport_error("open failed", err))?;
    let device = IpmiDevice::from_fd(&file);

    let address = match args.target {
        Some(target) => {
            let my_address = device
                .my_address()
                .map_err(|err| transport_error("address lookup failed", err))?;
            target_address(target, args.channel, args.lun, my_address)
        }
        None => Address::SystemInterface {
            channel: IPMI_BMC_CHANNEL,
            lun: args.lun,
        },
    };
    let timing = match (args.retries, args.retry_time) {
        (Some(retries), Some(retry_time_ms)) => Some(TimingParams {
            retries,
            retry_time_ms,
        }),
        _ => None,
    };
    let config = ExchangeConfig {
        address,
        timeout,
        timing,
    };
    debug!(?config, netfn = args.netfn, cmd = args.cmd, "sending raw request");

    let reply = exchange(&device, &config, args.netfn, args.cmd, &args.data, args.msgid)
        .map_err(|err| exchange_error("exchange failed", err))?;
    print_reply(&reply, format);
    Ok(reply_status(&reply))
}

/// Exit status for a delivered reply: failure when the responder rejected
/// the request.
fn reply_status(reply: &Reply) -> i32 {
    if reply.completion_code == 0x00 {
        SUCCESS
    } else {
        FAILURE
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use ipmidev_transport::Address;

    use super::*;

    fn reply(completion_code: u8) -> Reply {
        Reply {
            recv_type: 1,
            netfn: 0x07,
            cmd: 0x01,
            completion_code,
            data: Bytes::from_static(&[0x20]),
            address: Some(Address::bmc()),
        }
    }

    #[test]
    fn zero_completion_code_succeeds() {
        assert_eq!(reply_status(&reply(0x00)), SUCCESS);
    }

    #[test]
    fn nonzero_completion_code_fails() {
        assert_eq!(reply_status(&reply(0xc1)), FAILURE);
        assert_eq!(reply_status(&reply(0xff)), FAILURE);
    }
}
