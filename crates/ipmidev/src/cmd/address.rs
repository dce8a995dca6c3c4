use ipmidev_transport::{open_device, IpmiDevice};
use serde_json::Value;
use tracing::info;

use crate::cmd::AddressArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

pub fn run(args: AddressArgs, interface: u32, format: OutputFormat) -> CliResult<i32> {
    let file = open_device(interface).map_err(|err| transport_error("open failed", err))?;
    let device = IpmiDevice::from_fd(&file);

    if let Some(address) = args.set {
        device
            .set_my_address(address)
            .map_err(|err| transport_error("set address failed", err))?;
        info!(address, "interface address updated");
    }

    let address = device
        .my_address()
        .map_err(|err| transport_error("get address failed", err))?;
    let lun = device
        .my_lun()
        .map_err(|err| transport_error("get lun failed", err))?;

    print_fields(
        &[
            ("device", Value::from(interface)),
            ("address", Value::from(format!("{address:#04x}"))),
            ("lun", Value::from(lun)),
        ],
        format,
    );
    Ok(SUCCESS)
}
