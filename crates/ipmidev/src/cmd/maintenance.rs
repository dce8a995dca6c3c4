use ipmidev_transport::{open_device, IpmiDevice, MaintenanceMode};
use serde_json::Value;
use tracing::info;

use crate::cmd::{MaintenanceArgs, ModeArg};
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

pub fn run(args: MaintenanceArgs, interface: u32, format: OutputFormat) -> CliResult<i32> {
    let file = open_device(interface).map_err(|err| transport_error("open failed", err))?;
    let device = IpmiDevice::from_fd(&file);

    if let Some(mode) = args.set {
        let mode = to_mode(mode);
        device
            .set_maintenance_mode(mode)
            .map_err(|err| transport_error("set maintenance mode failed", err))?;
        info!(?mode, "maintenance mode updated");
    }

    let mode = device
        .maintenance_mode()
        .map_err(|err| transport_error("get maintenance mode failed", err))?;

    print_fields(
        &[
            ("device", Value::from(interface)),
            ("mode", Value::from(mode_name(mode))),
        ],
        format,
    );
    Ok(SUCCESS)
}

fn to_mode(arg: ModeArg) -> MaintenanceMode {
    match arg {
        ModeArg::Auto => MaintenanceMode::Auto,
        ModeArg::Off => MaintenanceMode::Off,
        ModeArg::On => MaintenanceMode::On,
    }
}

fn mode_name(mode: MaintenanceMode) -> String {
    match mode {
        MaintenanceMode::Auto => "auto".to_string(),
        MaintenanceMode::Off => "off".to_string(),
        MaintenanceMode::On => "on".to_string(),
        MaintenanceMode::Unknown(raw) => format!("unknown({raw})"),
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::*;

    #[test]
    fn names_match_cli_values() {
        for arg in [ModeArg::Auto, ModeArg::Off, ModeArg::On] {
            let name = mode_name(to_mode(arg));
            assert_eq!(ModeArg::from_str(&name, false), Ok(arg));
        }
    }

    #[test]
    fn unrecognised_mode_is_reported_verbatim() {
        assert_eq!(mode_name(MaintenanceMode::Unknown(7)), "unknown(7)");
        assert!(ModeArg::from_str(&mode_name(MaintenanceMode::Unknown(7)), false).is_err());
    }
}
