//! The ioctl request codes understood by the IPMI device driver.

use std::ffi::{c_int, c_uint};
use std::mem::size_of;

use crate::abi::{
    RawChannelLunAddressSet, RawRecv, RawReq, RawReqSettime, RawTimingParms, IPMI_IOC_MAGIC,
};
use crate::ioc::{encode, Direction};

/// Every request code this crate issues, derived from the argument struct
/// sizes of the target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandCodes {
    pub receive_msg_trunc: u32,
    pub receive_msg: u32,
    pub send_command: u32,
    pub set_gets_events: u32,
    pub set_my_address: u32,
    pub get_my_address: u32,
    pub set_my_lun: u32,
    pub get_my_lun: u32,
    pub send_command_settime: u32,
    pub set_timing_parms: u32,
    pub get_timing_parms: u32,
    pub set_my_channel_address: u32,
    pub get_my_channel_address: u32,
    pub set_my_channel_lun: u32,
    pub get_my_channel_lun: u32,
    pub get_maintenance_mode: u32,
    pub set_maintenance_mode: u32,
}

const fn ior(number: u8, size: usize) -> u32 {
    encode(Direction::Read, IPMI_IOC_MAGIC, number, size)
}

const fn iow(number: u8, size: usize) -> u32 {
    encode(Direction::Write, IPMI_IOC_MAGIC, number, size)
}

const fn iowr(number: u8, size: usize) -> u32 {
    encode(Direction::ReadWrite, IPMI_IOC_MAGIC, number, size)
}

impl CommandCodes {
    const fn new() -> Self {
        let chan_set = size_of::<RawChannelLunAddressSet>();
        Self {
            receive_msg_trunc: iowr(11, size_of::<RawRecv>()),
            receive_msg: iowr(12, size_of::<RawRecv>()),
            send_command: ior(13, size_of::<RawReq>()),
            set_gets_events: ior(16, size_of::<c_int>()),
            set_my_address: ior(17, size_of::<c_uint>()),
            get_my_address: ior(18, size_of::<c_uint>()),
            set_my_lun: ior(19, size_of::<c_uint>()),
            get_my_lun: ior(20, size_of::<c_uint>()),
            send_command_settime: ior(21, size_of::<RawReqSettime>()),
            set_timing_parms: ior(22, size_of::<RawTimingParms>()),
            get_timing_parms: ior(23, size_of::<RawTimingParms>()),
            set_my_channel_address: ior(24, chan_set),
            get_my_channel_address: ior(25, chan_set),
            set_my_channel_lun: ior(26, chan_set),
            get_my_channel_lun: ior(27, chan_set),
            get_maintenance_mode: ior(30, size_of::<c_int>()),
            set_maintenance_mode: iow(31, size_of::<c_int>()),
        }
    }

    /// ioctl name for logs and error messages.
    pub fn name(&self, code: u32) -> &'static str {
        match code {
            c if c == self.receive_msg_trunc => "IPMICTL_RECEIVE_MSG_TRUNC",
            c if c == self.receive_msg => "IPMICTL_RECEIVE_MSG",
            c if c == self.send_command => "IPMICTL_SEND_COMMAND",
            c if c == self.set_gets_events => "IPMICTL_SET_GETS_EVENTS_CMD",
            c if c == self.set_my_address => "IPMICTL_SET_MY_ADDRESS_CMD",
            c if c == self.get_my_address => "IPMICTL_GET_MY_ADDRESS_CMD",
            c if c == self.set_my_lun => "IPMICTL_SET_MY_LUN_CMD",
            c if c == self.get_my_lun => "IPMICTL_GET_MY_LUN_CMD",
            c if c == self.send_command_settime => "IPMICTL_SEND_COMMAND_SETTIME",
            c if c == self.set_timing_parms => "IPMICTL_SET_TIMING_PARMS_CMD",
            c if c == self.get_timing_parms => "IPMICTL_GET_TIMING_PARMS_CMD",
            c if c == self.set_my_channel_address => "IPMICTL_SET_MY_CHANNEL_ADDRESS_CMD",
            c if c == self.get_my_channel_address => "IPMICTL_GET_MY_CHANNEL_ADDRESS_CMD",
            c if c == self.set_my_channel_lun => "IPMICTL_SET_MY_CHANNEL_LUN_CMD",
            c if c == self.get_my_channel_lun => "IPMICTL_GET_MY_CHANNEL_LUN_CMD",
            c if c == self.get_maintenance_mode => "IPMICTL_GET_MAINTENANCE_MODE_CMD",
            c if c == self.set_maintenance_mode => "IPMICTL_SET_MAINTENANCE_MODE_CMD",
            _ => "ioctl",
        }
    }
}

/// Request codes for this build target, computed at compile time.
pub static CODES: CommandCodes = CommandCodes::new();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioc::decode;

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn golden_codes_64bit_linux() {
        assert_eq!(CODES.send_command, 0x8028_690d);
        assert_eq!(
            encode(Direction::Read, 0x69, 13, size_of::<RawReq>()),
            CODES.send_command
        );
        assert_eq!(CODES.receive_msg_trunc, 0xc030_690b);
        assert_eq!(CODES.receive_msg, 0xc030_690c);
        assert_eq!(CODES.send_command_settime, 0x8030_6915);
        assert_eq!(CODES.set_my_address, 0x8004_6911);
        assert_eq!(CODES.get_my_address, 0x8004_6912);
        assert_eq!(CODES.set_my_channel_address, 0x8004_6918);
        assert_eq!(CODES.get_maintenance_mode, 0x8004_691e);
        assert_eq!(CODES.set_maintenance_mode, 0x4004_691f);
    }

    #[test]
    fn every_code_targets_the_ipmi_driver() {
        let all = [
            CODES.receive_msg_trunc,
            CODES.receive_msg,
            CODES.send_command,
            CODES.set_gets_events,
            CODES.set_my_address,
            CODES.get_my_address,
            CODES.set_my_lun,
            CODES.get_my_lun,
            CODES.send_command_settime,
            CODES.set_timing_parms,
            CODES.get_timing_parms,
            CODES.set_my_channel_address,
            CODES.get_my_channel_address,
            CODES.set_my_channel_lun,
            CODES.get_my_channel_lun,
            CODES.get_maintenance_mode,
            CODES.set_maintenance_mode,
        ];
        for code in all {
            let parts = decode(code);
            assert_eq!(parts.kind, IPMI_IOC_MAGIC);
            assert!((11..=31).contains(&parts.number));
            assert_ne!(CODES.name(code), "ioctl");
        }
    }

    #[test]
    fn receive_size_matches_recv_struct() {
        let parts = decode(CODES.receive_msg_trunc);
        assert_eq!(parts.direction, Direction::ReadWrite);
        assert_eq!(parts.size as usize, size_of::<RawRecv>());
    }

    #[test]
    fn unknown_code_has_generic_name() {
        assert_eq!(CODES.name(0), "ioctl");
    }
}
