//! Structures shared with the kernel IPMI driver (`<linux/ipmi.h>`).
//!
//! Every type here is `#[repr(C)]` and read or written by the driver
//! directly; field order, widths and padding must stay identical to the
//! native C layout. The tests at the bottom pin sizes and offsets.

use std::ffi::c_long;
use std::ptr;

/// ioctl type byte for the IPMI driver (`'i'`).
pub const IPMI_IOC_MAGIC: u8 = b'i';

/// Size of the opaque address payload in [`RawAddr`].
pub const IPMI_MAX_ADDR_SIZE: usize = 32;

/// Capacity of the message data buffer used by this transport.
pub const IPMI_MAX_MSG_LENGTH: usize = 1024;

/// Channel number of the system interface to the local BMC.
pub const IPMI_BMC_CHANNEL: i16 = 0x0f;

/// Default IPMB slave address of the BMC.
pub const IPMI_BMC_SLAVE_ADDR: u8 = 0x20;

pub const IPMI_SYSTEM_INTERFACE_ADDR_TYPE: i32 = 0x0c;
pub const IPMI_IPMB_ADDR_TYPE: i32 = 0x01;
pub const IPMI_IPMB_BROADCAST_ADDR_TYPE: i32 = 0x41;
pub const IPMI_LAN_ADDR_TYPE: i32 = 0x04;
pub const IPMI_IPMB_DIRECT_ADDR_TYPE: i32 = 0x81;

pub const IPMI_RESPONSE_RECV_TYPE: i32 = 1;
pub const IPMI_ASYNC_EVENT_RECV_TYPE: i32 = 2;
pub const IPMI_CMD_RECV_TYPE: i32 = 3;
pub const IPMI_RESPONSE_RESPONSE_TYPE: i32 = 4;
pub const IPMI_OEM_RECV_TYPE: i32 = 5;

pub const IPMI_MAINTENANCE_MODE_AUTO: i32 = 0;
pub const IPMI_MAINTENANCE_MODE_OFF: i32 = 1;
pub const IPMI_MAINTENANCE_MODE_ON: i32 = 2;

/// Generic address large enough to hold any concrete address type.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAddr {
    pub addr_type: i32,
    pub channel: i16,
    pub data: [u8; IPMI_MAX_ADDR_SIZE],
}

impl RawAddr {
    pub const fn zeroed() -> Self {
        Self {
            addr_type: 0,
            channel: 0,
            data: [0; IPMI_MAX_ADDR_SIZE],
        }
    }
}

impl Default for RawAddr {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSystemInterfaceAddr {
    pub addr_type: i32,
    pub channel: i16,
    pub lun: u8,
}

/// Also used for broadcast addresses.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawIpmbAddr {
    pub addr_type: i32,
    pub channel: i16,
    pub slave_addr: u8,
    pub lun: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawIpmbDirectAddr {
    pub addr_type: i32,
    pub channel: i16,
    pub slave_addr: u8,
    pub rs_lun: u8,
    pub rq_lun: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLanAddr {
    pub addr_type: i32,
    pub channel: i16,
    pub privilege: u8,
    pub session_handle: u8,
    pub remote_swid: u8,
    pub local_swid: u8,
    pub lun: u8,
}

/// Message envelope: netfn, command and a pointer to the data bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawMsg {
    pub netfn: u8,
    pub cmd: u8,
    pub data_len: u16,
    pub data: *mut u8,
}

impl RawMsg {
    pub const fn empty() -> Self {
        Self {
            netfn: 0,
            cmd: 0,
            data_len: 0,
            data: ptr::null_mut(),
        }
    }
}

/// Argument of the submit ioctl.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawReq {
    pub addr: *mut u8,
    pub addr_len: u32,
    pub msgid: c_long,
    pub msg: RawMsg,
}

/// Argument of the receive ioctls.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawRecv {
    pub recv_type: i32,
    pub addr: *mut u8,
    pub addr_len: u32,
    pub msgid: c_long,
    pub msg: RawMsg,
}

/// Argument of the submit-with-timing ioctl.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawReqSettime {
    pub req: RawReq,
    pub retries: i32,
    pub retry_time_ms: u32,
}

/// Argument of the per-channel address and LUN ioctls.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawChannelLunAddressSet {
    pub channel: u16,
    pub value: u8,
}

/// Argument of the timing-parameter ioctls.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTimingParms {
    pub retries: i32,
    pub retry_time_ms: u32,
}

#[cfg(test)]
mod tests {
    use std::mem::{align_of, offset_of, size_of};

    use super::*;

    #[test]
    fn address_layouts() {
        assert_eq!(size_of::<RawAddr>(), 40);
        assert_eq!(offset_of!(RawAddr, channel), 4);
        assert_eq!(offset_of!(RawAddr, data), 6);

        assert_eq!(size_of::<RawSystemInterfaceAddr>(), 8);
        assert_eq!(offset_of!(RawSystemInterfaceAddr, lun), 6);

        assert_eq!(size_of::<RawIpmbAddr>(), 8);
        assert_eq!(offset_of!(RawIpmbAddr, slave_addr), 6);
        assert_eq!(offset_of!(RawIpmbAddr, lun), 7);

        assert_eq!(size_of::<RawIpmbDirectAddr>(), 12);
        assert_eq!(offset_of!(RawIpmbDirectAddr, rq_lun), 8);

        assert_eq!(size_of::<RawLanAddr>(), 12);
        assert_eq!(offset_of!(RawLanAddr, lun), 10);

        for size in [
            size_of::<RawSystemInterfaceAddr>(),
            size_of::<RawIpmbAddr>(),
            size_of::<RawIpmbDirectAddr>(),
            size_of::<RawLanAddr>(),
        ] {
            assert!(size <= size_of::<RawAddr>());
        }
    }

    #[test]
    fn small_struct_layouts() {
        assert_eq!(size_of::<RawChannelLunAddressSet>(), 4);
        assert_eq!(offset_of!(RawChannelLunAddressSet, value), 2);
        assert_eq!(size_of::<RawTimingParms>(), 8);
        assert_eq!(offset_of!(RawTimingParms, retry_time_ms), 4);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn message_layouts_64bit() {
        assert_eq!(size_of::<RawMsg>(), 16);
        assert_eq!(offset_of!(RawMsg, data_len), 2);
        assert_eq!(offset_of!(RawMsg, data), 8);

        assert_eq!(size_of::<RawReq>(), 40);
        assert_eq!(offset_of!(RawReq, addr_len), 8);
        assert_eq!(offset_of!(RawReq, msgid), 16);
        assert_eq!(offset_of!(RawReq, msg), 24);

        assert_eq!(size_of::<RawRecv>(), 48);
        assert_eq!(offset_of!(RawRecv, addr), 8);
        assert_eq!(offset_of!(RawRecv, addr_len), 16);
        assert_eq!(offset_of!(RawRecv, msgid), 24);
        assert_eq!(offset_of!(RawRecv, msg), 32);

        assert_eq!(size_of::<RawReqSettime>(), 48);
        assert_eq!(offset_of!(RawReqSettime, retries), 40);
        assert_eq!(offset_of!(RawReqSettime, retry_time_ms), 44);
        assert_eq!(align_of::<RawReq>(), 8);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn message_layouts_32bit() {
        assert_eq!(size_of::<RawMsg>(), 8);
        assert_eq!(size_of::<RawReq>(), 20);
        assert_eq!(size_of::<RawRecv>(), 24);
        assert_eq!(size_of::<RawReqSettime>(), 28);
    }

    #[test]
    fn zeroed_address_is_default() {
        assert_eq!(RawAddr::default(), RawAddr::zeroed());
        assert_eq!(RawAddr::zeroed().data, [0; IPMI_MAX_ADDR_SIZE]);
    }
}
