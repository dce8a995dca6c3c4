use std::mem::size_of;

use crate::abi::{
    RawAddr, RawIpmbAddr, RawIpmbDirectAddr, RawLanAddr, RawSystemInterfaceAddr,
    IPMI_BMC_CHANNEL, IPMI_IPMB_ADDR_TYPE, IPMI_IPMB_BROADCAST_ADDR_TYPE,
    IPMI_IPMB_DIRECT_ADDR_TYPE, IPMI_LAN_ADDR_TYPE, IPMI_SYSTEM_INTERFACE_ADDR_TYPE,
};
use crate::error::{Result, TransportError};

/// Destination or source of an IPMI message.
///
/// Normal code only ever handles this sum type. [`Address::to_raw`] and
/// [`Address::from_raw`] convert to and from the driver's generic
/// [`RawAddr`] at the ioctl boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// The local BMC over the system interface.
    SystemInterface { channel: i16, lun: u8 },
    /// A controller on an IPMB bus, bridged through the BMC.
    Ipmb { channel: i16, slave_addr: u8, lun: u8 },
    /// IPMB broadcast; same fields as [`Address::Ipmb`].
    IpmbBroadcast { channel: i16, slave_addr: u8, lun: u8 },
    /// IPMB without BMC bridging (driver talks to the bus directly).
    IpmbDirect {
        channel: i16,
        slave_addr: u8,
        rs_lun: u8,
        rq_lun: u8,
    },
    /// A LAN session, as reported on messages arriving from a LAN channel.
    Lan {
        channel: i16,
        privilege: u8,
        session_handle: u8,
        remote_swid: u8,
        local_swid: u8,
        lun: u8,
    },
}

impl Address {
    /// The local BMC, LUN 0.
    pub const fn bmc() -> Self {
        Address::SystemInterface {
            channel: IPMI_BMC_CHANNEL,
            lun: 0,
        }
    }

    /// The driver's type tag for this variant.
    pub const fn addr_type(&self) -> i32 {
        match self {
            Address::SystemInterface { .. } => IPMI_SYSTEM_INTERFACE_ADDR_TYPE,
            Address::Ipmb { .. } => IPMI_IPMB_ADDR_TYPE,
            Address::IpmbBroadcast { .. } => IPMI_IPMB_BROADCAST_ADDR_TYPE,
            Address::IpmbDirect { .. } => IPMI_IPMB_DIRECT_ADDR_TYPE,
            Address::Lan { .. } => IPMI_LAN_ADDR_TYPE,
        }
    }

    pub const fn channel(&self) -> i16 {
        match *self {
            Address::SystemInterface { channel, .. }
            | Address::Ipmb { channel, .. }
            | Address::IpmbBroadcast { channel, .. }
            | Address::IpmbDirect { channel, .. }
            | Address::Lan { channel, .. } => channel,
        }
    }

    /// Length of the concrete C struct for this variant, passed to the
    /// driver as `addr_len`.
    pub const fn raw_len(&self) -> u32 {
        let len = match self {
            Address::SystemInterface { .. } => size_of::<RawSystemInterfaceAddr>(),
            Address::Ipmb { .. } | Address::IpmbBroadcast { .. } => size_of::<RawIpmbAddr>(),
            Address::IpmbDirect { .. } => size_of::<RawIpmbDirectAddr>(),
            Address::Lan { .. } => size_of::<RawLanAddr>(),
        };
        len as u32
    }

    /// Produce the byte-exact generic address for this variant.
    ///
    /// Every concrete address struct shares the `addr_type`/`channel`
    /// prefix with [`RawAddr`]; the variant fields that follow land in
    /// `RawAddr::data` in declaration order.
    pub fn to_raw(&self) -> RawAddr {
        let mut raw = RawAddr {
            addr_type: self.addr_type(),
            channel: self.channel(),
            ..RawAddr::zeroed()
        };
        match *self {
            Address::SystemInterface { lun, .. } => {
                raw.data[0] = lun;
            }
            Address::Ipmb {
                slave_addr, lun, ..
            }
            | Address::IpmbBroadcast {
                slave_addr, lun, ..
            } => {
                raw.data[..2].copy_from_slice(&[slave_addr, lun]);
            }
            Address::IpmbDirect {
                slave_addr,
                rs_lun,
                rq_lun,
                ..
            } => {
                raw.data[..3].copy_from_slice(&[slave_addr, rs_lun, rq_lun]);
            }
            Address::Lan {
                privilege,
                session_handle,
                remote_swid,
                local_swid,
                lun,
                ..
            } => {
                raw.data[..5].copy_from_slice(&[
                    privilege,
                    session_handle,
                    remote_swid,
                    local_swid,
                    lun,
                ]);
            }
        }
        raw
    }

    /// Decode a generic address filled in by the driver.
    pub fn from_raw(raw: &RawAddr) -> Result<Self> {
        let channel = raw.channel;
        let d = &raw.data;
        let address = match raw.addr_type {
            IPMI_SYSTEM_INTERFACE_ADDR_TYPE => Address::SystemInterface { channel, lun: d[0] },
            IPMI_IPMB_ADDR_TYPE => Address::Ipmb {
                channel,
                slave_addr: d[0],
                lun: d[1],
            },
            IPMI_IPMB_BROADCAST_ADDR_TYPE => Address::IpmbBroadcast {
                channel,
                slave_addr: d[0],
                lun: d[1],
            },
            IPMI_IPMB_DIRECT_ADDR_TYPE => Address::IpmbDirect {
                channel,
                slave_addr: d[0],
                rs_lun: d[1],
                rq_lun: d[2],
            },
            IPMI_LAN_ADDR_TYPE => Address::Lan {
                channel,
                privilege: d[0],
                session_handle: d[1],
                remote_swid: d[2],
                local_swid: d[3],
                lun: d[4],
            },
            other => return Err(TransportError::UnknownAddressType(other)),
        };
        Ok(address)
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::bmc()
    }
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use super::*;

    const DATA: usize = offset_of!(RawAddr, data);

    #[test]
    fn variant_fields_sit_where_concrete_structs_put_them() {
        assert_eq!(offset_of!(RawSystemInterfaceAddr, lun), DATA);
        assert_eq!(offset_of!(RawIpmbAddr, slave_addr), DATA);
        assert_eq!(offset_of!(RawIpmbAddr, lun), DATA + 1);
        assert_eq!(offset_of!(RawIpmbDirectAddr, slave_addr), DATA);
        assert_eq!(offset_of!(RawIpmbDirectAddr, rs_lun), DATA + 1);
        assert_eq!(offset_of!(RawIpmbDirectAddr, rq_lun), DATA + 2);
        assert_eq!(offset_of!(RawLanAddr, privilege), DATA);
        assert_eq!(offset_of!(RawLanAddr, lun), DATA + 4);
    }

    #[test]
    fn bmc_address() {
        let raw = Address::bmc().to_raw();
        assert_eq!(raw.addr_type, IPMI_SYSTEM_INTERFACE_ADDR_TYPE);
        assert_eq!(raw.channel, IPMI_BMC_CHANNEL);
        assert_eq!(raw.data[0], 0);
        assert_eq!(Address::bmc().raw_len(), 8);
        assert_eq!(Address::default(), Address::bmc());
    }

    #[test]
    fn ipmb_address_bytes() {
        let address = Address::Ipmb {
            channel: 0,
            slave_addr: 0x82,
            lun: 2,
        };
        let raw = address.to_raw();
        assert_eq!(raw.addr_type, IPMI_IPMB_ADDR_TYPE);
        assert_eq!(&raw.data[..3], &[0x82, 2, 0]);
        assert_eq!(address.raw_len(), 8);
        assert_eq!(Address::from_raw(&raw).unwrap(), address);
    }

    #[test]
    fn every_variant_decodes_to_itself() {
        let addresses = [
            Address::bmc(),
            Address::SystemInterface { channel: 0x0f, lun: 3 },
            Address::IpmbBroadcast {
                channel: 1,
                slave_addr: 0x20,
                lun: 0,
            },
            Address::IpmbDirect {
                channel: 0,
                slave_addr: 0x40,
                rs_lun: 1,
                rq_lun: 2,
            },
            Address::Lan {
                channel: 2,
                privilege: 4,
                session_handle: 7,
                remote_swid: 0x81,
                local_swid: 0x20,
                lun: 0,
            },
        ];
        for address in addresses {
            let raw = address.to_raw();
            assert_eq!(raw.addr_type, address.addr_type());
            assert_eq!(Address::from_raw(&raw).unwrap(), address);
        }
    }

    #[test]
    fn lan_and_direct_lengths() {
        let lan = Address::Lan {
            channel: 1,
            privilege: 0,
            session_handle: 0,
            remote_swid: 0,
            local_swid: 0,
            lun: 0,
        };
        assert_eq!(lan.raw_len(), 12);
        let direct = Address::IpmbDirect {
            channel: 0,
            slave_addr: 0,
            rs_lun: 0,
            rq_lun: 0,
        };
        assert_eq!(direct.raw_len(), 12);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let raw = RawAddr {
            addr_type: 0x55,
            ..RawAddr::zeroed()
        };
        assert!(matches!(
            Address::from_raw(&raw),
            Err(TransportError::UnknownAddressType(0x55))
        ));
    }
}
