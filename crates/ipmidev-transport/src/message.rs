use std::ffi::c_long;
use std::mem::size_of;

use crate::abi::{RawAddr, RawMsg, RawRecv, RawReq, RawTimingParms, IPMI_MAX_MSG_LENGTH};
use crate::address::Address;
use crate::error::{Result, TransportError};

/// Driver-level retry policy for a single submitted request.
///
/// Passed with the submit-with-timing ioctl; the driver falls back to its
/// defaults when a field is negative / zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingParams {
    pub retries: i32,
    pub retry_time_ms: u32,
}

impl From<RawTimingParms> for TimingParams {
    fn from(raw: RawTimingParms) -> Self {
        Self {
            retries: raw.retries,
            retry_time_ms: raw.retry_time_ms,
        }
    }
}

impl From<TimingParams> for RawTimingParms {
    fn from(params: TimingParams) -> Self {
        Self {
            retries: params.retries,
            retry_time_ms: params.retry_time_ms,
        }
    }
}

/// An outgoing message, borrowing its address and data for `'a`.
///
/// The raw argument handed to the driver is only built inside the
/// privileged call, while `&self` is held, so the referenced buffers stay
/// at a stable address and alive for the whole call.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    address: &'a RawAddr,
    addr_len: u32,
    msgid: i64,
    netfn: u8,
    cmd: u8,
    data: &'a [u8],
}

impl<'a> Request<'a> {
    /// Build a request to `address`, the output of [`Address::to_raw`]
    /// with the matching [`Address::raw_len`].
    pub fn new(
        address: &'a RawAddr,
        addr_len: u32,
        msgid: i64,
        netfn: u8,
        cmd: u8,
        data: &'a [u8],
    ) -> Result<Self> {
        if data.len() > IPMI_MAX_MSG_LENGTH {
            return Err(TransportError::BufferOverflow {
                len: data.len(),
                capacity: IPMI_MAX_MSG_LENGTH,
            });
        }
        driver_msgid(msgid)?;
        if addr_len as usize > size_of::<RawAddr>() {
            return Err(TransportError::BufferOverflow {
                len: addr_len as usize,
                capacity: size_of::<RawAddr>(),
            });
        }
        Ok(Self {
            address,
            addr_len,
            msgid,
            netfn,
            cmd,
            data,
        })
    }

    pub fn msgid(&self) -> i64 {
        self.msgid
    }

    pub fn netfn(&self) -> u8 {
        self.netfn
    }

    pub fn cmd(&self) -> u8 {
        self.cmd
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn address(&self) -> Result<Address> {
        Address::from_raw(self.address)
    }

    pub(crate) fn to_raw(&self) -> RawReq {
        RawReq {
            addr: (self.address as *const RawAddr).cast_mut().cast::<u8>(),
            addr_len: self.addr_len,
            // Range checked in `new`.
            msgid: self.msgid as c_long,
            msg: RawMsg {
                netfn: self.netfn,
                cmd: self.cmd,
                // Bounded by IPMI_MAX_MSG_LENGTH in `new`.
                data_len: self.data.len() as u16,
                data: self.data.as_ptr().cast_mut(),
            },
        }
    }
}

/// Convert a correlation id to the driver's message id, which is a C
/// `long` and only 32 bits wide on some targets.
fn driver_msgid(msgid: i64) -> Result<c_long> {
    c_long::try_from(msgid).map_err(|_| TransportError::MsgidRange(msgid))
}

/// An incoming message, filled in place by the driver.
///
/// Borrows a caller-owned address slot and data buffer for `'a`; the
/// scalar fields are copied out of the raw argument once the privileged
/// call returns.
#[derive(Debug)]
pub struct Response<'a> {
    address: &'a mut RawAddr,
    data: &'a mut [u8],
    recv_type: i32,
    addr_len: u32,
    msgid: i64,
    netfn: u8,
    cmd: u8,
    data_len: u16,
}

impl<'a> Response<'a> {
    pub fn new(address: &'a mut RawAddr, data: &'a mut [u8]) -> Self {
        Self {
            address,
            data,
            recv_type: 0,
            addr_len: 0,
            msgid: 0,
            netfn: 0,
            cmd: 0,
            data_len: 0,
        }
    }

    /// Size of the data buffer.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn recv_type(&self) -> i32 {
        self.recv_type
    }

    pub fn msgid(&self) -> i64 {
        self.msgid
    }

    pub fn netfn(&self) -> u8 {
        self.netfn
    }

    pub fn cmd(&self) -> u8 {
        self.cmd
    }

    /// Data length as reported by the driver. May exceed [`Self::capacity`]
    /// after a truncating receive.
    pub fn data_len(&self) -> usize {
        self.data_len as usize
    }

    pub fn address(&self) -> Result<Address> {
        Address::from_raw(self.address)
    }

    /// The received data bytes.
    pub fn data(&self) -> Result<&[u8]> {
        let len = self.data_len();
        if len > self.data.len() {
            return Err(TransportError::BufferOverflow {
                len,
                capacity: self.data.len(),
            });
        }
        Ok(&self.data[..len])
    }

    /// Store a complete message the way the driver's truncating receive
    /// does: copy what fits and report the full length.
    ///
    /// The device never calls this. It lets [`crate::IpmiChannel`]
    /// implementations other than the kernel driver, such as simulated
    /// channels in tests, deliver a message.
    pub fn fill(
        &mut self,
        recv_type: i32,
        address: &Address,
        msgid: i64,
        netfn: u8,
        cmd: u8,
        payload: &[u8],
    ) {
        *self.address = address.to_raw();
        self.addr_len = address.raw_len();
        self.recv_type = recv_type;
        self.msgid = msgid;
        self.netfn = netfn;
        self.cmd = cmd;
        let copied = payload.len().min(self.data.len());
        self.data[..copied].copy_from_slice(&payload[..copied]);
        self.data_len = payload.len().min(u16::MAX as usize) as u16;
    }

    pub(crate) fn to_raw(&mut self) -> RawRecv {
        RawRecv {
            recv_type: 0,
            addr: (&mut *self.address as *mut RawAddr).cast::<u8>(),
            addr_len: size_of::<RawAddr>() as u32,
            msgid: 0,
            msg: RawMsg {
                netfn: 0,
                cmd: 0,
                data_len: self.data.len().min(u16::MAX as usize) as u16,
                data: self.data.as_mut_ptr(),
            },
        }
    }

    pub(crate) fn absorb(&mut self, raw: &RawRecv) {
        self.recv_type = raw.recv_type;
        self.addr_len = raw.addr_len;
        self.msgid = raw.msgid as i64;
        self.netfn = raw.msg.netfn;
        self.cmd = raw.msg.cmd;
        self.data_len = raw.msg.data_len;
    }
}
