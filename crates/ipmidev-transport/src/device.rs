use std::ffi::{c_int, c_uint};
use std::mem::size_of;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd};
use std::time::Duration;

use tracing::trace;

use crate::abi::{
    RawChannelLunAddressSet, RawReqSettime, RawTimingParms, IPMI_MAINTENANCE_MODE_AUTO,
    IPMI_MAINTENANCE_MODE_OFF, IPMI_MAINTENANCE_MODE_ON,
};
use crate::codes::CODES;
use crate::error::{Result, TransportError};
use crate::ioc::decode;
use crate::message::{Request, Response, TimingParams};
use crate::traits::IpmiChannel;

/// Driver maintenance mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceMode {
    /// Entered and left automatically around firmware commands.
    Auto,
    Off,
    On,
    /// A value this crate does not recognise, as reported by the driver.
    Unknown(c_int),
}

impl MaintenanceMode {
    fn to_raw(self) -> c_int {
        match self {
            MaintenanceMode::Auto => IPMI_MAINTENANCE_MODE_AUTO,
            MaintenanceMode::Off => IPMI_MAINTENANCE_MODE_OFF,
            MaintenanceMode::On => IPMI_MAINTENANCE_MODE_ON,
            MaintenanceMode::Unknown(raw) => raw,
        }
    }

    fn from_raw(raw: c_int) -> Self {
        match raw {
            IPMI_MAINTENANCE_MODE_AUTO => MaintenanceMode::Auto,
            IPMI_MAINTENANCE_MODE_OFF => MaintenanceMode::Off,
            IPMI_MAINTENANCE_MODE_ON => MaintenanceMode::On,
            other => MaintenanceMode::Unknown(other),
        }
    }
}

/// An open IPMI device handle, borrowed from whoever opened it.
///
/// Never closes the descriptor. At most one exchange may be outstanding on
/// a handle; callers sharing one across threads must serialize access.
#[derive(Debug, Clone, Copy)]
pub struct IpmiDevice<'fd> {
    fd: BorrowedFd<'fd>,
}

impl<'fd> IpmiDevice<'fd> {
    pub fn new(fd: BorrowedFd<'fd>) -> Self {
        Self { fd }
    }

    /// Borrow the descriptor of an open device file.
    pub fn from_fd<F: AsFd>(file: &'fd F) -> Self {
        Self::new(file.as_fd())
    }

    /// Issue `code` with `arg` as its argument.
    ///
    /// # Safety
    /// `code` must be an IPMI driver request whose argument is a `T`, and
    /// every pointer inside `*arg` must be valid for the driver to read or
    /// write for the duration of the call.
    unsafe fn ioctl<T>(&self, code: u32, arg: *mut T) -> Result<()> {
        let expected = size_of::<T>();
        if decode(code).size as usize != expected {
            return Err(TransportError::ArgumentSize { code, expected });
        }
        trace!(op = CODES.name(code), code, "ioctl");
        // SAFETY: the size check above ties `code` to `T`; pointer validity
        // is the caller's contract.
        let rc = unsafe { libc::ioctl(self.fd.as_raw_fd(), code as _, arg) };
        if rc < 0 {
            return Err(TransportError::last_os_error(CODES.name(code)));
        }
        Ok(())
    }

    fn get_value<T: Default>(&self, code: u32) -> Result<T> {
        let mut value = T::default();
        // SAFETY: `value` is a plain integer or struct living on this frame
        // for the whole call.
        unsafe { self.ioctl(code, &mut value)? };
        Ok(value)
    }

    fn set_value<T>(&self, code: u32, mut value: T) -> Result<()> {
        // SAFETY: as for `get_value`; the driver only reads it.
        unsafe { self.ioctl(code, &mut value) }
    }

    /// This interface's own IPMB slave address.
    pub fn my_address(&self) -> Result<u8> {
        let value: c_uint = self.get_value(CODES.get_my_address)?;
        Ok(value as u8)
    }

    pub fn set_my_address(&self, address: u8) -> Result<()> {
        self.set_value(CODES.set_my_address, address as c_uint)
    }

    pub fn my_lun(&self) -> Result<u8> {
        let value: c_uint = self.get_value(CODES.get_my_lun)?;
        Ok(value as u8)
    }

    pub fn set_my_lun(&self, lun: u8) -> Result<()> {
        self.set_value(CODES.set_my_lun, lun as c_uint)
    }

    /// This interface's slave address on `channel`.
    pub fn channel_address(&self, channel: u16) -> Result<u8> {
        let mut value = RawChannelLunAddressSet { channel, value: 0 };
        // SAFETY: `value` lives on this frame for the whole call.
        unsafe { self.ioctl(CODES.get_my_channel_address, &mut value)? };
        Ok(value.value)
    }

    pub fn set_channel_address(&self, channel: u16, address: u8) -> Result<()> {
        self.set_value(
            CODES.set_my_channel_address,
            RawChannelLunAddressSet {
                channel,
                value: address,
            },
        )
    }

    pub fn channel_lun(&self, channel: u16) -> Result<u8> {
        let mut value = RawChannelLunAddressSet { channel, value: 0 };
        // SAFETY: `value` lives on this frame for the whole call.
        unsafe { self.ioctl(CODES.get_my_channel_lun, &mut value)? };
        Ok(value.value)
    }

    pub fn set_channel_lun(&self, channel: u16, lun: u8) -> Result<()> {
        self.set_value(
            CODES.set_my_channel_lun,
            RawChannelLunAddressSet {
                channel,
                value: lun,
            },
        )
    }

    pub fn maintenance_mode(&self) -> Result<MaintenanceMode> {
        let raw: c_int = self.get_value(CODES.get_maintenance_mode)?;
        Ok(MaintenanceMode::from_raw(raw))
    }

    pub fn set_maintenance_mode(&self, mode: MaintenanceMode) -> Result<()> {
        self.set_value(CODES.set_maintenance_mode, mode.to_raw())
    }

    /// Ask the driver to queue asynchronous events on this handle.
    pub fn set_gets_events(&self, enabled: bool) -> Result<()> {
        self.set_value(CODES.set_gets_events, c_int::from(enabled))
    }

    /// Default retry policy for requests submitted on this handle.
    pub fn timing_params(&self) -> Result<TimingParams> {
        let raw: RawTimingParms = self.get_value(CODES.get_timing_parms)?;
        Ok(raw.into())
    }

    pub fn set_timing_params(&self, params: TimingParams) -> Result<()> {
        self.set_value(CODES.set_timing_parms, RawTimingParms::from(params))
    }
}

impl IpmiChannel for IpmiDevice<'_> {
    fn submit(&self, code: u32, request: &Request<'_>) -> Result<()> {
        let mut raw = request.to_raw();
        // SAFETY: `raw` points into the address and data `request` borrows;
        // both outlive this call because `request` is borrowed for it.
        unsafe { self.ioctl(code, &mut raw) }
    }

    fn submit_timed(&self, request: &Request<'_>, timing: TimingParams) -> Result<()> {
        let mut raw = RawReqSettime {
            req: request.to_raw(),
            retries: timing.retries,
            retry_time_ms: timing.retry_time_ms,
        };
        // SAFETY: as for `submit`.
        unsafe { self.ioctl(CODES.send_command_settime, &mut raw) }
    }

    fn wait_readable(&self, timeout: Duration) -> Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.fd.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `pfd` is a single valid pollfd on this frame.
        let rc = unsafe { libc::poll(&mut pfd, 1, poll_timeout(timeout)) };
        if rc < 0 {
            return Err(TransportError::last_os_error("poll"));
        }
        // Error conditions also wake poll; the fetch that follows reports them.
        Ok(rc > 0)
    }

    fn fetch(&self, code: u32, response: &mut Response<'_>) -> Result<()> {
        let mut raw = response.to_raw();
        // SAFETY: `raw` points into the address slot and data buffer that
        // `response` mutably borrows for this whole call.
        let result = unsafe { self.ioctl(code, &mut raw) };
        // A truncating receive fills the response and then fails with
        // EMSGSIZE, so the fields are kept either way.
        if result.is_ok() || matches!(result, Err(ref err) if err.is_message_too_large()) {
            response.absorb(&raw);
        }
        result
    }
}

/// Milliseconds for `poll(2)`, rounded up so a short wait never becomes a
/// non-blocking check.
fn poll_timeout(timeout: Duration) -> c_int {
    let millis = timeout.as_nanos().div_ceil(1_000_000);
    millis.min(c_int::MAX as u128) as c_int
}
