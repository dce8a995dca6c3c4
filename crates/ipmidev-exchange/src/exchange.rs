use std::time::Instant;

use bytes::Bytes;
use ipmidev_transport::abi::{RawAddr, IPMI_MAX_MSG_LENGTH, IPMI_RESPONSE_RECV_TYPE};
use ipmidev_transport::{Address, IpmiChannel, Request, Response, CODES};
use tracing::{debug, debug_span, trace};

use crate::config::ExchangeConfig;
use crate::error::{ExchangeError, Result};

/// Receive buffer size for one exchange.
pub const RECV_BUFFER_CAPACITY: usize = IPMI_MAX_MSG_LENGTH;

/// Where an exchange currently is. Every exchange starts at `Idle` and
/// ends at `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Submitting,
    WaitingForReadability,
    Fetching,
    Done,
    Failed,
}

/// A validated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Driver receive type; normally a response, but not filtered.
    pub recv_type: i32,
    pub netfn: u8,
    pub cmd: u8,
    /// First byte of the response data, uninterpreted.
    pub completion_code: u8,
    /// Response data after the completion code.
    pub data: Bytes,
    /// Responder address, when the driver reported a known type.
    pub address: Option<Address>,
}

/// Send one request and return the completion code and data of its response.
pub fn exchange<C: IpmiChannel + ?Sized>(
    channel: &C,
    config: &ExchangeConfig,
    netfn: u8,
    cmd: u8,
    payload: &[u8],
    msgid: i64,
) -> Result<Reply> {
    let received = run(channel, config, netfn, cmd, payload, msgid)?;
    if received.bytes.is_empty() {
        return Err(ExchangeError::MissingCompletionCode);
    }
    Ok(Reply {
        recv_type: received.recv_type,
        netfn: received.netfn,
        cmd: received.cmd,
        completion_code: received.bytes[0],
        data: received.bytes.slice(1..),
        address: received.address,
    })
}

/// Send one request and return its response data verbatim, completion
/// code included.
pub fn exchange_raw<C: IpmiChannel + ?Sized>(
    channel: &C,
    config: &ExchangeConfig,
    netfn: u8,
    cmd: u8,
    payload: &[u8],
    msgid: i64,
) -> Result<Bytes> {
    run(channel, config, netfn, cmd, payload, msgid).map(|received| received.bytes)
}

struct Received {
    recv_type: i32,
    netfn: u8,
    cmd: u8,
    bytes: Bytes,
    address: Option<Address>,
}

fn run<C: IpmiChannel + ?Sized>(
    channel: &C,
    config: &ExchangeConfig,
    netfn: u8,
    cmd: u8,
    payload: &[u8],
    msgid: i64,
) -> Result<Received> {
    let _span = debug_span!("exchange", netfn, cmd, msgid).entered();
    let mut cycle = Cycle {
        channel,
        config,
        state: ExchangeState::Idle,
    };
    let result = cycle.run(netfn, cmd, payload, msgid);
    match &result {
        Ok(received) => {
            cycle.enter(ExchangeState::Done);
            debug!(len = received.bytes.len(), "exchange complete");
        }
        Err(err) => {
            debug!(state = ?cycle.state, %err, "exchange failed");
            cycle.enter(ExchangeState::Failed);
        }
    }
    result
}

struct Cycle<'c, C: ?Sized> {
    channel: &'c C,
    config: &'c ExchangeConfig,
    state: ExchangeState,
}

impl<C: IpmiChannel + ?Sized> Cycle<'_, C> {
    fn enter(&mut self, next: ExchangeState) {
        trace!(from = ?self.state, to = ?next, "exchange state");
        self.state = next;
    }

    fn run(&mut self, netfn: u8, cmd: u8, payload: &[u8], msgid: i64) -> Result<Received> {
        let mut buf = [0u8; RECV_BUFFER_CAPACITY];
        let mut recv_addr = RawAddr::zeroed();
        let send_addr = self.config.address.to_raw();
        let request = Request::new(
            &send_addr,
            self.config.address.raw_len(),
            msgid,
            netfn,
            cmd,
            payload,
        )?;

        self.enter(ExchangeState::Submitting);
        self.submit(&request)?;

        self.enter(ExchangeState::WaitingForReadability);
        self.wait()?;

        self.enter(ExchangeState::Fetching);
        let mut response = Response::new(&mut recv_addr, &mut buf);
        let truncated = match self.channel.fetch(CODES.receive_msg_trunc, &mut response) {
            Ok(()) => false,
            Err(err) if err.is_message_too_large() => true,
            Err(err) => return Err(err.into()),
        };

        if response.msgid() != request.msgid() {
            return Err(ExchangeError::CorrelationMismatch {
                expected: request.msgid(),
                actual: response.msgid(),
            });
        }
        if truncated || response.data_len() >= RECV_BUFFER_CAPACITY {
            return Err(ExchangeError::Truncated {
                len: response.data_len(),
                capacity: RECV_BUFFER_CAPACITY,
            });
        }
        if response.recv_type() != IPMI_RESPONSE_RECV_TYPE {
            debug!(recv_type = response.recv_type(), "accepting non-response message by msgid");
        }

        let bytes = Bytes::copy_from_slice(response.data()?);
        let address = match response.address() {
            Ok(address) => Some(address),
            Err(err) => {
                debug!(%err, "response address not decoded");
                None
            }
        };
        Ok(Received {
            recv_type: response.recv_type(),
            netfn: response.netfn(),
            cmd: response.cmd(),
            bytes,
            address,
        })
    }

    fn submit(&self, request: &Request<'_>) -> Result<()> {
        let mut interrupted = 0u32;
        loop {
            let result = match self.config.timing {
                Some(timing) => self.channel.submit_timed(request, timing),
                None => self.channel.submit(CODES.send_command, request),
            };
            match result {
                Err(err) if err.is_interrupted() => {
                    interrupted += 1;
                    debug!(interrupted, "submit interrupted, retrying");
                }
                other => return other.map_err(Into::into),
            }
        }
    }

    fn wait(&self) -> Result<()> {
        let timeout = self.config.timeout;
        let start = Instant::now();
        // Poll at least once, even with a zero bound.
        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            if self.channel.wait_readable(remaining)? {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(ExchangeError::Timeout(timeout));
            }
        }
    }
}
