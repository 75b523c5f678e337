//! The mandatory shape of every response destination.
//!
//! The host answers by writing a short ascii header followed by the payload:
//!
//! ```text
//! ok 12\n<12 payload bytes>
//! err 9\n<9 byte utf-8 failure message>
//! overflow 1048576\n
//! ```
//!
//! `overflow` means the answer did not fit and carries the payload size the host needs. No
//! payload is written in that case, so the guest can allocate a bigger destination and ask
//! again. A destination the host never touched is all zeroes and does not parse.

use crate::bridge_error;
use crate::malformed;
use crate::BridgeError;
use crate::BridgeErrorInner;
use crate::Len;

const OK: &str = "ok";
const ERR: &str = "err";
const OVERFLOW: &str = "overflow";

/// Longest header we look for: the longest status word, a space, `usize::MAX` and a newline.
pub const MAX_HEADER_LEN: Len = OVERFLOW.len() + 1 + 20 + 1;

fn digits(mut n: Len) -> Len {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

/// Bytes needed for a destination that can hold `payload_len` bytes under any status.
/// `None` when that does not fit in a `Len`, e.g. a host claiming `Len::MAX` payload bytes.
pub fn capacity_for(payload_len: Len) -> Option<Len> {
    (OVERFLOW.len() + 1 + digits(payload_len) + 1).checked_add(payload_len)
}

/// A parsed destination, borrowing from it.
#[derive(Debug, PartialEq, Eq)]
pub enum Envelope<'a> {
    Ok { payload: &'a [u8] },
    Err { message: &'a str },
    Overflow { required: Len },
}

impl<'a> Envelope<'a> {
    pub fn parse(destination: &'a [u8]) -> Result<Self, BridgeError> {
        let window = &destination[..destination.len().min(MAX_HEADER_LEN)];
        let newline = match window.iter().position(|b| *b == b'\n') {
            Some(newline) => newline,
            None if window.iter().all(|b| *b == 0) => {
                return Err(malformed!("response destination was never written"))
            }
            None => return Err(malformed!("response envelope has no header")),
        };
        let header = std::str::from_utf8(&window[..newline])
            .map_err(|_| malformed!("response envelope header is not text"))?;
        let (status, len) = header
            .split_once(' ')
            .ok_or_else(|| malformed!("response envelope header {header:?}"))?;
        if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed!("response envelope length {len:?}"));
        }
        let len: Len = len
            .parse()
            .map_err(|_| malformed!("response envelope length {len} does not fit"))?;

        let body = &destination[newline + 1..];
        let payload = move || -> Result<&'a [u8], BridgeError> {
            body.get(..len).ok_or(bridge_error!(BridgeErrorInner::BufferOverflow {
                capacity: body.len(),
                written: len,
            }))
        };

        Ok(match status {
            OK => Envelope::Ok { payload: payload()? },
            ERR => Envelope::Err {
                message: std::str::from_utf8(payload()?).map_err(|e| bridge_error!(e))?,
            },
            OVERFLOW => Envelope::Overflow { required: len },
            _ => return Err(malformed!("unknown response status {status:?}")),
        })
    }

    /// Offset of the payload from the start of the destination, once parsed.
    pub fn payload_offset(destination: &[u8]) -> Option<Len> {
        destination[..destination.len().min(MAX_HEADER_LEN)]
            .iter()
            .position(|b| *b == b'\n')
            .map(|newline| newline + 1)
    }
}

/// What a host wants to say in a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply<'a> {
    Ok(&'a [u8]),
    Err(&'a str),
}

/// What a host actually managed to say.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Written {
    /// header plus payload bytes written
    Reply(Len),
    /// the payload did not fit, an overflow header asking for this many payload bytes was
    /// written instead
    Overflow { required: Len },
}

/// Host side of the envelope. Never writes past the end of `destination`.
pub fn write_reply(destination: &mut [u8], reply: Reply<'_>) -> Result<Written, BridgeError> {
    let (status, payload) = match reply {
        Reply::Ok(payload) => (OK, payload),
        Reply::Err(message) => (ERR, message.as_bytes()),
    };
    let header = format!("{status} {}\n", payload.len());
    let total = header.len() + payload.len();
    if total <= destination.len() {
        destination[..header.len()].copy_from_slice(header.as_bytes());
        destination[header.len()..total].copy_from_slice(payload);
        return Ok(Written::Reply(total));
    }

    let overflow = format!("{OVERFLOW} {}\n", payload.len());
    if overflow.len() > destination.len() {
        return Err(bridge_error!(BridgeErrorInner::BufferOverflow {
            capacity: destination.len(),
            written: overflow.len(),
        }));
    }
    destination[..overflow.len()].copy_from_slice(overflow.as_bytes());
    Ok(Written::Overflow {
        required: payload.len(),
    })
}
