//! The text encoding shared by guest and host.
//!
//! A record is a header line naming the format and the record kind, followed by one line per
//! field. Every value is prefixed with its length in bytes so it is copied out by length, never
//! by scanning for a delimiter:
//!
//! ```text
//! fx1:http_request
//! verb=3:GET
//! url=19:https://example.com
//! ```
//!
//! Values may therefore contain newlines, `=` or `:` without any escaping. Keys and kinds are
//! restricted to `[a-z0-9_]` so the structure itself is never ambiguous.
//!
//! The host and guest share no code generator, so decoding is strict: anything that is not
//! exactly the expected shape is a MalformedEncoding error rather than a best guess.

use crate::bridge_error;
use crate::malformed;
use crate::BridgeError;
use crate::Len;

pub const FORMAT_TAG: &str = "fx1";

fn is_key(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Builds one encoded record. Field order is the call order, so the same sequence of calls
/// always produces the same bytes.
#[derive(Debug)]
pub struct RecordWriter {
    buf: String,
}

impl RecordWriter {
    pub fn new(kind: &str) -> Self {
        debug_assert!(is_key(kind), "record kind {kind:?}");
        let mut buf = String::with_capacity(64);
        buf.push_str(FORMAT_TAG);
        buf.push(':');
        buf.push_str(kind);
        buf.push('\n');
        Self { buf }
    }

    pub fn field(&mut self, key: &str, value: &str) -> &mut Self {
        debug_assert!(is_key(key), "record key {key:?}");
        self.buf.push_str(key);
        self.buf.push('=');
        self.buf.push_str(&value.len().to_string());
        self.buf.push(':');
        self.buf.push_str(value);
        self.buf.push('\n');
        self
    }

    pub fn number(&mut self, key: &str, value: Len) -> &mut Self {
        self.field(key, &value.to_string())
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf.into_bytes()
    }
}

/// A parsed but not yet interpreted record. Fields are borrowed from the input bytes.
#[derive(Debug)]
pub struct TextRecord<'a> {
    kind: &'a str,
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> TextRecord<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self, BridgeError> {
        let text = std::str::from_utf8(bytes).map_err(|e| bridge_error!(e))?;
        let (header, mut rest) = text
            .split_once('\n')
            .ok_or_else(|| malformed!("record has no header line"))?;
        let kind = header
            .strip_prefix(FORMAT_TAG)
            .and_then(|h| h.strip_prefix(':'))
            .filter(|kind| is_key(kind))
            .ok_or_else(|| malformed!("unrecognised record header {header:?}"))?;

        let mut fields: Vec<(&'a str, &'a str)> = Vec::new();
        while !rest.is_empty() {
            let (key, after_key) = rest
                .split_once('=')
                .ok_or_else(|| malformed!("field without a key in {kind} record"))?;
            if !is_key(key) {
                return Err(malformed!("invalid field key {key:?} in {kind} record"));
            }
            let (len, after_len) = after_key
                .split_once(':')
                .ok_or_else(|| malformed!("field {key} has no length prefix"))?;
            if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed!("field {key} has length prefix {len:?}"));
            }
            let len: Len = len
                .parse()
                .map_err(|_| malformed!("field {key} length {len} does not fit"))?;
            // get() also refuses a length that would cut a character in half
            let value = after_len.get(..len).ok_or_else(|| {
                malformed!("field {key} is shorter than its {len} byte prefix or splits a character")
            })?;
            rest = after_len[len..]
                .strip_prefix('\n')
                .ok_or_else(|| malformed!("field {key} is not terminated"))?;
            if fields.iter().any(|(k, _)| *k == key) {
                return Err(malformed!("duplicate field {key} in {kind} record"));
            }
            fields.push((key, value));
        }

        Ok(Self { kind, fields })
    }

    pub fn kind(&self) -> &'a str {
        self.kind
    }

    pub fn expect_kind(&self, kind: &str) -> Result<(), BridgeError> {
        if self.kind != kind {
            return Err(malformed!("expected a {kind} record, found {}", self.kind));
        }
        Ok(())
    }

    /// Removes a field so `finish` can tell whether anything was left unread.
    pub fn take(&mut self, key: &str) -> Result<&'a str, BridgeError> {
        let position = self
            .fields
            .iter()
            .position(|(k, _)| *k == key)
            .ok_or_else(|| malformed!("{} record is missing field {key}", self.kind))?;
        Ok(self.fields.remove(position).1)
    }

    pub fn take_number(&mut self, key: &str) -> Result<Len, BridgeError> {
        let value = self.take(key)?;
        value
            .parse()
            .map_err(|_| malformed!("field {key} is not a number: {value:?}"))
    }

    pub fn finish(self) -> Result<(), BridgeError> {
        match self.fields.first() {
            Some((key, _)) => Err(malformed!("unexpected field {key} in {} record", self.kind)),
            None => Ok(()),
        }
    }
}

pub trait TextEncode {
    fn kind(&self) -> &'static str;
    fn write_fields(&self, writer: &mut RecordWriter);
}

pub trait TextDecode: Sized {
    fn read_record(record: &mut TextRecord<'_>) -> Result<Self, BridgeError>;
}

pub fn encode<T: TextEncode + ?Sized>(value: &T) -> Vec<u8> {
    let mut writer = RecordWriter::new(value.kind());
    value.write_fields(&mut writer);
    writer.finish()
}

pub fn decode<T: TextDecode>(bytes: &[u8]) -> Result<T, BridgeError> {
    let mut record = TextRecord::parse(bytes)?;
    let value = T::read_record(&mut record)?;
    record.finish()?;
    Ok(value)
}

/// Interprets a response payload as text.
///
/// Hosts that fill a destination without saying how much they wrote leave the rest zeroed,
/// so trailing NULs are padding and never part of the text.
pub fn decode_text(bytes: &[u8]) -> Result<&str, BridgeError> {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    std::str::from_utf8(&bytes[..end]).map_err(|e| bridge_error!(e))
}
