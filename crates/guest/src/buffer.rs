use effect_bridge_common::*;

/// An encoded request the guest owns for the duration of one host call.
#[derive(Debug, PartialEq, Eq)]
pub struct RequestBuffer(Vec<u8>);

impl RequestBuffer {
    pub fn encode<T: TextEncode + ?Sized>(record: &T) -> Self {
        Self(codec::encode(record))
    }

    /// Raw utf-8 with no record around it, e.g. the path argument of `write_file`.
    pub fn from_text(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }

    pub fn as_guest_slice(&self) -> GuestSlice<'_, ReadOnly> {
        GuestSlice::read(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> Len {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A zero filled response destination.
///
/// The boxed slice is allocated at exactly `capacity` bytes and never resized, so the length
/// the host is told is always the length that exists. Growing means allocating a new one.
#[derive(Debug)]
pub struct Destination {
    bytes: Box<[u8]>,
}

impl Destination {
    pub fn with_capacity(capacity: Len) -> Self {
        Self {
            bytes: vec![0; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> Len {
        self.bytes.len()
    }

    /// Lends the destination to the host for one call.
    pub fn as_guest_slice(&mut self) -> GuestSlice<'_, WriteOnly> {
        GuestSlice::write(&mut self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Box<[u8]> {
        self.bytes
    }
}
