use crate::bridge_error;
use crate::BridgeError;
use crate::BridgeErrorInner;
use crate::GuestPtr;
use crate::Len;
use std::marker::PhantomData;

mod sealed {
    pub trait Sealed {}
}

/// Marker for what the receiving side of a boundary call may do with a slice.
pub trait Access: sealed::Sealed {
    const MODE: &'static str;
}

/// The host may only read the bytes, e.g. an encoded request.
#[derive(Debug)]
pub enum ReadOnly {}

/// The host may only write the bytes, e.g. a response destination.
#[derive(Debug)]
pub enum WriteOnly {}

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for WriteOnly {}

impl Access for ReadOnly {
    const MODE: &'static str = "read";
}

impl Access for WriteOnly {
    const MODE: &'static str = "write";
}

/// RawSlice is an offset/length pair into guest linear memory with nothing else attached.
///
/// This is the shape an address takes once it has been written into an encoded record, so it
/// is what a host sees after decoding one. It carries no lifetime, so it is never handed to
/// the host directly by the guest; the guest always goes through GuestSlice.
///
/// the offset always represents a position in wasm linear memory _never_ on the host
/// the length always represents u8 bytes _not_ items
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawSlice {
    ptr: GuestPtr,
    len: Len,
}

impl RawSlice {
    /// Fails if the range would run past the end of the address space.
    pub fn new(ptr: GuestPtr, len: Len) -> Result<Self, BridgeError> {
        ptr.checked_add(len)
            .ok_or(bridge_error!(BridgeErrorInner::PointerMap))?;
        Ok(Self { ptr, len })
    }

    pub fn ptr(&self) -> GuestPtr {
        self.ptr
    }

    pub fn len(&self) -> Len {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte. Cannot overflow, `new` already checked.
    pub fn end(&self) -> GuestPtr {
        self.ptr + self.len
    }

    /// A host must call this against the current memory size before touching the range.
    pub fn check_within(&self, memory_len: Len) -> Result<(), BridgeError> {
        if self.end() > memory_len {
            return Err(bridge_error!(BridgeErrorInner::PointerMap));
        }
        Ok(())
    }

    pub fn overlaps(&self, other: &RawSlice) -> bool {
        !self.is_empty() && !other.is_empty() && self.ptr < other.end() && other.ptr < self.end()
    }
}

/// GuestSlice is the capability the guest hands to the host for the duration of one call.
///
/// It pairs a RawSlice with an access mode and with the lifetime of the buffer it was taken
/// from. The only constructors borrow a real rust slice, so:
///
/// - the length can't disagree with the allocation it describes
/// - the buffer can't be dropped or reused while the slice is alive (the borrow checker sees to
///   it), which is exactly the "valid for the whole host call" rule of the boundary
/// - a destination can't be cloned into two in-flight calls, only read-only slices are Copy
///
/// ```compile_fail
/// use effect_bridge_common::GuestSlice;
///
/// let slice = {
///     let bytes = vec![1_u8, 2, 3];
///     GuestSlice::read(&bytes)
/// };
/// assert_eq!(3, slice.len());
/// ```
#[derive(Debug)]
pub struct GuestSlice<'a, A: Access> {
    raw: RawSlice,
    _borrow: PhantomData<(&'a [u8], A)>,
}

impl<'a> GuestSlice<'a, ReadOnly> {
    pub fn read(bytes: &'a [u8]) -> Self {
        Self {
            raw: RawSlice {
                ptr: bytes.as_ptr() as GuestPtr,
                len: bytes.len(),
            },
            _borrow: PhantomData,
        }
    }
}

impl<'a> GuestSlice<'a, WriteOnly> {
    pub fn write(bytes: &'a mut [u8]) -> Self {
        Self {
            raw: RawSlice {
                ptr: bytes.as_mut_ptr() as GuestPtr,
                len: bytes.len(),
            },
            _borrow: PhantomData,
        }
    }
}

impl<A: Access> GuestSlice<'_, A> {
    pub fn ptr(&self) -> GuestPtr {
        self.raw.ptr
    }

    pub fn len(&self) -> Len {
        self.raw.len
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The lifetime-free form, for embedding in an encoded record.
    pub fn raw(&self) -> RawSlice {
        self.raw
    }

    pub fn mode(&self) -> &'static str {
        A::MODE
    }
}

impl Clone for GuestSlice<'_, ReadOnly> {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for GuestSlice<'_, ReadOnly> {}
