use effect_bridge_common::*;
use serde::de::DeserializeOwned;

#[no_mangle]
/// allocate a length of zeroed bytes that won't be dropped by the allocator
/// return the pointer to it so the host can write an entry point argument into it
pub extern "C" fn __effects_allocate(len: Len) -> GuestPtr {
    write_bytes(vec![0; len])
}

#[no_mangle]
/// free an allocation made with `__effects_allocate` that the host never handed to an entry
/// point, e.g. because writing the argument failed
pub extern "C" fn __effects_deallocate(guest_ptr: GuestPtr, len: Len) {
    // SAFETY: the host promises the pair came from `__effects_allocate`
    let _ = unsafe { consume_bytes(guest_ptr, len) };
}

/// leak bytes so that they outlive the current call
/// the returned pointer must eventually round trip through `consume_bytes` with the same length
pub fn write_bytes(bytes: Vec<u8>) -> GuestPtr {
    Box::into_raw(bytes.into_boxed_slice()) as *mut u8 as GuestPtr
}

/// take back ownership of bytes previously leaked by `write_bytes` or `__effects_allocate`
///
/// # Safety
///
/// `guest_ptr` and `len` must be exactly a pair produced by one earlier allocation and must
/// not be used again afterwards. A zero length is always fine, whatever the pointer.
pub unsafe fn consume_bytes(guest_ptr: GuestPtr, len: Len) -> Vec<u8> {
    if len == 0 {
        // zero sized boxes never allocated anything and hosts often send a null pointer
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(guest_ptr as *mut u8, len);
    Box::from_raw(slice).into_vec()
}

/// given the (ptr, len) an entry point was called with:
/// - take ownership of the bytes so they are freed on return
/// - deserialize them as json into the entry point's argument type
///
/// # Safety
///
/// Same contract as `consume_bytes`.
pub unsafe fn host_args<T: DeserializeOwned>(
    guest_ptr: GuestPtr,
    len: Len,
) -> Result<T, BridgeError> {
    let bytes = consume_bytes(guest_ptr, len);
    serde_json::from_slice(&bytes)
        .map_err(|e| bridge_error!(BridgeErrorInner::Config(e.to_string())))
}
