pub mod codec;
pub mod envelope;
pub mod error;
pub mod record;
pub mod slice;

pub use codec::*;
pub use envelope::*;
pub use error::*;
pub use record::*;
pub use slice::*;

/// Offsets and lengths into the guest's linear memory.
///
/// The guest is compiled for wasm32 so in production these are 32 bits wide, the same width
/// wasm itself uses for addresses. They only cross the boundary either as raw wasm `i32`
/// arguments or as decimal text inside an encoded record, so the host never has to agree with
/// the guest on the in-memory width of `usize`.
pub type GuestPtr = usize;
pub type Len = usize;

/// Reply capacity for effects that answer with a few lines of text.
pub const SMALL_RESPONSE_CAPACITY: Len = 2048;

/// Reply capacity for effects that answer with a whole http body.
pub const LARGE_RESPONSE_CAPACITY: Len = 1_000_000;

/// Hard ceiling for a regrown destination.
pub const MAX_RESPONSE_CAPACITY: Len = 16 * 1024 * 1024;
