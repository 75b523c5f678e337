use crate::Len;
use thiserror::Error;

/// Everything that can go wrong while marshalling a call across the boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum BridgeErrorInner {
    /// bytes that should have been an encoded record, envelope or utf-8 payload were not
    /// the string describes the first structural problem found
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),
    /// the host claims to have written more payload into a destination than fits in it
    /// by the time we see this the adjacent memory may already be corrupt
    #[error("host reported {written} payload bytes for a destination with room for {capacity}")]
    BufferOverflow { capacity: Len, written: Len },
    /// the host performed the call and told us, through the response envelope, that the
    /// effect failed
    #[error("host call `{function}` failed: {message}")]
    HostCallFailure { function: String, message: String },
    /// the host needs a bigger destination than we are willing to allocate, or than the call
    /// may be re-issued for
    #[error("response needs {required} bytes but the destination may be at most {limit}")]
    ResponseTooLarge { required: Len, limit: Len },
    /// an offset plus a length overflowed, or fell outside the memory region
    #[error("pointer arithmetic left the guest memory region")]
    PointerMap,
    /// the host handed us configuration we cannot use
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Wraps a BridgeErrorInner with the file and line it was raised on.
/// The easiest way to build one is the `bridge_error!` macro.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("{error} ({file}:{line})")]
pub struct BridgeError {
    pub file: String,
    pub line: u32,
    pub error: BridgeErrorInner,
}

impl BridgeError {
    pub fn inner(&self) -> &BridgeErrorInner {
        &self.error
    }
}

impl From<std::str::Utf8Error> for BridgeErrorInner {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::MalformedEncoding(e.to_string())
    }
}

#[macro_export]
macro_rules! bridge_error {
    ($e:expr) => {
        $crate::BridgeError {
            // file!() uses backslashes up to the package root on windows
            file: file!().replace('\\', "/"),
            line: line!(),
            error: $e.into(),
        }
    };
}

/// Shorthand for the common MalformedEncoding case.
#[macro_export]
macro_rules! malformed {
    ($($arg:tt)*) => {
        $crate::bridge_error!($crate::BridgeErrorInner::MalformedEncoding(std::format!($($arg)*)))
    };
}
