use crate::buffer::Destination;
use crate::buffer::RequestBuffer;
use crate::host::HostImports;
use effect_bridge_common::*;
use serde::de::DeserializeOwned;
use std::fmt;
use std::ops::Range;

/// Host functions that take one (ptr, len) pair and answer nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OneWayFn {
    Log,
}

/// Host functions that take two independent (ptr, len) pairs and answer nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairFn {
    WriteFile,
}

/// Host functions that answer into a destination embedded in their request record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseFn {
    HttpRequest,
    PlatformCall,
}

impl OneWayFn {
    pub fn import_name(&self) -> &'static str {
        match self {
            OneWayFn::Log => "__effects_log",
        }
    }
}

impl PairFn {
    pub fn import_name(&self) -> &'static str {
        match self {
            PairFn::WriteFile => "__effects_write_file",
        }
    }
}

impl ResponseFn {
    pub fn import_name(&self) -> &'static str {
        match self {
            ResponseFn::HttpRequest => "__effects_http_request",
            ResponseFn::PlatformCall => "__effects_platform_call",
        }
    }
}

macro_rules! display_import_name {
    ( $( $t:ty ),* ) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.import_name())
                }
            }
        )*
    };
}

display_import_name!(OneWayFn, PairFn, ResponseFn);

/// How big a destination to offer and what to do when the host says it is too small.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponsePolicy {
    pub capacity: Len,
    /// ceiling for a regrown destination
    pub max_capacity: Len,
    /// whether the call may be issued a second time with a bigger destination
    /// only safe when performing the effect twice is harmless
    pub regrow: bool,
}

impl ResponsePolicy {
    pub fn fixed(capacity: Len) -> Self {
        Self {
            capacity,
            max_capacity: capacity,
            regrow: false,
        }
    }

    pub fn regrowable(capacity: Len, max_capacity: Len) -> Self {
        Self {
            capacity,
            max_capacity,
            regrow: true,
        }
    }
}

/// Turns guest values into host calls and host answers back into guest values.
///
/// Every call blocks until the host returns, and the borrow rules on `GuestSlice` keep each
/// buffer alive and untouched by the guest until then.
#[derive(Clone, Debug)]
pub struct Boundary<H> {
    host: H,
}

impl<H: HostImports> Boundary<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn call(&self, function: OneWayFn, request: &RequestBuffer) {
        tracing::trace!(%function, request_len = request.len(), "host call");
        match function {
            OneWayFn::Log => self.host.log(request.as_guest_slice()),
        }
    }

    pub fn call_pair(
        &self,
        function: PairFn,
        first: GuestSlice<'_, ReadOnly>,
        second: GuestSlice<'_, ReadOnly>,
    ) {
        tracing::trace!(
            %function,
            first_len = first.len(),
            second_len = second.len(),
            "host call"
        );
        match function {
            PairFn::WriteFile => self.host.write_file(first, second),
        }
    }

    /// Calls `function` with a request built around a freshly allocated destination.
    ///
    /// `build` receives the destination's address and length and returns the record to send.
    /// It may be called twice: if the host answers `overflow` and `policy` allows it, the
    /// call is issued once more with a destination exactly big enough for the answer.
    pub fn call_with_response<F>(
        &self,
        function: ResponseFn,
        policy: ResponsePolicy,
        build: F,
    ) -> Result<Response, BridgeError>
    where
        F: Fn(RawSlice) -> RequestRecord,
    {
        let mut capacity = policy.capacity;
        let mut reissued = false;
        loop {
            let mut destination = Destination::with_capacity(capacity);
            let target = destination.as_guest_slice();
            let request = RequestBuffer::encode(&build(target.raw()));
            tracing::trace!(
                %function,
                request_len = request.len(),
                capacity,
                "host call"
            );
            self.invoke(function, request.as_guest_slice(), &target);

            let outcome = match Envelope::parse(destination.as_bytes())? {
                Envelope::Ok { payload } => Ok(payload.len()),
                Envelope::Err { message } => {
                    tracing::debug!(%function, message, "host call failed");
                    return Err(bridge_error!(BridgeErrorInner::HostCallFailure {
                        function: function.to_string(),
                        message: message.to_string(),
                    }));
                }
                Envelope::Overflow { required } => Err(required),
            };

            match outcome {
                Ok(payload_len) => {
                    tracing::trace!(%function, payload_len, "host answered");
                    return Response::from_destination(destination, payload_len);
                }
                Err(required) => {
                    let limit = if policy.regrow {
                        policy.max_capacity
                    } else {
                        capacity
                    };
                    // the size comes from the host, it may not even be representable
                    let needed = capacity_for(required).unwrap_or(Len::MAX);
                    if !policy.regrow || reissued || needed > limit {
                        return Err(bridge_error!(BridgeErrorInner::ResponseTooLarge {
                            required: needed,
                            limit,
                        }));
                    }
                    tracing::debug!(%function, capacity, needed, "regrowing response destination");
                    capacity = needed;
                    reissued = true;
                }
            }
        }
    }

    // The destination is only reachable through the address inside the request, so the write
    // borrow is taken here to keep it exclusive until the host returns.
    fn invoke(
        &self,
        function: ResponseFn,
        request: GuestSlice<'_, ReadOnly>,
        _destination: &GuestSlice<'_, WriteOnly>,
    ) {
        match function {
            ResponseFn::HttpRequest => self.host.http_request(request),
            ResponseFn::PlatformCall => self.host.platform_call(request),
        }
    }
}

/// A successful answer, still living in the destination the host wrote it into.
#[derive(Debug)]
pub struct Response {
    destination: Destination,
    payload: Range<Len>,
}

impl Response {
    fn from_destination(destination: Destination, payload_len: Len) -> Result<Self, BridgeError> {
        let start = Envelope::payload_offset(destination.as_bytes())
            .ok_or_else(|| malformed!("response envelope has no header"))?;
        Ok(Self {
            destination,
            payload: start..start + payload_len,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.destination.as_bytes()[self.payload.clone()]
    }

    /// The payload as utf-8 text. The envelope says exactly how long it is, so every byte
    /// counts, NULs included.
    pub fn text(&self) -> Result<&str, BridgeError> {
        std::str::from_utf8(self.bytes()).map_err(|e| bridge_error!(e))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BridgeError> {
        serde_json::from_slice(self.bytes())
            .map_err(|e| malformed!("response is not the expected json: {e}"))
    }

    /// Lends the payload back to the host by reference, e.g. as `write_file` content.
    pub fn as_guest_slice(&self) -> GuestSlice<'_, ReadOnly> {
        GuestSlice::read(self.bytes())
    }

    /// Size of the destination the answer was written into.
    pub fn capacity(&self) -> Len {
        self.destination.capacity()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.destination.into_bytes()[self.payload].to_vec()
    }
}
