use crate::boundary::Boundary;
use crate::boundary::OneWayFn;
use crate::boundary::PairFn;
use crate::boundary::Response;
use crate::boundary::ResponseFn;
use crate::boundary::ResponsePolicy;
use crate::buffer::RequestBuffer;
use crate::config::BridgeConfig;
use crate::host::HostImports;
use effect_bridge_common::*;

/// The effects a guest can ask its host for, as plain rust calls.
#[derive(Clone, Debug)]
pub struct Effects<H> {
    boundary: Boundary<H>,
    config: BridgeConfig,
}

impl<H: HostImports> Effects<H> {
    pub fn new(host: H, config: BridgeConfig) -> Self {
        Self {
            boundary: Boundary::new(host),
            config,
        }
    }

    pub fn boundary(&self) -> &Boundary<H> {
        &self.boundary
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn emit_log(&self, level: LogLevel, text: &str) {
        let request = RequestBuffer::encode(&LogMessage {
            level,
            text: text.to_string(),
        });
        self.boundary.call(OneWayFn::Log, &request);
    }

    /// `headers` and `body` are passed through to the host as they are, typically json.
    ///
    /// Only idempotent methods are re-issued when the answer is bigger than
    /// `large_capacity`. A POST that overflows fails with ResponseTooLarge rather than being
    /// performed twice.
    pub fn perform_http(
        &self,
        verb: Method,
        url: &str,
        headers: &str,
        body: &str,
    ) -> Result<Response, BridgeError> {
        let policy = if verb.is_idempotent() {
            ResponsePolicy::regrowable(self.config.large_capacity, self.config.max_capacity)
        } else {
            ResponsePolicy::fixed(self.config.large_capacity)
        };
        tracing::debug!(%verb, url, "http request");
        self.boundary
            .call_with_response(ResponseFn::HttpRequest, policy, |destination| {
                HttpRequest {
                    verb,
                    url: url.to_string(),
                    headers: headers.to_string(),
                    body: body.to_string(),
                    destination,
                }
                .into()
            })
    }

    /// The content is lent to the host where it already lives, nothing is copied.
    pub fn write_file(&self, path: &str, content: GuestSlice<'_, ReadOnly>) {
        tracing::debug!(path, len = content.len(), "write file");
        let path = RequestBuffer::from_text(path);
        self.boundary
            .call_pair(PairFn::WriteFile, path.as_guest_slice(), content);
    }

    /// Calls a function the host application registered under `function`.
    /// Answers are expected to be short, they are never regrown.
    pub fn call_platform(&self, function: &str, payload: &str) -> Result<Response, BridgeError> {
        tracing::debug!(function, "platform call");
        self.boundary.call_with_response(
            ResponseFn::PlatformCall,
            ResponsePolicy::fixed(self.config.small_capacity),
            |destination| {
                PlatformCall {
                    function: function.to_string(),
                    payload: payload.to_string(),
                    destination,
                }
                .into()
            },
        )
    }
}
