//! An in-process host for driving guest code natively.
//!
//! Guest "memory" is the test process's own memory, so the (ptr, len) pairs the guest hands
//! over are real addresses and the mock reads and writes through them the way a wasm host
//! reads and writes linear memory.

use effect_bridge_guest::*;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// What the mock writes into a response destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockReply {
    Ok(Vec<u8>),
    Err(String),
    /// copied in as is with no envelope, like a host that predates envelopes
    Raw(Vec<u8>),
    /// leave the destination untouched
    Silent,
}

impl MockReply {
    pub fn text(s: &str) -> Self {
        Self::Ok(s.as_bytes().to_vec())
    }
}

/// Every import the guest called, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    Log(LogMessage),
    Http(HttpRequest),
    WriteFile { path: String, content: RawSlice },
    Platform(PlatformCall),
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<HostCall>,
    http: HashMap<(Method, String), Vec<MockReply>>,
    platform: HashMap<String, MockReply>,
}

#[derive(Clone, Debug)]
pub struct MockHost {
    state: Arc<Mutex<MockState>>,
    root: Arc<TempDir>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            state: Default::default(),
            root: Arc::new(TempDir::new().expect("mock host file root")),
        }
    }

    /// Answer every `verb url` request with `reply`.
    pub fn route(&self, verb: Method, url: &str, reply: MockReply) -> &Self {
        self.route_sequence(verb, url, vec![reply])
    }

    /// Answer successive `verb url` requests with `replies` in order, repeating the last one.
    pub fn route_sequence(&self, verb: Method, url: &str, replies: Vec<MockReply>) -> &Self {
        self.state.lock().http.insert((verb, url.to_string()), replies);
        self
    }

    pub fn platform(&self, function: &str, reply: MockReply) -> &Self {
        self.state
            .lock()
            .platform
            .insert(function.to_string(), reply);
        self
    }

    pub fn effects(&self) -> Effects<MockHost> {
        Effects::new(self.clone(), BridgeConfig::default())
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    pub fn logs(&self) -> Vec<LogMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Log(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn http_requests(&self) -> Vec<HttpRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Http(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Where a guest path lands on the real filesystem.
    pub fn host_path(&self, path: &str) -> PathBuf {
        self.root.path().join(path.trim_start_matches('/'))
    }

    pub fn read_file(&self, path: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.host_path(path))
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    fn read(slice: GuestSlice<'_, ReadOnly>) -> Vec<u8> {
        if slice.is_empty() {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(slice.ptr() as *const u8, slice.len()) }.to_vec()
    }

    fn write(destination: RawSlice, reply: &MockReply) {
        if destination.is_empty() {
            return;
        }
        let bytes = unsafe {
            std::slice::from_raw_parts_mut(destination.ptr() as *mut u8, destination.len())
        };
        match reply {
            MockReply::Ok(payload) => {
                write_reply(bytes, Reply::Ok(payload)).expect("destination holds a header");
            }
            MockReply::Err(message) => {
                write_reply(bytes, Reply::Err(message)).expect("destination holds a header");
            }
            MockReply::Raw(raw) => {
                let n = raw.len().min(bytes.len());
                bytes[..n].copy_from_slice(&raw[..n]);
            }
            MockReply::Silent => {}
        }
    }

    fn next_http_reply(&self, verb: Method, url: &str) -> MockReply {
        let mut state = self.state.lock();
        match state.http.get_mut(&(verb, url.to_string())) {
            Some(replies) if replies.len() > 1 => replies.remove(0),
            Some(replies) => replies
                .first()
                .cloned()
                .unwrap_or(MockReply::Silent),
            None => MockReply::Err(format!("no route for {verb} {url}")),
        }
    }
}

impl HostImports for MockHost {
    fn log(&self, message: GuestSlice<'_, ReadOnly>) {
        let message: LogMessage = decode(&Self::read(message)).expect("guest sent a log record");
        self.state.lock().calls.push(HostCall::Log(message));
    }

    fn http_request(&self, request: GuestSlice<'_, ReadOnly>) {
        let request: HttpRequest =
            decode(&Self::read(request)).expect("guest sent an http record");
        self.state.lock().calls.push(HostCall::Http(request.clone()));
        let reply = self.next_http_reply(request.verb, &request.url);
        Self::write(request.destination, &reply);
    }

    fn write_file(&self, path: GuestSlice<'_, ReadOnly>, content: GuestSlice<'_, ReadOnly>) {
        let path = String::from_utf8(Self::read(path)).expect("guest sent a utf-8 path");
        self.state.lock().calls.push(HostCall::WriteFile {
            path: path.clone(),
            content: content.raw(),
        });
        let target = self.host_path(&path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).expect("mock host file root is writable");
        }
        std::fs::write(target, Self::read(content)).expect("mock host file root is writable");
    }

    fn platform_call(&self, request: GuestSlice<'_, ReadOnly>) {
        let call: PlatformCall =
            decode(&Self::read(request)).expect("guest sent a platform record");
        let reply = {
            let mut state = self.state.lock();
            state.calls.push(HostCall::Platform(call.clone()));
            state
                .platform
                .get(&call.function)
                .cloned()
                .unwrap_or_else(|| {
                    MockReply::Err(format!("unknown platform function {}", call.function))
                })
        };
        Self::write(call.destination, &reply);
    }
}
