use crate::codec::RecordWriter;
use crate::codec::TextDecode;
use crate::codec::TextEncode;
use crate::codec::TextRecord;
use crate::malformed;
use crate::BridgeError;
use crate::RawSlice;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }

    /// Whether the host may perform the request a second time without changing the outcome.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Method::Post | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "PATCH" => Method::Patch,
            "OPTIONS" => Method::Options,
            _ => return Err(malformed!("unknown http method {s:?}")),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => return Err(malformed!("unknown log level {s:?}")),
        })
    }
}

fn read_slice(record: &mut TextRecord<'_>, ptr: &str, len: &str) -> Result<RawSlice, BridgeError> {
    let ptr = record.take_number(ptr)?;
    let len = record.take_number(len)?;
    RawSlice::new(ptr, len)
}

/// An http request for the host to perform. The host writes its response envelope into
/// `destination`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub verb: Method,
    pub url: String,
    /// json object of header names to values, passed through to the host untouched
    pub headers: String,
    pub body: String,
    pub destination: RawSlice,
}

impl HttpRequest {
    pub const KIND: &'static str = "http_request";
}

impl TextEncode for HttpRequest {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn write_fields(&self, writer: &mut RecordWriter) {
        writer
            .field("verb", self.verb.as_str())
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .number("dest_ptr", self.destination.ptr())
            .number("dest_len", self.destination.len());
    }
}

impl TextDecode for HttpRequest {
    fn read_record(record: &mut TextRecord<'_>) -> Result<Self, BridgeError> {
        record.expect_kind(Self::KIND)?;
        Ok(Self {
            verb: record.take("verb")?.parse()?,
            url: record.take("url")?.to_string(),
            headers: record.take("headers")?.to_string(),
            body: record.take("body")?.to_string(),
            destination: read_slice(record, "dest_ptr", "dest_len")?,
        })
    }
}

/// A file for the host to write. The content is referenced, not embedded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileWrite {
    pub path: String,
    pub content: RawSlice,
}

impl FileWrite {
    pub const KIND: &'static str = "file_write";
}

impl TextEncode for FileWrite {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn write_fields(&self, writer: &mut RecordWriter) {
        writer
            .field("path", &self.path)
            .number("content_ptr", self.content.ptr())
            .number("content_len", self.content.len());
    }
}

impl TextDecode for FileWrite {
    fn read_record(record: &mut TextRecord<'_>) -> Result<Self, BridgeError> {
        record.expect_kind(Self::KIND)?;
        Ok(Self {
            path: record.take("path")?.to_string(),
            content: read_slice(record, "content_ptr", "content_len")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogMessage {
    pub level: LogLevel,
    pub text: String,
}

impl LogMessage {
    pub const KIND: &'static str = "log";
}

impl TextEncode for LogMessage {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn write_fields(&self, writer: &mut RecordWriter) {
        writer
            .field("level", self.level.as_str())
            .field("text", &self.text);
    }
}

impl TextDecode for LogMessage {
    fn read_record(record: &mut TextRecord<'_>) -> Result<Self, BridgeError> {
        record.expect_kind(Self::KIND)?;
        Ok(Self {
            level: record.take("level")?.parse()?,
            text: record.take("text")?.to_string(),
        })
    }
}

/// A call to an application defined host extension, answered like an http request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformCall {
    pub function: String,
    pub payload: String,
    pub destination: RawSlice,
}

impl PlatformCall {
    pub const KIND: &'static str = "platform_call";
}

impl TextEncode for PlatformCall {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn write_fields(&self, writer: &mut RecordWriter) {
        writer
            .field("function", &self.function)
            .field("payload", &self.payload)
            .number("dest_ptr", self.destination.ptr())
            .number("dest_len", self.destination.len());
    }
}

impl TextDecode for PlatformCall {
    fn read_record(record: &mut TextRecord<'_>) -> Result<Self, BridgeError> {
        record.expect_kind(Self::KIND)?;
        Ok(Self {
            function: record.take("function")?.to_string(),
            payload: record.take("payload")?.to_string(),
            destination: read_slice(record, "dest_ptr", "dest_len")?,
        })
    }
}

/// Every effect the guest can ask the host for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestRecord {
    Http(HttpRequest),
    FileWrite(FileWrite),
    Log(LogMessage),
    Platform(PlatformCall),
}

impl RequestRecord {
    /// Where the host is expected to write its answer, if anywhere.
    pub fn destination(&self) -> Option<RawSlice> {
        match self {
            RequestRecord::Http(http) => Some(http.destination),
            RequestRecord::Platform(call) => Some(call.destination),
            RequestRecord::FileWrite(_) | RequestRecord::Log(_) => None,
        }
    }
}

impl TextEncode for RequestRecord {
    fn kind(&self) -> &'static str {
        match self {
            RequestRecord::Http(inner) => inner.kind(),
            RequestRecord::FileWrite(inner) => inner.kind(),
            RequestRecord::Log(inner) => inner.kind(),
            RequestRecord::Platform(inner) => inner.kind(),
        }
    }

    fn write_fields(&self, writer: &mut RecordWriter) {
        match self {
            RequestRecord::Http(inner) => inner.write_fields(writer),
            RequestRecord::FileWrite(inner) => inner.write_fields(writer),
            RequestRecord::Log(inner) => inner.write_fields(writer),
            RequestRecord::Platform(inner) => inner.write_fields(writer),
        }
    }
}

impl TextDecode for RequestRecord {
    fn read_record(record: &mut TextRecord<'_>) -> Result<Self, BridgeError> {
        Ok(match record.kind() {
            HttpRequest::KIND => RequestRecord::Http(HttpRequest::read_record(record)?),
            FileWrite::KIND => RequestRecord::FileWrite(FileWrite::read_record(record)?),
            LogMessage::KIND => RequestRecord::Log(LogMessage::read_record(record)?),
            PlatformCall::KIND => RequestRecord::Platform(PlatformCall::read_record(record)?),
            other => return Err(malformed!("unknown record kind {other}")),
        })
    }
}

impl From<HttpRequest> for RequestRecord {
    fn from(r: HttpRequest) -> Self {
        Self::Http(r)
    }
}

impl From<FileWrite> for RequestRecord {
    fn from(r: FileWrite) -> Self {
        Self::FileWrite(r)
    }
}

impl From<LogMessage> for RequestRecord {
    fn from(r: LogMessage) -> Self {
        Self::Log(r)
    }
}

impl From<PlatformCall> for RequestRecord {
    fn from(r: PlatformCall) -> Self {
        Self::Platform(r)
    }
}
