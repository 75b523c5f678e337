//! Tracing for code running inside the guest.
//!
//! There is no stdout in a wasm guest, so formatted events are forwarded to the host's `log`
//! import instead, one encoded `LogMessage` per event, at the event's own level.

use crate::host::HostImports;
use effect_bridge_common::*;
use std::io;
use tracing::Level;
use tracing::Metadata;
use tracing_subscriber::fmt::MakeWriter;

pub fn to_tracing(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

pub fn from_tracing(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

/// Collects one formatted event and hands it to the host when flushed or dropped.
///
/// This talks to the host directly rather than through `Boundary`, which traces its own
/// calls and would feed back into the subscriber.
#[derive(Debug)]
pub struct HostLogWriter<H: HostImports> {
    host: H,
    level: LogLevel,
    buf: Vec<u8>,
}

impl<H: HostImports> HostLogWriter<H> {
    pub fn new(host: H, level: LogLevel) -> Self {
        Self {
            host,
            level,
            buf: Vec::new(),
        }
    }

    fn send(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let bytes = std::mem::take(&mut self.buf);
        let text = String::from_utf8_lossy(&bytes);
        let message = LogMessage {
            level: self.level,
            text: text.trim_end_matches('\n').to_string(),
        };
        let encoded = codec::encode(&message);
        self.host.log(GuestSlice::read(&encoded));
    }
}

impl<H: HostImports> io::Write for HostLogWriter<H> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send();
        Ok(())
    }
}

impl<H: HostImports> Drop for HostLogWriter<H> {
    fn drop(&mut self) {
        self.send();
    }
}

#[derive(Clone, Debug)]
pub struct MakeHostWriter<H> {
    host: H,
}

impl<H> MakeHostWriter<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }
}

impl<'a, H: HostImports + Clone + 'a> MakeWriter<'a> for MakeHostWriter<H> {
    type Writer = HostLogWriter<H>;

    fn make_writer(&'a self) -> Self::Writer {
        HostLogWriter::new(self.host.clone(), LogLevel::Info)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        HostLogWriter::new(self.host.clone(), from_tracing(meta.level()))
    }
}

/// A subscriber that forwards every event at or above `level` to `host`.
///
/// Entry points install it for their own duration with `tracing::subscriber::with_default`.
pub fn subscriber<H>(host: H, level: LogLevel) -> impl tracing::Subscriber + Send + Sync + 'static
where
    H: HostImports + Clone + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(MakeHostWriter::new(host))
        .with_max_level(to_tracing(level))
        .without_time()
        .with_level(false)
        .with_target(true)
        .finish()
}
