//! Tests that drive the guest crates natively, through `test_common::MockHost` or small
//! purpose built hosts, plus the fixtures the benches share with them.

pub mod boundary;
pub mod effects;
pub mod memory;
pub mod properties;
pub mod scenarios;

use effect_bridge_guest::*;
use rand::distributions::Alphanumeric;
use rand::prelude::*;

pub const EXAMPLE_URL: &str = "https://example.com";
pub const CHAT_ENDPOINT: &str = "https://api.example.com/v1/chat/completions";

/// A chat completion body the way an openai compatible endpoint returns it.
pub fn chat_completion(content: &str) -> Vec<u8> {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "small-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop",
        }],
        "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 },
    })
    .to_string()
    .into_bytes()
}

/// Text that leans on everything structural in the record encoding.
pub fn nasty_text<R: Rng>(rng: &mut R, len: usize) -> String {
    const PIECES: &[&str] = &["\n", "=", ":", "fx1:", "log", "text=3:", "0", "é", "╰▐", "\u{0}"];
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.5) {
                PIECES[rng.gen_range(0..PIECES.len())].to_string()
            } else {
                char::from(rng.sample(Alphanumeric)).to_string()
            }
        })
        .collect()
}

/// One record of every kind, with random text and addresses.
pub fn random_records<R: Rng>(rng: &mut R) -> Vec<RequestRecord> {
    let slice = |rng: &mut R| {
        let len = rng.gen_range(0..=LARGE_RESPONSE_CAPACITY);
        RawSlice::new(rng.gen_range(0..=usize::MAX - len), len).expect("fits in usize")
    };
    let methods = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Options,
    ];
    let levels = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];
    vec![
        HttpRequest {
            verb: *methods.choose(rng).expect("non empty"),
            url: nasty_text(rng, 20),
            headers: nasty_text(rng, 10),
            body: nasty_text(rng, 100),
            destination: slice(rng),
        }
        .into(),
        FileWrite {
            path: nasty_text(rng, 12),
            content: slice(rng),
        }
        .into(),
        LogMessage {
            level: *levels.choose(rng).expect("non empty"),
            text: nasty_text(rng, 50),
        }
        .into(),
        PlatformCall {
            function: nasty_text(rng, 8),
            payload: nasty_text(rng, 30),
            destination: slice(rng),
        }
        .into(),
    ]
}
