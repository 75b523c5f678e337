//! Entry points a host can drive, each composed from the effects in `effect_bridge_guest`.
//!
//! On wasm32 they are exported as `log_line`, `relay_chat` and `mirror_resource`. Everywhere
//! else they are plain functions over any `HostImports`, which is how they are tested.

pub mod chat;
#[cfg(target_arch = "wasm32")]
mod exports;
pub mod mirror;

use effect_bridge_guest::prelude::*;

/// What `log_line` sends.
pub const LOG_LINE: &str = "https://google.com";

pub fn log_line<H: HostImports>(effects: &Effects<H>, _: &BridgeConfig) -> Result<(), BridgeError> {
    effects.emit_log(LogLevel::Info, LOG_LINE);
    Ok(())
}

/// Entry point arguments that carry bridge settings.
pub trait EntryConfig {
    fn bridge(&self) -> &BridgeConfig;
}

impl EntryConfig for BridgeConfig {
    fn bridge(&self) -> &BridgeConfig {
        self
    }
}

/// Runs one entry point against `host` with a subscriber that forwards tracing to it.
///
/// `config` is whatever decoding the entry point argument produced. Errors never cross the
/// boundary: a failed decode or a failed run is logged at error level and `None` is returned.
pub fn run_entry<H, C, T, F>(
    host: H,
    name: &str,
    config: Result<C, BridgeError>,
    run: F,
) -> Option<T>
where
    H: HostImports + Clone + Send + Sync + 'static,
    C: EntryConfig,
    F: FnOnce(&Effects<H>, &C) -> Result<T, BridgeError>,
{
    let level = config
        .as_ref()
        .map_or(LogLevel::Info, |config| config.bridge().log_level);
    tracing::subscriber::with_default(logging::subscriber(host.clone(), level), || {
        let result = config.and_then(|config| {
            config.bridge().validate()?;
            let effects = Effects::new(host, config.bridge().clone());
            run(&effects, &config)
        });
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::error!(entry = name, %error, "entry point failed");
                None
            }
        }
    })
}
