use effect_bridge_common::*;
use serde::Deserialize;
use serde::Serialize;

/// Knobs the host may set for the bridge itself, passed in as json alongside whatever an entry
/// point needs. Every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// destination size for effects that answer with a few lines of text
    pub small_capacity: Len,
    /// destination size for effects that answer with a whole http body
    pub large_capacity: Len,
    /// nothing is ever regrown past this
    pub max_capacity: Len,
    /// events below this level are not forwarded to the host
    pub log_level: LogLevel,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            small_capacity: SMALL_RESPONSE_CAPACITY,
            large_capacity: LARGE_RESPONSE_CAPACITY,
            max_capacity: MAX_RESPONSE_CAPACITY,
            log_level: LogLevel::Info,
        }
    }
}

impl BridgeConfig {
    pub fn from_json(bytes: &[u8]) -> Result<Self, BridgeError> {
        let config: Self = serde_json::from_slice(bytes)
            .map_err(|e| bridge_error!(BridgeErrorInner::Config(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        let config_error = |message: String| -> Result<(), BridgeError> {
            Err(bridge_error!(BridgeErrorInner::Config(message)))
        };
        for (name, capacity) in [
            ("small_capacity", self.small_capacity),
            ("large_capacity", self.large_capacity),
        ] {
            if capacity < MAX_HEADER_LEN {
                return config_error(format!(
                    "{name} {capacity} cannot hold a response header of {MAX_HEADER_LEN} bytes"
                ));
            }
            if capacity > self.max_capacity {
                return config_error(format!(
                    "{name} {capacity} is above max_capacity {}",
                    self.max_capacity
                ));
            }
        }
        Ok(())
    }
}
