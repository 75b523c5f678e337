use crate::EntryConfig;
use effect_bridge_guest::prelude::*;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub url: String,
    /// where the host should put the body
    pub path: String,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

impl EntryConfig for MirrorConfig {
    fn bridge(&self) -> &BridgeConfig {
        &self.bridge
    }
}

/// GETs `url` and has the host write the body to `path`, straight out of the destination it
/// arrived in. Returns the number of bytes written.
pub fn mirror_resource<H: HostImports>(
    effects: &Effects<H>,
    config: &MirrorConfig,
) -> Result<Len, BridgeError> {
    let response = effects.perform_http(Method::Get, &config.url, "{}", "{}")?;
    let content = response.as_guest_slice();
    effects.write_file(&config.path, content);
    tracing::debug!(url = %config.url, path = %config.path, len = content.len(), "mirrored");
    Ok(content.len())
}
