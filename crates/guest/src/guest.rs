pub mod allocation;
pub mod boundary;
pub mod buffer;
pub mod config;
pub mod effects;
pub mod host;
pub mod logging;

pub use effect_bridge_common::*;
pub use paste;

pub use boundary::Boundary;
pub use boundary::Response;
pub use boundary::ResponsePolicy;
pub use config::BridgeConfig;
pub use effects::Effects;
pub use host::HostImports;

#[cfg(target_arch = "wasm32")]
pub use host::WasmHost;

pub mod prelude {
    pub use crate::allocation::host_args;
    pub use crate::boundary::Boundary;
    pub use crate::boundary::Response;
    pub use crate::config::BridgeConfig;
    pub use crate::effects::Effects;
    pub use crate::host::HostImports;
    pub use crate::logging;
    pub use effect_bridge_common::BridgeError;
    pub use effect_bridge_common::BridgeErrorInner;
    pub use effect_bridge_common::GuestPtr;
    pub use effect_bridge_common::GuestSlice;
    pub use effect_bridge_common::Len;
    pub use effect_bridge_common::LogLevel;
    pub use effect_bridge_common::Method;
    pub use effect_bridge_common::ReadOnly;

    #[cfg(target_arch = "wasm32")]
    pub use crate::host::WasmHost;
}
