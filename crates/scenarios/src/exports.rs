use crate::chat;
use crate::chat::ChatConfig;
use crate::mirror;
use crate::mirror::MirrorConfig;
use crate::run_entry;
use effect_bridge_guest::prelude::*;

#[no_mangle]
pub extern "C" fn log_line() {
    run_entry(WasmHost, "log_line", Ok(BridgeConfig::default()), crate::log_line);
}

/// Exports `name(ptr, len)` taking its json config from an `__effects_allocate`d buffer.
macro_rules! entry_points {
    ( $( $name:ident : $config:ty => $run:path ),* $(,)? ) => {
        $(
            #[no_mangle]
            pub extern "C" fn $name(ptr: GuestPtr, len: Len) {
                // SAFETY: the host wrote the argument into memory it got from __effects_allocate
                let config = unsafe { host_args::<$config>(ptr, len) };
                run_entry(WasmHost, stringify!($name), config, $run);
            }
        )*
    };
}

entry_points!(
    relay_chat: ChatConfig => chat::relay_chat,
    mirror_resource: MirrorConfig => mirror::mirror_resource,
);
