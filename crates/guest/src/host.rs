use effect_bridge_common::GuestSlice;
use effect_bridge_common::ReadOnly;

/// The functions a host provides to the guest.
///
/// On wasm32 these are the `env.__effects_*` imports, see `WasmHost`. Anything else that can
/// read the guest's memory, e.g. an in-process test host, can implement the trait too.
///
/// Every call is synchronous. The host must be done with every slice it was given before it
/// returns, and must only write inside destinations that a request record names.
pub trait HostImports {
    /// `message` holds an encoded `LogMessage`.
    fn log(&self, message: GuestSlice<'_, ReadOnly>);

    /// `request` holds an encoded `HttpRequest`, the answer goes into its destination.
    fn http_request(&self, request: GuestSlice<'_, ReadOnly>);

    /// `path` holds the utf-8 path, `content` the bytes to write there.
    fn write_file(&self, path: GuestSlice<'_, ReadOnly>, content: GuestSlice<'_, ReadOnly>);

    /// `request` holds an encoded `PlatformCall`, the answer goes into its destination.
    fn platform_call(&self, request: GuestSlice<'_, ReadOnly>);
}

impl<H: HostImports + ?Sized> HostImports for &H {
    fn log(&self, message: GuestSlice<'_, ReadOnly>) {
        (**self).log(message)
    }

    fn http_request(&self, request: GuestSlice<'_, ReadOnly>) {
        (**self).http_request(request)
    }

    fn write_file(&self, path: GuestSlice<'_, ReadOnly>, content: GuestSlice<'_, ReadOnly>) {
        (**self).write_file(path, content)
    }

    fn platform_call(&self, request: GuestSlice<'_, ReadOnly>) {
        (**self).platform_call(request)
    }
}

/// Declares the host imports under the `env` module as `__effects_<name>`.
/// The number after the colon is how many (ptr, len) pairs the import takes.
#[macro_export]
macro_rules! host_externs {
    (@import $func_name:ident 1) => {
        $crate::paste::paste! {
            #[link(wasm_import_module = "env")]
            extern "C" {
                fn [<__effects_ $func_name>](ptr: $crate::GuestPtr, len: $crate::Len);
            }
        }
    };
    (@import $func_name:ident 2) => {
        $crate::paste::paste! {
            #[link(wasm_import_module = "env")]
            extern "C" {
                fn [<__effects_ $func_name>](
                    first_ptr: $crate::GuestPtr,
                    first_len: $crate::Len,
                    second_ptr: $crate::GuestPtr,
                    second_len: $crate::Len,
                );
            }
        }
    };
    ( $( $func_name:ident:$pairs:tt ),* $(,)? ) => {
        $( $crate::host_externs!(@import $func_name $pairs); )*
    };
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::HostImports;
    use effect_bridge_common::GuestSlice;
    use effect_bridge_common::ReadOnly;

    crate::host_externs!(log:1, http_request:1, write_file:2, platform_call:1);

    /// The real host, reached through wasm imports.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct WasmHost;

    impl HostImports for WasmHost {
        fn log(&self, message: GuestSlice<'_, ReadOnly>) {
            unsafe { __effects_log(message.ptr(), message.len()) }
        }

        fn http_request(&self, request: GuestSlice<'_, ReadOnly>) {
            unsafe { __effects_http_request(request.ptr(), request.len()) }
        }

        fn write_file(&self, path: GuestSlice<'_, ReadOnly>, content: GuestSlice<'_, ReadOnly>) {
            unsafe { __effects_write_file(path.ptr(), path.len(), content.ptr(), content.len()) }
        }

        fn platform_call(&self, request: GuestSlice<'_, ReadOnly>) {
            unsafe { __effects_platform_call(request.ptr(), request.len()) }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::WasmHost;
