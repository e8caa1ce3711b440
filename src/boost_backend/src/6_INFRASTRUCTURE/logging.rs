//! Logging - canister debug log on wasm32, stderr on the host
//!
//! Pure zones log through `log!` so they stay runnable under `cargo test`,
//! where the replica's debug_print is not available.

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::infrastructure::logging::emit(&format!($($arg)*))
    };
}

pub fn emit(line: &str) {
    #[cfg(target_arch = "wasm32")]
    ic_cdk::println!("{}", line);

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", line);
}
