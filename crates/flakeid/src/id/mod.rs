#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
mod fast;
mod snowflake;

pub use snowflake::*;
