mod atomic;
mod builder;
mod config;
mod factory;
mod interface;
mod lock;
mod state;
#[cfg(test)]
mod tests;

pub use atomic::*;
pub use builder::*;
pub use config::*;
pub use factory::*;
pub use interface::*;
pub use lock::*;
