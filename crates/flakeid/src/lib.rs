#![doc = include_str!("../README.md")]

extern crate alloc;

mod base32;
pub mod basen;
mod error;
mod format;
mod generator;
mod id;
mod mutex;
mod rand;
#[cfg(feature = "serde")]
pub mod serde;
mod time;

pub use crate::base32::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand::*;
pub use crate::time::*;
