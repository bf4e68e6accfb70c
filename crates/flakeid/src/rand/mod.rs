mod interface;
mod source;

pub use interface::*;
pub use source::*;
