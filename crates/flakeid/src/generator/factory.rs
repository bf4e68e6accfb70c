use crate::{
    Result,
    generator::{GeneratorBuilder, LockSnowflakeGenerator},
    rand::ThreadRandom,
    time::SystemClock,
};

/// A generator on the system clock with thread-local randomness.
pub type DefaultGenerator = LockSnowflakeGenerator<SystemClock, ThreadRandom>;

/// 256 nodes, 16384 ids per millisecond per node.
pub const NODE_BITS_256: u8 = 8;
/// 1024 nodes, 4096 ids per millisecond per node.
pub const NODE_BITS_1024: u8 = 10;
/// 4096 nodes, 1024 ids per millisecond per node.
pub const NODE_BITS_4096: u8 = 12;

/// A generator for up to 256 nodes. The node id comes from the environment
/// or is random.
///
/// # Errors
///
/// See [`GeneratorBuilder::build`].
pub fn new_256() -> Result<DefaultGenerator> {
    GeneratorBuilder::new().with_node_bits(NODE_BITS_256).build()
}

/// A generator for node `node` out of 256.
///
/// # Errors
///
/// [`Error::NodeOutOfRange`](crate::Error::NodeOutOfRange) if `node > 255`.
pub fn new_256_with_node(node: u32) -> Result<DefaultGenerator> {
    GeneratorBuilder::new()
        .with_node_bits(NODE_BITS_256)
        .with_node(node)
        .build()
}

/// A generator for up to 1024 nodes.
///
/// # Errors
///
/// See [`GeneratorBuilder::build`].
pub fn new_1024() -> Result<DefaultGenerator> {
    GeneratorBuilder::new().with_node_bits(NODE_BITS_1024).build()
}

/// # Errors
///
/// [`Error::NodeOutOfRange`](crate::Error::NodeOutOfRange) if `node > 1023`.
pub fn new_1024_with_node(node: u32) -> Result<DefaultGenerator> {
    GeneratorBuilder::new()
        .with_node_bits(NODE_BITS_1024)
        .with_node(node)
        .build()
}

/// A generator for up to 4096 nodes.
///
/// # Errors
///
/// See [`GeneratorBuilder::build`].
pub fn new_4096() -> Result<DefaultGenerator> {
    GeneratorBuilder::new().with_node_bits(NODE_BITS_4096).build()
}

/// # Errors
///
/// [`Error::NodeOutOfRange`](crate::Error::NodeOutOfRange) if `node > 4095`.
pub fn new_4096_with_node(node: u32) -> Result<DefaultGenerator> {
    GeneratorBuilder::new()
        .with_node_bits(NODE_BITS_4096)
        .with_node(node)
        .build()
}
