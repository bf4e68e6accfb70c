use alloc::{rc::Rc, sync::Arc};

use crate::{SnowflakeId, generator::GeneratorConfig};

/// Something that hands out unique, time-ordered [`SnowflakeId`]s.
///
/// Creation never fails and never blocks on the clock: when a millisecond's
/// counter space is exhausted the emitted timestamp runs ahead of the wall
/// clock instead.
pub trait SnowflakeGenerator {
    /// Returns the next id.
    fn create(&self) -> SnowflakeId;

    /// The layout every id from this generator is packed with.
    fn config(&self) -> &GeneratorConfig;
}

impl<G: SnowflakeGenerator + ?Sized> SnowflakeGenerator for &G {
    fn create(&self) -> SnowflakeId {
        (**self).create()
    }

    fn config(&self) -> &GeneratorConfig {
        (**self).config()
    }
}

impl<G: SnowflakeGenerator + ?Sized> SnowflakeGenerator for Arc<G> {
    fn create(&self) -> SnowflakeId {
        (**self).create()
    }

    fn config(&self) -> &GeneratorConfig {
        (**self).config()
    }
}

impl<G: SnowflakeGenerator + ?Sized> SnowflakeGenerator for Rc<G> {
    fn create(&self) -> SnowflakeId {
        (**self).create()
    }

    fn config(&self) -> &GeneratorConfig {
        (**self).config()
    }
}
