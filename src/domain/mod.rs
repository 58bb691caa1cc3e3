//! Domain layer: foundation primitives and bounded contexts.

pub mod catalog;
pub mod delivery;
pub mod events;
pub mod foundation;
pub mod offer;
pub mod subscription;
