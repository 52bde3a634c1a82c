//! Card system: static definitions, per-battle instances, registry,
//! and the built-in starter catalog.

pub mod catalog;
pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardKind, TraitId};
pub use instance::{CardHandle, CardInstance, HandleAllocator};
pub use registry::CardRegistry;
