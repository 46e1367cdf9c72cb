//! Spawning: turn a type id, a pose and options into a registered instance.
//!
//! # Invariants
//! - Unknown types fail before anything is created or registered.
//! - Factories never attach to the scene directly; finished nodes go through
//!   the insertion queue, drained a bounded number per frame.
//! - The spawn boundary reports failures as `None` plus a warning.

mod config;
mod context;
mod dispatch;
mod model;
mod primitive;
mod queue;
#[cfg(test)]
mod testing;

pub use config::SpawnConfig;
pub use context::{SpawnContext, SpawnRequest};
pub use dispatch::{Route, SpawnDispatcher};
pub use model::ModelFactory;
pub use primitive::{LightRig, PrimitiveFactory, SystemKind};
pub use queue::InsertQueue;

use stagehand_assets::AssetError;

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("unresolvable asset type: {0}")]
    UnknownType(String),
    #[error("no descriptor for type key: {0}")]
    MissingDescriptor(String),
    #[error("template for {key} failed to load: {source}")]
    TemplateLoad {
        key: String,
        #[source]
        source: AssetError,
    },
    #[error("template for {0} has no nodes")]
    EmptyTemplate(String),
}

pub fn crate_info() -> &'static str {
    "stagehand-spawn v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("spawn"));
    }
}
