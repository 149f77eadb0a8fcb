//! In-memory state: contractor/order registry and per-bot dialogue stores

pub mod dialogue;
pub mod registry;

// Re-exports for convenience
pub use dialogue::DialogueStore;
pub use registry::{ExecutorsByStatus, Registry, ResponseOutcome};
