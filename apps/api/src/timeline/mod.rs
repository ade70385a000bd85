//! Case timeline: seven court stages, each with a task checklist.

pub mod handlers;
pub mod progress;
pub mod store;
pub mod template;
