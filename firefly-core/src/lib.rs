pub mod error;
pub mod kubernetes;
pub mod planner;
pub mod reconciler;
pub mod resources;
pub mod templates;
pub mod watcher;

pub const FIELD_MANAGER: &str = "firefly-controller";
