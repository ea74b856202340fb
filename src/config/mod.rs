// Configuration for the kamba dictionary
// Files are read once at startup; nothing is written back implicitly

#[allow(clippy::module_inception)]
pub mod config;
pub mod config_loader;

pub use config::{KambaConfig, StaggerConfig};
pub use config_loader::ConfigLoader;
