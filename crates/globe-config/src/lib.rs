//! Configuration system for the globe viewer.
//!
//! Settings persist to disk as RON and can be overridden from the command
//! line via clap. Every section falls back to defaults, so files written by
//! older or newer builds still load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, RenderConfig, StarfieldConfig, TextureConfig, WindowConfig,
};
pub use error::ConfigError;
