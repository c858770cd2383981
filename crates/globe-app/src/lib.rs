//! Globe viewer application: window, event loop and pointer input.

pub mod input;
pub mod platform;
pub mod window;

pub use window::{BootstrapError, GlobeApp, run};
