//! Texture acquisition for the globe: which maps exist, where they come
//! from, and a worker pool that fetches and decodes them off the main thread.
//!
//! Every request yields exactly one [`LoadResult`], tagged with its
//! [`TextureChannel`]. Failures never escape a worker as panics or errors;
//! they arrive as [`LoadOutcome::Failed`] values.

mod channel;
mod error;
mod loader;
mod raster;
mod source;

pub use channel::TextureChannel;
pub use error::LoadError;
pub use loader::{LoadOutcome, LoadResult, TextureLoader};
pub use raster::{TextureImage, mip_level_count};
pub use source::{FileSource, HttpSource, OfflineSource, TextureSource, UrlSource};
