//! Keeps a local archive of favorited posts in sync with the booru.
//!
//! [`archive`] decides where each post's file belongs and downloads, moves or refreshes it;
//! [`metadata`] embeds the post's tags and dates into the file.
pub mod archive;
pub mod error;
pub mod metadata;
pub mod progress_bars;

pub use archive::{Archive, ArchiveConfig, ArchiveEntry};
pub use error::ArchiveError;
