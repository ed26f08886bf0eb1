//! Everything related to reading the favorites feed of a booru.

extern crate favbooru_common;

pub mod auth;
pub mod error;
pub mod favorites;

pub use favorites::FavoritesExtractor;
