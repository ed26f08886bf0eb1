//! # Post Tags Module
//!
//! Booru APIs ship each tag category as one space-separated string
//! (`tag_string_artist`, `tag_string_character`, ...). This module turns those strings into
//! ordered token lists.
//!
//! Order is kept exactly as the API sent it and exact duplicates are kept as well; only empty
//! tokens and denylisted tags are dropped.

use serde::{Deserialize, Serialize};

use crate::denylist::TagDenylist;

/// Categorizes the tag strings of a post.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TagCategory {
    /// Tags identifying the artist(s) of the work.
    Artist,
    /// Tags identifying specific characters depicted.
    Character,
    /// Tags related to copyright, series, or franchise.
    Copyright,
    /// General descriptive tags about the content.
    General,
    /// Meta-tags related to the post itself (e.g., "highres", "tagme").
    Meta,
}

/// Splits a raw tag string into its tokens, dropping the ones denied for `category`.
///
/// An empty string yields an empty list, never `[""]`.
///
/// # Examples
/// ```
/// # use favbooru_common::{denylist::TagDenylist, post::tags::{split_tags, TagCategory}};
/// let denylist = TagDenylist::default();
/// assert_eq!(
///     split_tags("leonardo banned_artist raphael", TagCategory::Artist, &denylist),
///     vec!["leonardo", "raphael"]
/// );
/// assert!(split_tags("", TagCategory::Artist, &denylist).is_empty());
/// ```
pub fn split_tags(raw: &str, category: TagCategory, denylist: &TagDenylist) -> Vec<String> {
    raw.split(' ')
        .filter(|tag| !tag.is_empty() && !denylist.contains(category, tag))
        .map(str::to_string)
        .collect()
}
