//! Main representation of a favorited post
//!
//! # Post
//! A [`Post` struct](Post) holds the fields of one booru API entry that the archiver cares
//! about. The schema is a fixed allow-list: every field is optional in the payload (missing
//! ones default to empty) and any other attribute the API sends is ignored.
//!
//! Tag categories are kept as the raw space-separated strings and exposed through derived,
//! denylist-filtered lists ([`Post::artists`], [`Post::characters`], ...).
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    sync::Arc,
};

use crate::{denylist::TagDenylist, join_tags};

use self::{
    error::PostError,
    extension::Extension,
    tags::{split_tags, TagCategory},
};

pub mod error;
pub mod extension;
pub mod tags;

/// Layout of `created_at`/`updated_at`, e.g. `2020-08-12T17:48:47.177-04:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// One favorited post.
#[derive(Clone, Default, Serialize, Deserialize, Eq)]
#[serde(default)]
pub struct Post {
    /// ID number of the post given by the imageboard. Every archived file name carries it.
    pub id: u64,
    pub created_at: String,
    pub updated_at: String,
    /// Direct URL of the original file.
    pub file_url: String,
    pub file_size: u64,
    /// The extension exactly as reported by the API.
    pub file_ext: String,
    pub md5: String,
    /// Letter rating from the API (`g`, `s`, `q`, `e`).
    pub rating: String,
    pub source: String,
    /// Combination of all the other tag strings.
    pub tag_string: String,
    pub tag_string_artist: String,
    pub tag_string_character: String,
    /// Series/properties associated with the post.
    pub tag_string_copyright: String,
    /// Freeform tags.
    pub tag_string_general: String,
    pub tag_string_meta: String,
    #[serde(skip)]
    denylist: Arc<TagDenylist>,
}

impl Post {
    /// Replaces the denylist used by the tag accessors.
    #[must_use]
    pub fn with_denylist(mut self, denylist: Arc<TagDenylist>) -> Self {
        self.denylist = denylist;
        self
    }

    #[inline]
    pub fn tag_list(&self, category: TagCategory) -> Vec<String> {
        let raw = match category {
            TagCategory::Artist => &self.tag_string_artist,
            TagCategory::Character => &self.tag_string_character,
            TagCategory::Copyright => &self.tag_string_copyright,
            TagCategory::General => &self.tag_string_general,
            TagCategory::Meta => &self.tag_string_meta,
        };
        split_tags(raw, category, &self.denylist)
    }

    pub fn artists(&self) -> Vec<String> {
        self.tag_list(TagCategory::Artist)
    }

    pub fn characters(&self) -> Vec<String> {
        self.tag_list(TagCategory::Character)
    }

    pub fn copyright(&self) -> Vec<String> {
        self.tag_list(TagCategory::Copyright)
    }

    pub fn general(&self) -> Vec<String> {
        self.tag_list(TagCategory::General)
    }

    /// Media kind of the post, used to decide whether metadata can be embedded.
    #[inline]
    pub fn extension(&self) -> Extension {
        Extension::guess_format(&self.file_ext)
    }

    /// The `ID[<id>].<ext>` suffix that ends every archived file name of this post.
    ///
    /// Saving and looking up files both go through this, so an archived file is always found
    /// again no matter which folder it ended up in.
    #[inline]
    pub fn id_marker(&self) -> String {
        format!("ID[{}].{}", self.id, self.file_ext)
    }

    pub fn created_at_time(&self) -> Result<DateTime<FixedOffset>, PostError> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated_at_time(&self) -> Result<DateTime<FixedOffset>, PostError> {
        parse_timestamp(&self.updated_at)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, PostError> {
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        PostError::InvalidTimestamp {
            value: value.to_string(),
            source,
        }
    })
}

impl Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let artists = self.artists();
        let characters = self.characters();

        match (artists.is_empty(), characters.is_empty()) {
            (true, true) => write!(f, "{}", self.id),
            (false, false) => write!(
                f,
                "{} - {}",
                join_tags!(artists),
                join_tags!(characters)
            ),
            (false, true) => write!(f, "{}", join_tags!(artists)),
            (true, false) => write!(f, "{}", join_tags!(characters)),
        }
    }
}

impl Debug for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Post")
            .field("Post ID", &self.id)
            .field("Download URL", &self.file_url)
            .field("MD5 Hash", &self.md5)
            .field("File Extension", &self.file_ext)
            .field("Created at", &self.created_at)
            .field("Updated at", &self.updated_at)
            .field("Artists", &self.tag_string_artist)
            .field("Characters", &self.tag_string_character)
            .field("Copyright", &self.tag_string_copyright)
            .finish()
    }
}

impl Ord for Post {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for Post {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn post(value: serde_json::Value) -> Post {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn artists_keep_order() {
        let post = post(json!({
            "id": 1,
            "tag_string_artist": "leonardo michelangelo raphael donatello",
        }));

        assert_eq!(
            post.artists(),
            vec!["leonardo", "michelangelo", "raphael", "donatello"]
        );
    }

    #[test]
    fn empty_tag_fields_give_empty_lists() {
        let post = post(json!({ "id": 1, "tag_string_artist": "" }));

        assert!(post.artists().is_empty());
        assert!(post.characters().is_empty());
        assert!(post.copyright().is_empty());
        assert!(post.general().is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let post = post(json!({
            "id": 7,
            "file_ext": "png",
            "pixiv_id": 1234,
            "has_large": true,
            "media_asset": { "id": 99 },
        }));

        assert_eq!(post.id, 7);
        assert_eq!(post.file_ext, "png");
        assert!(post.file_url.is_empty());
    }

    #[test]
    fn default_denylist_applies() {
        let post = post(json!({
            "id": 1,
            "tag_string_artist": "banned_artist someone",
            "tag_string_character": "banned_artist",
        }));

        assert_eq!(post.artists(), vec!["someone"]);
        assert!(post.characters().is_empty());
    }

    #[test]
    fn custom_denylist() {
        let mut denylist = TagDenylist::empty();
        denylist.insert(TagCategory::General, "tagme");
        let post = post(json!({
            "id": 1,
            "tag_string_artist": "banned_artist",
            "tag_string_general": "tagme solo",
        }))
        .with_denylist(Arc::new(denylist));

        assert_eq!(post.artists(), vec!["banned_artist"]);
        assert_eq!(post.general(), vec!["solo"]);
    }

    #[test]
    fn display_identity() {
        let bare = post(json!({ "id": 42 }));
        let both = post(json!({
            "id": 42,
            "tag_string_artist": "leonardo",
            "tag_string_character": "raphael donatello",
        }));
        let artists = post(json!({ "id": 42, "tag_string_artist": "leonardo michelangelo" }));

        assert_eq!(bare.to_string(), "42");
        assert_eq!(both.to_string(), "leonardo - raphael donatello");
        assert_eq!(artists.to_string(), "leonardo michelangelo");
    }

    #[test]
    fn parses_timestamps() {
        let post = post(json!({
            "id": 1,
            "created_at": "2020-08-12T17:48:47.177-04:00",
            "updated_at": "2020-08-11T23:55:27.535-04:00",
        }));

        assert_eq!(post.created_at_time().unwrap().timestamp(), 1_597_268_927);
        assert_eq!(post.updated_at_time().unwrap().timestamp(), 1_597_204_527);
    }

    #[test]
    fn rejects_malformed_timestamps() {
        let post = post(json!({ "id": 1, "created_at": "yesterday" }));
        assert!(matches!(
            post.created_at_time(),
            Err(PostError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn id_marker() {
        let post = post(json!({ "id": 42, "file_ext": "jpg" }));
        assert_eq!(post.id_marker(), "ID[42].jpg");
    }
}
