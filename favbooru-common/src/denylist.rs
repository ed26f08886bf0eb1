//! Local tag denylist
//!
//! # The Tag Denylist
//! Some tags are not worth keeping in file names or embedded metadata (e.g. `banned_artist`,
//! which Danbooru uses as a placeholder). The denylist removes them from the derived tag lists
//! of every [`Post`](crate::post::Post).
//!
//! ## Config file
//! The denylist lives in `$XDG_CONFIG_HOME/favbooru/denylist.toml` (or the equivalent
//! OS-specific configuration directory, see [`config_dir`](crate::config_dir)).
//!
//! ```toml
//! [denylist]
//! artist = ["banned_artist"]
//! character = ["banned_artist"]
//! copyright = ["banned_artist"]
//! general = []
//! meta = []
//! ```
//!
//! Each list only filters its own tag category. Missing lists are treated as empty.
use std::{fs, io, path::Path};

use ahash::AHashSet;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::post::tags::TagCategory;

const DENYLIST_INIT_TEXT: &str = include_str!("denylist.toml");

/// Public constant for the default denylist.toml content.
pub const DEFAULT_DENYLIST_TOML: &str = DENYLIST_INIT_TEXT;

/// File name of the denylist inside the config directory.
pub const DENYLIST_FILE_NAME: &str = "denylist.toml";

/// Tags filtered from the artist, character and copyright lists when no config is given.
pub const BANNED_TAGS: [&str; 1] = ["banned_artist"];

#[derive(Error, Debug)]
pub enum DenylistError {
    #[error("Failed to access denylist file: {source}")]
    FileIOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to parse denylist file: {source}")]
    ParseError {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
struct DenylistTable {
    artist: Vec<String>,
    character: Vec<String>,
    copyright: Vec<String>,
    general: Vec<String>,
    meta: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
struct DenylistFile {
    denylist: DenylistTable,
}

/// Per-category sets of tags that are dropped from derived tag lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDenylist {
    artist: AHashSet<String>,
    character: AHashSet<String>,
    copyright: AHashSet<String>,
    general: AHashSet<String>,
    meta: AHashSet<String>,
}

impl Default for TagDenylist {
    fn default() -> Self {
        let banned: AHashSet<String> = BANNED_TAGS.iter().map(|t| t.to_string()).collect();

        Self {
            artist: banned.clone(),
            character: banned.clone(),
            copyright: banned,
            general: AHashSet::new(),
            meta: AHashSet::new(),
        }
    }
}

impl TagDenylist {
    /// A denylist that filters nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            artist: AHashSet::new(),
            character: AHashSet::new(),
            copyright: AHashSet::new(),
            general: AHashSet::new(),
            meta: AHashSet::new(),
        }
    }

    /// Parses the denylist configuration from a string.
    ///
    /// # Errors
    /// Returns an error if the content is not valid TOML or lacks the `[denylist]` table.
    pub fn from_config(config_content: &str) -> Result<Self, toml::de::Error> {
        let file = toml::from_str::<DenylistFile>(config_content)?;
        let table = file.denylist;

        debug!("Tag denylist config decoded");

        Ok(Self {
            artist: table.artist.into_iter().collect(),
            character: table.character.into_iter().collect(),
            copyright: table.copyright.into_iter().collect(),
            general: table.general.into_iter().collect(),
            meta: table.meta.into_iter().collect(),
        })
    }

    /// Reads `denylist.toml` from `dir`, writing the bundled default first if it doesn't exist.
    ///
    /// # Errors
    /// Fails if the file can't be read/created or doesn't parse.
    pub fn load_or_create(dir: &Path) -> Result<Self, DenylistError> {
        let path = dir.join(DENYLIST_FILE_NAME);

        if !path.exists() {
            debug!("Creating default denylist at {}", path.display());
            fs::write(&path, DEFAULT_DENYLIST_TOML)?;
        }

        let content = fs::read_to_string(&path)?;
        Ok(Self::from_config(&content)?)
    }

    /// Adds `tag` to the denylist of `category`.
    pub fn insert(&mut self, category: TagCategory, tag: &str) {
        self.set_mut(category).insert(tag.to_string());
    }

    /// Whether `tag` is denied for `category`.
    #[inline]
    #[must_use]
    pub fn contains(&self, category: TagCategory, tag: &str) -> bool {
        self.set(category).contains(tag)
    }

    fn set(&self, category: TagCategory) -> &AHashSet<String> {
        match category {
            TagCategory::Artist => &self.artist,
            TagCategory::Character => &self.character,
            TagCategory::Copyright => &self.copyright,
            TagCategory::General => &self.general,
            TagCategory::Meta => &self.meta,
        }
    }

    fn set_mut(&mut self, category: TagCategory) -> &mut AHashSet<String> {
        match category {
            TagCategory::Artist => &mut self.artist,
            TagCategory::Character => &mut self.character,
            TagCategory::Copyright => &mut self.copyright,
            TagCategory::General => &mut self.general,
            TagCategory::Meta => &mut self.meta,
        }
    }
}
