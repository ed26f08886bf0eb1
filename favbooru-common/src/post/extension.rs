//! # Post Extension Module
//!
//! Classifies the `file_ext` reported by the API. The archive keeps the raw extension text in
//! file names (so `ID[1].jpeg` stays `.jpeg`); [`Extension`] is only used to decide what can be
//! done with a file, e.g. whether metadata can be embedded into it.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PostError;

/// Kind of media file behind a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Extension {
    /// `.jpg`, `.jpeg` and `.jfif`
    JPEG,
    /// `.png` and the rare `.apng`
    PNG,
    WEBP,
    GIF,
    AVIF,
    JXL,
    WEBM,
    MP4,
    /// Ugoira animations are served as zip files with the frames inside.
    ZIP,
    /// Anything else.
    Unknown,
}

impl Extension {
    /// Determines the `Extension` from a raw extension string, case-insensitively.
    ///
    /// Never fails: anything unrecognized is [`Extension::Unknown`].
    ///
    /// # Examples
    /// ```
    /// # use favbooru_common::post::extension::Extension;
    /// assert_eq!(Extension::guess_format("jpeg"), Extension::JPEG);
    /// assert_eq!(Extension::guess_format("PNG"), Extension::PNG);
    /// assert_eq!(Extension::guess_format("swf"), Extension::Unknown);
    /// ```
    pub fn guess_format(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Self::Unknown)
    }

    /// Formats with a metadata container we know how to write XMP into.
    pub const fn supports_metadata(&self) -> bool {
        matches!(self, Self::JPEG | Self::PNG)
    }
}

impl FromStr for Extension {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" | "jfif" => Ok(Self::JPEG),
            "png" | "apng" => Ok(Self::PNG),
            "webp" => Ok(Self::WEBP),
            "gif" => Ok(Self::GIF),
            "avif" => Ok(Self::AVIF),
            "jxl" => Ok(Self::JXL),
            "webm" => Ok(Self::WEBM),
            "mp4" => Ok(Self::MP4),
            "zip" => Ok(Self::ZIP),
            _ => Err(PostError::UnknownExtension {
                message: s.to_string(),
            }),
        }
    }
}

impl Display for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JPEG => write!(f, "jpg"),
            Self::PNG => write!(f, "png"),
            Self::WEBP => write!(f, "webp"),
            Self::GIF => write!(f, "gif"),
            Self::AVIF => write!(f, "avif"),
            Self::JXL => write!(f, "jxl"),
            Self::WEBM => write!(f, "webm"),
            Self::MP4 => write!(f, "mp4"),
            Self::ZIP => write!(f, "zip"),
            Self::Unknown => write!(f, "bin"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Extension;

    #[test]
    fn only_jpeg_and_png_take_metadata() {
        for ext in ["jpg", "jpeg", "jfif", "png", "apng"] {
            assert!(Extension::guess_format(ext).supports_metadata(), "{ext}");
        }
        for ext in ["gif", "webm", "mp4", "zip", "webp", "avif", "swf", ""] {
            assert!(!Extension::guess_format(ext).supports_metadata(), "{ext}");
        }
    }
}
