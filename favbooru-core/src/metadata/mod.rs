//! Embedded file metadata.
//!
//! Post information is written into the XMP packet of archived images: creation and
//! modification dates, a default rating, the artists as `dc:creator` and the series, characters
//! and general tags as `dc:subject`.
//!
//! Simple fields are only written when missing and list fields only ever grow, so manual edits
//! made to an archived file survive every later sync. The rules live in
//! [`apply_post_metadata`] and work on any [`MetadataDocument`]; the file backend is the Adobe
//! XMP Toolkit, enabled by the `xmp` feature.
use std::{fmt::Display, path::Path};

use favbooru_common::{log::debug, post::Post};
use thiserror::Error;

#[cfg(feature = "xmp")]
mod xmp;

/// Rating given to files that don't have one yet. Favorites are liked by definition.
pub const DEFAULT_RATING: &str = "4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// XMP basic schema (`xmp:`).
    Xmp,
    /// Dublin Core (`dc:`).
    DublinCore,
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xmp => write!(f, "xmp"),
            Self::DublinCore => write!(f, "dc"),
        }
    }
}

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to write {namespace}:{name}: {message}")]
    WriteFailed {
        namespace: Namespace,
        name: String,
        message: String,
    },

    #[cfg(feature = "xmp")]
    #[error("XMP Toolkit error: {0}")]
    XmpFile(#[from] xmp_toolkit::XmpError),
}

/// A metadata packet that can be read and amended.
pub trait MetadataDocument {
    /// Whether the simple property `name` is present.
    fn contains(&self, namespace: Namespace, name: &str) -> bool;

    fn set_text(&mut self, namespace: Namespace, name: &str, value: &str)
        -> Result<(), MetadataError>;

    /// Current items of the ordered array `name`, empty if it doesn't exist.
    fn list_items(&self, namespace: Namespace, name: &str) -> Vec<String>;

    /// Appends to the ordered array `name`, creating it if needed.
    fn append_list_item(
        &mut self,
        namespace: Namespace,
        name: &str,
        item: &str,
    ) -> Result<(), MetadataError>;
}

/// Amends `doc` with the information of `post`.
///
/// # Errors
/// Returns the first error reported by the document.
pub fn apply_post_metadata<D>(doc: &mut D, post: &Post) -> Result<(), MetadataError>
where
    D: MetadataDocument + ?Sized,
{
    set_if_absent(doc, Namespace::Xmp, "CreateDate", &post.created_at)?;
    set_if_absent(doc, Namespace::Xmp, "ModifyDate", &post.updated_at)?;
    set_if_absent(doc, Namespace::Xmp, "Rating", DEFAULT_RATING)?;

    add_list_items(doc, Namespace::DublinCore, "creator", &post.artists())?;

    let mut subject = post.copyright();
    subject.extend(post.characters());
    subject.extend(post.general());
    add_list_items(doc, Namespace::DublinCore, "subject", &subject)?;

    Ok(())
}

fn set_if_absent<D>(
    doc: &mut D,
    namespace: Namespace,
    name: &str,
    value: &str,
) -> Result<(), MetadataError>
where
    D: MetadataDocument + ?Sized,
{
    if doc.contains(namespace, name) {
        return Ok(());
    }
    doc.set_text(namespace, name, value)
}

/// Only items missing from the list as it was before this call are appended. Repeats inside
/// `items` itself are kept.
fn add_list_items<D>(
    doc: &mut D,
    namespace: Namespace,
    name: &str,
    items: &[String],
) -> Result<(), MetadataError>
where
    D: MetadataDocument + ?Sized,
{
    let existing = doc.list_items(namespace, name);

    for item in items.iter().filter(|item| !existing.contains(item)) {
        doc.append_list_item(namespace, name, item)?;
    }
    Ok(())
}

/// Writes the metadata of `post` into the file at `path`.
///
/// Returns `false` when nothing was written: the format can't carry metadata, the backend
/// can't update the file, or the crate was built without the `xmp` feature. This is blocking
/// I/O.
///
/// # Errors
/// Fails if the file can't be opened or updated by the backend.
pub fn sync_file(path: &Path, post: &Post) -> Result<bool, MetadataError> {
    if !post.extension().supports_metadata() {
        debug!("Skipping metadata of {}: unsupported format", path.display());
        return Ok(false);
    }

    #[cfg(feature = "xmp")]
    {
        xmp::sync_xmp_file(path, post)
    }

    #[cfg(not(feature = "xmp"))]
    {
        debug!(
            "Skipping metadata of {}: built without XMP support",
            path.display()
        );
        Ok(false)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use favbooru_common::{serde_json, serde_json::json};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryDocument {
        fields: HashMap<(Namespace, String), String>,
        lists: HashMap<(Namespace, String), Vec<String>>,
        read_only: bool,
    }

    impl MemoryDocument {
        fn field(&self, namespace: Namespace, name: &str) -> Option<&str> {
            self.fields
                .get(&(namespace, name.to_string()))
                .map(String::as_str)
        }
    }

    impl MetadataDocument for MemoryDocument {
        fn contains(&self, namespace: Namespace, name: &str) -> bool {
            self.fields.contains_key(&(namespace, name.to_string()))
        }

        fn set_text(
            &mut self,
            namespace: Namespace,
            name: &str,
            value: &str,
        ) -> Result<(), MetadataError> {
            if self.read_only {
                return Err(MetadataError::WriteFailed {
                    namespace,
                    name: name.to_string(),
                    message: "read only".to_string(),
                });
            }
            self.fields
                .insert((namespace, name.to_string()), value.to_string());
            Ok(())
        }

        fn list_items(&self, namespace: Namespace, name: &str) -> Vec<String> {
            self.lists
                .get(&(namespace, name.to_string()))
                .cloned()
                .unwrap_or_default()
        }

        fn append_list_item(
            &mut self,
            namespace: Namespace,
            name: &str,
            item: &str,
        ) -> Result<(), MetadataError> {
            self.lists
                .entry((namespace, name.to_string()))
                .or_default()
                .push(item.to_string());
            Ok(())
        }
    }

    fn post() -> Post {
        serde_json::from_value(json!({
            "id": 42,
            "file_ext": "jpg",
            "created_at": "2020-08-12T17:48:47.177-04:00",
            "updated_at": "2020-08-11T23:55:27.535-04:00",
            "tag_string_artist": "leonardo",
            "tag_string_character": "raphael",
            "tag_string_copyright": "tmnt",
            "tag_string_general": "solo pizza",
        }))
        .unwrap()
    }

    #[test]
    fn fills_empty_document() {
        let mut doc = MemoryDocument::default();

        apply_post_metadata(&mut doc, &post()).unwrap();

        assert_eq!(
            doc.field(Namespace::Xmp, "CreateDate"),
            Some("2020-08-12T17:48:47.177-04:00")
        );
        assert_eq!(
            doc.field(Namespace::Xmp, "ModifyDate"),
            Some("2020-08-11T23:55:27.535-04:00")
        );
        assert_eq!(doc.field(Namespace::Xmp, "Rating"), Some("4"));
        assert_eq!(
            doc.list_items(Namespace::DublinCore, "creator"),
            vec!["leonardo"]
        );
        assert_eq!(
            doc.list_items(Namespace::DublinCore, "subject"),
            vec!["tmnt", "raphael", "solo", "pizza"]
        );
    }

    #[test]
    fn keeps_existing_fields() {
        let mut doc = MemoryDocument::default();
        doc.set_text(Namespace::Xmp, "Rating", "1").unwrap();
        doc.set_text(Namespace::Xmp, "CreateDate", "1999-01-01").unwrap();

        apply_post_metadata(&mut doc, &post()).unwrap();

        assert_eq!(doc.field(Namespace::Xmp, "Rating"), Some("1"));
        assert_eq!(doc.field(Namespace::Xmp, "CreateDate"), Some("1999-01-01"));
    }

    #[test]
    fn lists_only_grow_with_new_items() {
        let mut doc = MemoryDocument::default();
        doc.append_list_item(Namespace::DublinCore, "subject", "my_own_tag")
            .unwrap();
        doc.append_list_item(Namespace::DublinCore, "subject", "pizza")
            .unwrap();

        apply_post_metadata(&mut doc, &post()).unwrap();
        apply_post_metadata(&mut doc, &post()).unwrap();

        assert_eq!(
            doc.list_items(Namespace::DublinCore, "subject"),
            vec!["my_own_tag", "pizza", "tmnt", "raphael", "solo"]
        );
        assert_eq!(doc.list_items(Namespace::DublinCore, "creator").len(), 1);
    }

    #[test]
    fn repeats_within_one_batch_are_kept() {
        let mut doc = MemoryDocument::default();
        let post: Post = serde_json::from_value(json!({
            "id": 1,
            "tag_string_copyright": "tmnt",
            "tag_string_character": "tmnt",
        }))
        .unwrap();

        apply_post_metadata(&mut doc, &post).unwrap();

        assert_eq!(
            doc.list_items(Namespace::DublinCore, "subject"),
            vec!["tmnt", "tmnt"]
        );
    }

    #[test]
    fn propagates_document_errors() {
        let mut doc = MemoryDocument {
            read_only: true,
            ..Default::default()
        };

        let result = apply_post_metadata(&mut doc, &post());

        assert!(matches!(
            result,
            Err(MetadataError::WriteFailed {
                namespace: Namespace::Xmp,
                ..
            })
        ));
    }

    #[test]
    fn unsupported_formats_are_skipped() {
        let mut post = post();
        post.file_ext = "webm".to_string();

        let written = sync_file(Path::new("/nonexistent/ID[42].webm"), &post).unwrap();

        assert!(!written);
    }
}
