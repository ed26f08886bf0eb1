use std::path::Path;

use favbooru_common::{log::debug, post::Post};
use xmp_toolkit::{xmp_ns, OpenFileOptions, XmpError, XmpFile, XmpMeta, XmpValue};

use super::{apply_post_metadata, MetadataDocument, MetadataError, Namespace};

#[inline]
fn namespace_uri(namespace: Namespace) -> &'static str {
    match namespace {
        Namespace::Xmp => xmp_ns::XMP,
        Namespace::DublinCore => xmp_ns::DC,
    }
}

fn write_failed(namespace: Namespace, name: &str, error: &XmpError) -> MetadataError {
    MetadataError::WriteFailed {
        namespace,
        name: name.to_string(),
        message: error.to_string(),
    }
}

impl MetadataDocument for XmpMeta {
    fn contains(&self, namespace: Namespace, name: &str) -> bool {
        self.contains_property(namespace_uri(namespace), name)
    }

    fn set_text(
        &mut self,
        namespace: Namespace,
        name: &str,
        value: &str,
    ) -> Result<(), MetadataError> {
        self.set_property(namespace_uri(namespace), name, &XmpValue::from(value))
            .map_err(|err| write_failed(namespace, name, &err))
    }

    fn list_items(&self, namespace: Namespace, name: &str) -> Vec<String> {
        self.property_array(namespace_uri(namespace), name)
            .map(|item| item.value)
            .collect()
    }

    fn append_list_item(
        &mut self,
        namespace: Namespace,
        name: &str,
        item: &str,
    ) -> Result<(), MetadataError> {
        let array_name = XmpValue::from(name)
            .set_is_array(true)
            .set_is_ordered(true);

        self.append_array_item(
            namespace_uri(namespace),
            &array_name,
            &XmpValue::from(item),
        )
        .map_err(|err| write_failed(namespace, name, &err))
    }
}

/// Opens `path` for update and rewrites its XMP packet, starting from an empty one when the
/// file has none yet.
pub(super) fn sync_xmp_file(path: &Path, post: &Post) -> Result<bool, MetadataError> {
    let mut file = XmpFile::new()?;
    file.open_file(path, OpenFileOptions::default().for_update())?;

    let mut meta = match file.xmp() {
        Some(meta) => meta,
        None => {
            debug!("No XMP packet in {}, starting a new one", path.display());
            XmpMeta::new()?
        }
    };

    apply_post_metadata(&mut meta, post)?;

    let writable = file.can_put_xmp(&meta);
    if writable {
        file.put_xmp(&meta)?;
    } else {
        debug!("XMP Toolkit can't update {}", path.display());
    }

    file.close();
    Ok(writable)
}
