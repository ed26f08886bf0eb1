use std::path::{Path, PathBuf};

use favbooru_common::{
    log::{debug, warn},
    post::Post,
};
use walkdir::WalkDir;

/// Searches the whole archive under `root` for a file of `post`.
///
/// Files are matched by their `ID[<id>].<ext>` suffix only, so a file is found again after
/// being renamed or moved into any series folder. Entries are visited in file-name order and
/// the first match wins. Symbolic links are followed, to files and series folders alike.
/// Unreadable entries are skipped.
pub fn find_existing(post: &Post, root: &Path) -> Option<PathBuf> {
    if !root.is_dir() {
        debug!("Archive root {} does not exist yet", root.display());
        return None;
    }

    let marker = post.id_marker();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    for entry_result in walker {
        match entry_result {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    continue;
                }

                if entry.file_name().to_string_lossy().ends_with(&marker) {
                    debug!("Found existing file {}", entry.path().display());
                    return Some(entry.into_path());
                }
            }
            Err(err) => {
                warn!("Error accessing path in {}: {}", root.display(), err);
            }
        }
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::{create_dir_all, write};
    use tempfile::TempDir;

    fn post(id: u64, ext: &str) -> Post {
        let mut post = Post::default();
        post.id = id;
        post.file_ext = ext.to_string();
        post
    }

    #[test]
    fn finds_file_in_series_folder() {
        let root = TempDir::new().unwrap();
        let series = root.path().join("tmnt");
        create_dir_all(&series).unwrap();
        write(series.join("raphael - leonardo ID[42].jpg"), b"x").unwrap();

        let found = find_existing(&post(42, "jpg"), root.path());

        assert_eq!(found, Some(series.join("raphael - leonardo ID[42].jpg")));
    }

    #[test]
    fn matches_id_and_extension_exactly() {
        let root = TempDir::new().unwrap();
        write(root.path().join("ID[142].jpg"), b"x").unwrap();
        write(root.path().join("ID[42].png"), b"x").unwrap();
        create_dir_all(root.path().join("ID[42].jpg")).unwrap();

        assert_eq!(find_existing(&post(42, "jpg"), root.path()), None);
        assert_eq!(
            find_existing(&post(42, "png"), root.path()),
            Some(root.path().join("ID[42].png"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn follows_linked_files() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("leonardo ID[42].jpg");
        write(&target, b"x").unwrap();
        let link = root.path().join("leonardo ID[42].jpg");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(find_existing(&post(42, "jpg"), root.path()), Some(link));
    }

    #[cfg(unix)]
    #[test]
    fn follows_linked_series_folders() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        write(elsewhere.path().join("ID[7].png"), b"x").unwrap();
        let link = root.path().join("tmnt");
        std::os::unix::fs::symlink(elsewhere.path(), &link).unwrap();

        assert_eq!(
            find_existing(&post(7, "png"), root.path()),
            Some(link.join("ID[7].png"))
        );
    }

    #[test]
    fn missing_root_is_not_an_error() {
        let root = TempDir::new().unwrap();

        assert_eq!(
            find_existing(&post(1, "jpg"), &root.path().join("download")),
            None
        );
    }
}
