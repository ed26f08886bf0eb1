//! On-disk file times.
//!
//! Archived files carry the post's `created_at` as access time and `updated_at` as
//! modification time, so sorting a folder by date follows the site's history.
//!
//! The conversion reads the UTC wall-clock time as if it were local time and then adds the
//! UTC offset captured when the [`ArchiveConfig`](super::ArchiveConfig) was built. The result
//! is exact unless the post time and the capture time fall on different sides of a
//! daylight-saving transition, in which case it is off by the DST shift.
use std::{
    fs::{File, FileTimes},
    io,
    path::Path,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use favbooru_common::{
    chrono::{DateTime, FixedOffset, Local, TimeZone},
    log::debug,
    post::Post,
};

use crate::error::ArchiveError;

/// Seconds since the epoch for `time`, given the local offset captured at startup.
pub fn epoch_seconds(time: &DateTime<FixedOffset>, utc_offset: i32) -> i64 {
    let naive_utc = time.naive_utc();

    match Local.from_local_datetime(&naive_utc).earliest() {
        Some(local) => local.timestamp() + i64::from(utc_offset),
        // Wall-clock time skipped by a DST jump
        None => naive_utc.and_utc().timestamp(),
    }
}

// The owner may change times through a read-only handle on Unix
#[cfg(unix)]
fn open_for_times(path: &Path) -> io::Result<File> {
    File::open(path)
}

#[cfg(not(unix))]
fn open_for_times(path: &Path) -> io::Result<File> {
    std::fs::OpenOptions::new().write(true).open(path)
}

fn system_time(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs.unsigned_abs())
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    }
}

/// Sets access/modification times of `path` from the post's creation/update times.
///
/// # Errors
/// Fails if either timestamp is malformed or the file times can't be changed.
pub fn apply_post_times(path: &Path, post: &Post, utc_offset: i32) -> Result<(), ArchiveError> {
    let created = epoch_seconds(&post.created_at_time()?, utc_offset);
    let updated = epoch_seconds(&post.updated_at_time()?, utc_offset);

    debug!(
        "Setting times of {} to {} / {}",
        path.display(),
        created,
        updated
    );

    let times = FileTimes::new()
        .set_accessed(system_time(created))
        .set_modified(system_time(updated));

    let file = open_for_times(path)?;
    file.set_times(times)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use favbooru_common::post::error::PostError;
    use std::fs::{metadata, set_permissions, write};
    use tempfile::TempDir;

    const DST_TOLERANCE: i64 = 3600;

    fn local_offset() -> i32 {
        Local::now().offset().local_minus_utc()
    }

    fn post(created_at: &str, updated_at: &str) -> Post {
        let mut post = Post::default();
        post.id = 1;
        post.created_at = created_at.to_string();
        post.updated_at = updated_at.to_string();
        post
    }

    #[test]
    fn conversion_tracks_real_epoch() {
        let time = DateTime::parse_from_rfc3339("2020-08-12T17:48:47.177-04:00").unwrap();

        let secs = epoch_seconds(&time, local_offset());

        assert!((secs - 1_597_268_927).abs() <= DST_TOLERANCE, "{secs}");
    }

    #[test]
    fn sets_file_times() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ID[1].jpg");
        write(&path, b"x").unwrap();
        let post = post(
            "2020-08-12T17:48:47.177-04:00",
            "2020-08-11T23:55:27.535-04:00",
        );

        apply_post_times(&path, &post, local_offset()).unwrap();

        let modified = metadata(&path)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        assert!((modified - 1_597_204_527).abs() <= DST_TOLERANCE, "{modified}");
    }

    #[cfg(unix)]
    #[test]
    fn read_only_files_get_times_too() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ID[1].jpg");
        write(&path, b"x").unwrap();
        let mut permissions = metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        set_permissions(&path, permissions).unwrap();
        let post = post(
            "2020-08-12T17:48:47.177-04:00",
            "2020-08-11T23:55:27.535-04:00",
        );

        apply_post_times(&path, &post, local_offset()).unwrap();

        let modified = metadata(&path)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        assert!((modified - 1_597_204_527).abs() <= DST_TOLERANCE, "{modified}");
        assert!(metadata(&path).unwrap().permissions().readonly());
    }

    #[test]
    fn malformed_times_leave_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ID[1].jpg");
        write(&path, b"x").unwrap();
        let before = metadata(&path).unwrap().modified().unwrap();

        let result = apply_post_times(&path, &post("", ""), 0);

        assert!(matches!(
            result,
            Err(ArchiveError::PostError(PostError::InvalidTimestamp { .. }))
        ));
        assert_eq!(metadata(&path).unwrap().modified().unwrap(), before);
    }
}
