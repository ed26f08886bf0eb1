//! Reconciliation of favorited posts with the local archive.
//!
//! For every post the [`Archive`] works out where the file should live, looks for a copy that
//! is already archived (anywhere under the root) and then either moves it into place, leaves it
//! where it is, or downloads it. Embedded metadata and file times are refreshed every time a
//! file is touched, so running over the same posts again is always safe.
//!
//! # Example usage
//!
//! ```rust,no_run
//! use favbooru_core::archive::{Archive, ArchiveConfig};
//! use favbooru_common::post::Post;
//!
//! async fn archive(posts: Vec<Post>) {
//!     let config = ArchiveConfig::new("./download");
//!
//!     let archive = Archive::new(config, None).unwrap();
//!
//!     for post in &posts {
//!         let entry = archive.download(post, false).await.unwrap();
//!         println!("{} -> {}", post, entry.path.display());
//!     }
//! }
//! ```
use futures::{Stream, StreamExt};
use favbooru_common::chrono::Local;
use favbooru_common::log::{debug, warn};
use favbooru_common::post::Post;
use favbooru_common::reqwest::Client;
use favbooru_common::{client, tokio};
use indicatif::ProgressBar;
use std::ffi::OsString;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs::{create_dir_all, remove_file, rename, try_exists, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::task::spawn_blocking;

use crate::error::ArchiveError;
use crate::metadata;
use crate::progress_bars::download_bar;

pub mod lookup;
pub mod naming;
pub mod timestamps;

/// Default archive root.
pub const DEFAULT_ROOT: &str = "./download";

/// Default cap on file name length, in characters, extension included.
pub const MAX_FILENAME: usize = 100;

/// Where and how posts are archived.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub root: PathBuf,
    pub max_filename: usize,
    /// Local UTC offset in seconds, captured once. See [`timestamps`].
    pub utc_offset: i32,
}

impl ArchiveConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_filename(mut self, max_filename: usize) -> Self {
        self.max_filename = max_filename;
        self
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            max_filename: MAX_FILENAME,
            utc_offset: Local::now().offset().local_minus_utc(),
        }
    }
}

/// Outcome of reconciling one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Canonical location of the post's file.
    pub path: PathBuf,
    /// Whether the file content was fetched during this call.
    pub created: bool,
}

/// Struct where all the downloading and reconciling takes place
#[derive(Debug, Clone)]
pub struct Archive {
    config: ArchiveConfig,
    client: Client,
}

impl Archive {
    /// Set up the archive. Without a custom client a new one is built.
    ///
    /// # Errors
    /// Fails if the HTTP client can't be initialized.
    pub fn new(config: ArchiveConfig, custom_client: Option<Client>) -> Result<Self, ArchiveError> {
        let client = match custom_client {
            Some(cli) => cli,
            None => client!()?,
        };

        debug!("Archive root: {}", config.root.display());

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Canonical location of `post`, see [`naming::save_path`].
    pub fn save_path(&self, post: &Post) -> PathBuf {
        naming::save_path(post, &self.config.root, self.config.max_filename)
    }

    /// First archived file of `post`, wherever it is under the root.
    ///
    /// # Errors
    /// Fails only if the background lookup task dies.
    pub async fn find_existing(&self, post: &Post) -> Result<Option<PathBuf>, ArchiveError> {
        let root = self.config.root.clone();
        let data = post.clone();

        Ok(spawn_blocking(move || lookup::find_existing(&data, &root)).await?)
    }

    /// Brings the archived copy of `post` in line with the remote record.
    ///
    /// * Already archived at the canonical path: metadata and times are refreshed.
    /// * Archived elsewhere: the file is moved to the canonical path, then refreshed.
    /// * Not archived: the file is downloaded and refreshed, unless `update_only` is set, in
    ///   which case nothing happens.
    ///
    /// Metadata failures are only logged. Moving onto an existing file is never done.
    ///
    /// # Errors
    /// Fails if the content can't be fetched or the file can't be written, moved or touched.
    pub async fn download(&self, post: &Post, update_only: bool) -> Result<ArchiveEntry, ArchiveError> {
        let existing = self.find_existing(post).await?;
        let save_path = self.save_path(post);

        match existing {
            Some(existing) => {
                if existing != save_path {
                    Self::relocate(&existing, &save_path).await?;
                }
                self.refresh(post, &save_path).await?;

                Ok(ArchiveEntry {
                    path: save_path,
                    created: false,
                })
            }
            None if update_only => {
                debug!("Post {} not archived, skipping in update mode", post.id);

                Ok(ArchiveEntry {
                    path: save_path,
                    created: false,
                })
            }
            None => {
                self.fetch(post, &save_path).await?;
                self.refresh(post, &save_path).await?;

                Ok(ArchiveEntry {
                    path: save_path,
                    created: true,
                })
            }
        }
    }

    async fn relocate(from: &Path, to: &Path) -> Result<(), ArchiveError> {
        Self::create_parent(to).await?;

        if try_exists(to).await? {
            return Err(ArchiveError::TargetExists {
                path: to.to_path_buf(),
            });
        }

        debug!("Moving {} to {}", from.display(), to.display());
        rename(from, to).await?;
        Ok(())
    }

    async fn create_parent(path: &Path) -> Result<(), ArchiveError> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };

        match create_dir_all(parent).await {
            Ok(_) => Ok(()),
            Err(error) => Err(ArchiveError::DirCreationError {
                message: error.to_string(),
            }),
        }
    }

    async fn refresh(&self, post: &Post, path: &Path) -> Result<(), ArchiveError> {
        let target = path.to_path_buf();
        let data = post.clone();

        match spawn_blocking(move || metadata::sync_file(&target, &data)).await? {
            Ok(true) => debug!("Updated metadata of {}", path.display()),
            Ok(false) => (),
            Err(error) => warn!("Failed to sync metadata of {}: {}", path.display(), error),
        }

        match timestamps::apply_post_times(path, post, self.config.utc_offset) {
            Err(ArchiveError::PostError(error)) => {
                warn!("Keeping file times of {}: {}", path.display(), error);
                Ok(())
            }
            other => other,
        }
    }

    async fn fetch(&self, post: &Post, output: &Path) -> Result<(), ArchiveError> {
        debug!("Fetching {}", &post.file_url);
        let res = self.client.get(&post.file_url).send().await?;

        let status = res.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ArchiveError::RemoteFileNotFound {
                status: status.as_u16(),
            });
        }

        Self::create_parent(output).await?;

        let pb = download_bar(res.content_length());

        // Kept under a `.part` name until complete
        let partial = partial_path(output);
        let digest = save_stream(res.bytes_stream(), &partial, &pb).await?;

        pb.finish_and_clear();

        rename(&partial, output).await?;

        let hash = format!("{:x}", digest);
        if !post.md5.is_empty() && hash != post.md5 {
            warn!(
                "MD5 mismatch for {}. Expected: {}, got: {}",
                output.display(),
                post.md5,
                hash
            );
        }

        Ok(())
    }
}

/// Streams `chunks` into `partial` and returns the MD5 digest of the content.
///
/// A failed transfer removes `partial` again before the error is returned.
async fn save_stream<S, B, E>(
    chunks: S,
    partial: &Path,
    pb: &ProgressBar,
) -> Result<md5::Digest, ArchiveError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    match write_chunks(chunks, partial, pb).await {
        Ok(digest) => Ok(digest),
        Err(err) => {
            pb.abandon();
            debug!("Removing partial file {}", partial.display());
            if let Err(rm_err) = remove_file(partial).await {
                debug!("Could not remove {}: {}", partial.display(), rm_err);
            }
            Err(err)
        }
    }
}

async fn write_chunks<S, B, E>(
    mut chunks: S,
    partial: &Path,
    pb: &ProgressBar,
) -> Result<md5::Digest, ArchiveError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    debug!("Creating {:?}", partial);
    let file = File::create(partial).await?;
    let mut bw = BufWriter::new(file);

    let mut digest = md5::Context::new();

    // Download the file chunk by chunk.
    debug!("Retrieving chunks...");
    while let Some(item) = chunks.next().await {
        // Retrieve chunk.
        let chunk = item.map_err(|e| ArchiveError::ChunkDownloadFail {
            message: e.to_string(),
        })?;
        let chunk = chunk.as_ref();
        pb.inc(chunk.len().try_into()?);
        digest.consume(chunk);

        // Write to file.
        bw.write_all(chunk).await?;
    }
    bw.flush().await?;

    Ok(digest.compute())
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    output.with_file_name(name)
}
