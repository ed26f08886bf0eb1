//! Walks the favorites feed page by page and reconciles every post with the archive.
use std::{path::Path, time::Duration};

use favbooru_common::{post::Post, tokio::time::sleep};
use favbooru_core::{Archive, ArchiveEntry, ArchiveError};
use favbooru_extractors::FavoritesExtractor;
use log::{debug, error};
use owo_colors::OwoColorize;

/// Pause after every downloaded file, to go easy on the server.
pub const DOWNLOAD_PAUSE: Duration = Duration::from_secs(2);

/// Counters of a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: u64,
    pub refreshed: u64,
    pub failed: u64,
}

pub struct FavoritesSync {
    extractor: FavoritesExtractor,
    archive: Archive,
    fast_update: bool,
    pause: Duration,
}

impl FavoritesSync {
    pub fn new(extractor: FavoritesExtractor, archive: Archive, fast_update: bool) -> Self {
        Self {
            extractor,
            archive,
            fast_update,
            pause: DOWNLOAD_PAUSE,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Processes pages from `start_page` on until the feed runs out.
    ///
    /// In fast-update mode the run also stops after the first page that contained an already
    /// archived post, and posts following that one are only updated, never downloaded.
    pub async fn run(&self, start_page: u32) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut page = start_page;
        let mut seen_again = false;

        loop {
            let posts = match self.extractor.get_post_list(page).await {
                Ok(posts) => posts,
                Err(err) => {
                    error!("Failed to fetch page {}: {}", page, err);
                    break;
                }
            };

            if posts.is_empty() {
                debug!("Page {} is empty, reached the end of the feed", page);
                break;
            }

            for post in &posts {
                let update_only = self.fast_update && seen_again;

                match self.archive.download(post, update_only).await {
                    Ok(ArchiveEntry {
                        path,
                        created: true,
                    }) => {
                        print_line(page, true, &path);
                        summary.downloaded += 1;
                        sleep(self.pause).await;
                    }
                    Ok(ArchiveEntry {
                        path,
                        created: false,
                    }) => {
                        seen_again = true;
                        print_line(page, false, &path);
                        if path.exists() {
                            summary.refreshed += 1;
                        }
                    }
                    Err(err) => {
                        report_failure(page, post, &err);
                        summary.failed += 1;
                    }
                }
            }

            if self.fast_update && seen_again {
                debug!("Caught up with the archive on page {}", page);
                break;
            }

            page += 1;
        }

        summary
    }
}

fn print_line(page: u32, saved: bool, path: &Path) {
    let status = if saved {
        "saved".green().bold().to_string()
    } else {
        "skip".blue().bold().to_string()
    };

    println!("{} {} {}", page.bold(), status, path.display());
}

fn report_failure(page: u32, post: &Post, err: &ArchiveError) {
    error!("Failed to archive post {} ({}): {}", post.id, post, err);
    println!("{} {} {}", page.bold(), "fail".red().bold(), post.id);
}
