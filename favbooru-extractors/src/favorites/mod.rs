//! Post extractor for the favorites feed of a Danbooru-compatible server.
//!
//! The feed is the `ordfav:<username>` search, which lists the posts a user favorited, most
//! recent first, 200 per page.
//!
use self::models::DanbooruPost;

use crate::{auth::ConnectionConfig, error::ExtractorError};
use favbooru_common::{
    client,
    denylist::TagDenylist,
    log::{debug, error, warn},
    post::Post,
    reqwest::Client,
    serde_json,
    tokio::time::Instant,
};
use std::sync::Arc;

pub mod models;

/// Posts requested per page, the maximum the API allows.
pub const POST_LIMIT: u16 = 200;

/// Fetches pages of the favorites feed and maps them into [`Post`]s.
#[derive(Debug, Clone)]
pub struct FavoritesExtractor {
    client: Client,
    connection: ConnectionConfig,
    denylist: Arc<TagDenylist>,
}

impl FavoritesExtractor {
    /// Sets up an extractor with its own client.
    ///
    /// # Errors
    /// Fails only if the HTTP client can't be initialized.
    pub fn new(
        connection: ConnectionConfig,
        denylist: Arc<TagDenylist>,
    ) -> Result<Self, ExtractorError> {
        // Use common client for all connections with a set User-Agent
        let client = client!()?;

        Ok(Self::with_client(client, connection, denylist))
    }

    /// Same as [`new`](Self::new) but reuses an existing client.
    pub fn with_client(
        client: Client,
        connection: ConnectionConfig,
        denylist: Arc<TagDenylist>,
    ) -> Self {
        debug!("Favorites query: {}", connection.favorites_query());

        Self {
            client,
            connection,
            denylist,
        }
    }

    /// Fetches one page (starting at 1) of the feed.
    ///
    /// When the server answers with an error status, its body is logged and the page is
    /// reported as empty, which ends pagination.
    ///
    /// # Errors
    /// Fails if the request can't be completed or the response isn't a JSON list.
    pub async fn get_post_list(&self, page: u32) -> Result<Vec<Post>, ExtractorError> {
        if page == 0 {
            return Err(ExtractorError::ZeroPage);
        }

        debug!("Fetching posts from page {}", page);

        let res = self
            .client
            .get(self.connection.posts_url())
            .query(&[("tags", self.connection.favorites_query())])
            .query(&[("page", page), ("limit", u32::from(POST_LIMIT))])
            .basic_auth(&self.connection.username, Some(&self.connection.api_key))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("Server returned {} for page {}: {}", status, page, body);
            return Ok(Vec::new());
        }

        let post_array = res.text().await?;

        let start_point = Instant::now();

        let mtx = self.map_posts(&post_array)?;

        debug!("List size: {}", mtx.len());
        debug!("Post mapping took {:?}", start_point.elapsed());
        Ok(mtx)
    }

    /// Decodes a raw `/posts.json` body.
    ///
    /// Entries without a `file_url` (deleted or restricted posts) are dropped.
    ///
    /// # Errors
    /// Fails if `raw_json` isn't a JSON list of objects.
    pub fn map_posts(&self, raw_json: &str) -> Result<Vec<Post>, ExtractorError> {
        let parsed_json: Vec<DanbooruPost> = serde_json::from_str::<Vec<DanbooruPost>>(raw_json)?;

        let batch = parsed_json.into_iter().filter(|c| c.file_url.is_some());

        let posts = batch
            .filter_map(|raw| match Post::try_from(raw) {
                Ok(post) => Some(post.with_denylist(self.denylist.clone())),
                Err(err) => {
                    warn!("Skipping feed entry: {}", err);
                    None
                }
            })
            .collect();

        Ok(posts)
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }
}
