use favbooru_common::{
    post::{error::PostError, Post},
    serde::{self, Deserialize, Serialize},
};

/// Wire model of one entry of `/posts.json`.
///
/// Every field is optional (and `null`-tolerant) and anything not listed here is ignored, so
/// changes to the API payload never break decoding.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(crate = "self::serde")]
pub struct DanbooruPost {
    pub id: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<u64>,
    pub file_ext: Option<String>,
    pub md5: Option<String>,
    pub rating: Option<String>,
    pub source: Option<String>,
    pub tag_string: Option<String>,
    pub tag_string_artist: Option<String>,
    pub tag_string_character: Option<String>,
    pub tag_string_copyright: Option<String>,
    pub tag_string_general: Option<String>,
    pub tag_string_meta: Option<String>,
}

impl TryFrom<DanbooruPost> for Post {
    type Error = PostError;

    fn try_from(raw: DanbooruPost) -> Result<Self, Self::Error> {
        let Some(id) = raw.id else {
            return Err(PostError::MissingField { id: 0, field: "id" });
        };

        let Some(file_url) = raw.file_url else {
            return Err(PostError::MissingField {
                id,
                field: "file_url",
            });
        };

        let mut post = Self::default();
        post.id = id;
        post.created_at = raw.created_at.unwrap_or_default();
        post.updated_at = raw.updated_at.unwrap_or_default();
        post.file_url = file_url;
        post.file_size = raw.file_size.unwrap_or_default();
        post.file_ext = raw.file_ext.unwrap_or_default();
        post.md5 = raw.md5.unwrap_or_default();
        post.rating = raw.rating.unwrap_or_default();
        post.source = raw.source.unwrap_or_default();
        post.tag_string = raw.tag_string.unwrap_or_default();
        post.tag_string_artist = raw.tag_string_artist.unwrap_or_default();
        post.tag_string_character = raw.tag_string_character.unwrap_or_default();
        post.tag_string_copyright = raw.tag_string_copyright.unwrap_or_default();
        post.tag_string_general = raw.tag_string_general.unwrap_or_default();
        post.tag_string_meta = raw.tag_string_meta.unwrap_or_default();

        Ok(post)
    }
}
