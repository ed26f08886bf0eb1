//! File naming and save-path selection.
//!
//! Every archived file is named `<characters> - <artists> ID[<id>].<ext>`, with as many
//! tags as fit under the configured length cap, and lives either directly under the archive
//! root or inside an already existing series folder.
use std::path::{Path, PathBuf};

use favbooru_common::{join_tags, log::debug, post::Post, sanitize::sanitize};

/// Renders the file name of `post` for the given tag subsets.
///
/// Tokens are joined in the order given. Neither list is sanitized here.
///
/// ```
/// use favbooru_common::post::Post;
/// use favbooru_core::archive::naming::get_name;
///
/// let mut post = Post::default();
/// post.id = 42;
/// post.file_ext = "jpg".to_string();
///
/// let artists = vec!["leonardo".to_string()];
/// assert_eq!(get_name(&post, &artists, &[]), "leonardo ID[42].jpg");
/// ```
pub fn get_name(post: &Post, artists: &[String], characters: &[String]) -> String {
    let marker = post.id_marker();

    match (artists.is_empty(), characters.is_empty()) {
        (false, false) => format!(
            "{} - {} {}",
            join_tags!(characters),
            join_tags!(artists),
            marker
        ),
        (false, true) => format!("{} {}", join_tags!(artists), marker),
        (true, false) => format!("{} {}", join_tags!(characters), marker),
        (true, true) => marker,
    }
}

/// Picks the canonical location of `post` inside `root`.
///
/// Artist and character tags are added one at a time (artist first) until the next one would
/// push the name over `max_filename` characters. The file is nested under the last-listed
/// copyright tag that already has a folder in `root`; no new folder is ever chosen here.
pub fn save_path(post: &Post, root: &Path, max_filename: usize) -> PathBuf {
    let file_name = fitting_name(post, max_filename);

    match series_folder(post, root) {
        Some(folder) => folder.join(file_name),
        None => root.join(file_name),
    }
}

fn fitting_name(post: &Post, max_filename: usize) -> String {
    // Reversed so that `pop` hands out tags in their original order
    let mut artist_src = sanitized_stack(&post.artists());
    let mut character_src = sanitized_stack(&post.characters());

    let mut artists: Vec<String> = Vec::with_capacity(artist_src.len());
    let mut characters: Vec<String> = Vec::with_capacity(character_src.len());

    let mut name = get_name(post, &artists, &characters);

    while name_len(&name) < max_filename && !(artist_src.is_empty() && character_src.is_empty()) {
        if let Some(tag) = artist_src.pop() {
            artists.push(tag);
            name = get_name(post, &artists, &characters);
            if name_len(&name) > max_filename {
                artists.pop();
                name = get_name(post, &artists, &characters);
                break;
            }
        }

        if let Some(tag) = character_src.pop() {
            characters.push(tag);
            name = get_name(post, &artists, &characters);
            if name_len(&name) > max_filename {
                characters.pop();
                name = get_name(post, &artists, &characters);
                break;
            }
        }
    }

    debug!("Name for post {}: {}", post.id, name);
    name
}

fn sanitized_stack(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| sanitize(tag))
        .filter(|tag| !tag.is_empty())
        .rev()
        .collect()
}

fn series_folder(post: &Post, root: &Path) -> Option<PathBuf> {
    post.copyright()
        .iter()
        .rev()
        .map(|series| root.join(sanitize(series)))
        .find(|folder| folder.is_dir())
}

#[inline]
fn name_len(name: &str) -> usize {
    name.chars().count()
}
