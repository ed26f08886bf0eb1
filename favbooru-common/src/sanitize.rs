//! Tag text to file path component conversion.

/// Characters that are removed outright from file names.
const STRIPPED_CHARS: [char; 4] = ['!', '?', ':', '<'];

/// Adjusts text so it can be used as (part of) a file name.
///
/// * `/` becomes `_`
/// * `!`, `?`, `:` and `<` are removed, wherever they appear
/// * trailing periods are trimmed
///
/// Applying it to already sanitized text returns the same text.
///
/// # Examples
/// ```
/// # use favbooru_common::sanitize::sanitize;
/// assert_eq!(sanitize("fate/stay_night"), "fate_stay_night");
/// assert_eq!(sanitize("re:zero!?"), "rezero");
/// assert_eq!(sanitize("k-on..."), "k-on");
/// ```
pub fn sanitize(s: &str) -> String {
    let stripped: String = s
        .replace('/', "_")
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    stripped.trim_end_matches('.').to_string()
}
