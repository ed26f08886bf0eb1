use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::{fmt::Write, time::Duration};

const PROGRESS_CHARS: &str = "━━";

const DOWNLOAD_TEMPLATE: &str = "{spinner:.green.bold} {bar:40.green/white.dim} {percent:.bold} | {byte_progress:21.green} @ {bytes_per_sec:>13.red} (eta. {eta:<4.blue})";

/// Byte progress bar for a single file download, drawn on stderr.
///
/// `len` is the expected size in bytes, or `None` when the server didn't send one.
pub fn download_bar(len: Option<u64>) -> ProgressBar {
    let bar = match len {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::no_length(),
    };

    let bar = bar.with_style(download_progress_style());
    bar.set_draw_target(ProgressDrawTarget::stderr());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn download_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(DOWNLOAD_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:>3.0}%", state.fraction() * 100_f32);
        })
        .with_key(
            "byte_progress",
            |state: &ProgressState, w: &mut dyn Write| match state.len() {
                Some(len) => {
                    let _ = write!(w, "{}/{}", HumanBytes(state.pos()), HumanBytes(len));
                }
                None => {
                    let _ = write!(w, "{}", HumanBytes(state.pos()));
                }
            },
        )
        .progress_chars(PROGRESS_CHARS)
}
