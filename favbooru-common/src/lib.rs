use std::{
    env,
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
};

// Public Exports
pub use ahash;
pub use chrono;
pub use directories;
pub use log;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;

use directories::ProjectDirs;

use log::debug;

pub mod denylist;
pub mod macros;
pub mod post;
pub mod sanitize;

/// Name used for the user-agent and the configuration directory.
pub const APP_NAME: &str = "favbooru";

/// The user-agent sent with every request made by the archiver.
///
/// It will always follow the version declared inside ```Cargo.toml```
#[inline]
pub fn user_agent() -> String {
    let ua = format!("Rust Favorites Archiver/{}", env!("CARGO_PKG_VERSION"));
    debug!("Using user-agent: {}", ua);
    ua
}

/// Returns a `PathBuf` pointing to the archiver's configuration directory.
///
/// This is XDG-compliant and resolves to `$XDG_CONFIG_HOME/favbooru` on Linux or
/// `%APPDATA%/favbooru/config` on Windows.
///
/// Or you can set the env var `FAVBOORU_CONFIG_DIR` to point it to a custom location.
pub fn config_dir() -> Result<PathBuf, io::Error> {
    let cfg_path = match env::var("FAVBOORU_CONFIG_DIR") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            let Some(dirs) = ProjectDirs::from("", "", APP_NAME) else {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "Could not resolve a home directory for the config files",
                ));
            };
            dirs.config_dir().to_path_buf()
        }
    };

    let cfold = Path::new(&cfg_path);

    if !cfold.exists() {
        create_dir_all(cfold)?;
    }

    Ok(cfold.to_path_buf())
}
