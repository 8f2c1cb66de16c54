// src/config.rs

use crate::cli::Cli;
use serde::Deserialize;
use std::{
    env,
    fs::File,
    io::{self, BufReader, Error as IoError, ErrorKind as IoErrorKind},
    path::{Path, PathBuf},
    time::Duration,
};

/// The default recognized video file extensions (all lowercase).
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm"];
/// The default number of seconds between wallpaper rotations.
pub const DEFAULT_INTERVAL_SECS: u64 = 30;
/// The filename of the optional JSON config file.
pub const CONFIG_FILE_NAME: &str = "config.json";
/// The application name, used for the platform config directory.
pub const APP_NAME: &str = "hanabi-rotator";
/// Environment variable consulted when no folder is given on the CLI
/// or in the config file.
pub const FOLDER_ENV_VAR: &str = "WALLPAPER_VIDEO_FOLDER";

/// Resolved, validated settings for the rotation loop.
/// Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root of the directory tree to scan for videos.
    pub folder: PathBuf,
    /// Recognized extensions, stored lowercase without the leading dot.
    pub extensions: Vec<String>,
    /// Pause between rotations.
    pub interval: Duration,
    /// Whether subdirectories are scanned.
    pub recursive: bool,
}

/// On-disk shape of the optional config file. Every field is optional;
/// missing fields fall back to the defaults or CLI values.
#[derive(Deserialize, Debug, Default)]
pub struct ConfigFile {
    pub folder: Option<String>,
    pub interval_secs: Option<u64>,
    pub extensions: Option<Vec<String>>,
}

/// Returns the default config file path, e.g.
/// `~/.config/hanabi-rotator/config.json` on Linux.
/// `None` if the platform config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}

/// Loads the config file at `path`.
/// A missing file yields the empty `ConfigFile`; a file that exists but
/// cannot be parsed logs a warning and is likewise ignored.
///
/// # Errors
///
/// Returns an error if an I/O error other than `NotFound` occurs while
/// reading the file.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, Box<dyn std::error::Error>> {
    match File::open(path) {
        Ok(file) => {
            let reader = BufReader::new(file);
            match serde_json::from_reader(reader) {
                Ok(config) => Ok(config),
                Err(e) => {
                    log::warn!(
                        "Could not parse config file at '{}' ({}). Using defaults.",
                        path.display(),
                        e
                    );
                    Ok(ConfigFile::default())
                }
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(Box::new(e)),
    }
}

impl Config {
    /// Builds the effective configuration from CLI arguments, the config
    /// file, the environment, and the built-in defaults (in that order of
    /// precedence) and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * no folder is given anywhere,
    /// * the folder does not exist or is not a directory,
    /// * the interval is zero,
    /// * the config file exists but cannot be read.
    pub fn resolve(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let file = match &cli.config {
            Some(path) => {
                let path = PathBuf::from(shellexpand::tilde(path).into_owned());
                load_config_file(&path)?
            }
            None => match default_config_path() {
                Some(path) => load_config_file(&path)?,
                None => ConfigFile::default(),
            },
        };

        let folder = cli
            .folder
            .clone()
            .or_else(|| file.folder.clone())
            .or_else(|| env::var(FOLDER_ENV_VAR).ok())
            .ok_or_else(|| {
                IoError::new(
                    IoErrorKind::InvalidInput,
                    format!(
                        "No video folder configured. Pass --folder, set {}, or add \"folder\" to the config file.",
                        FOLDER_ENV_VAR
                    ),
                )
            })?;
        let folder = PathBuf::from(shellexpand::tilde(&folder).into_owned());

        let interval_secs = cli
            .interval
            .or(file.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        let extensions = if !cli.extensions.is_empty() {
            cli.extensions.clone()
        } else {
            file.extensions.unwrap_or_else(|| {
                DEFAULT_VIDEO_EXTENSIONS
                    .iter()
                    .map(|ext| (*ext).to_string())
                    .collect()
            })
        };

        let config = Config::new(folder, extensions, interval_secs, !cli.non_recursive);
        config.validate()?;
        Ok(config)
    }

    /// Creates a `Config`, normalizing extensions to lowercase without a
    /// leading dot. Validation is separate so tests can construct arbitrary
    /// configurations directly.
    pub fn new(
        folder: PathBuf,
        extensions: Vec<String>,
        interval_secs: u64,
        recursive: bool,
    ) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        Config {
            folder,
            extensions,
            interval: Duration::from_secs(interval_secs),
            recursive,
        }
    }

    /// Checks the invariants the rotation loop relies on.
    ///
    /// A missing or non-directory folder is a fatal startup error: a rotator
    /// pointed at nothing can never do useful work, and sleeping forever
    /// would hide the misconfiguration.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder is not an existing directory, the
    /// interval is zero, or the extension set is empty.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.folder.is_dir() {
            return Err(Box::new(IoError::new(
                IoErrorKind::NotFound,
                format!(
                    "Video folder is not an existing directory: {}",
                    self.folder.display()
                ),
            )));
        }
        if self.interval.is_zero() {
            return Err(Box::new(IoError::new(
                IoErrorKind::InvalidInput,
                "Rotation interval must be positive.",
            )));
        }
        if self.extensions.is_empty() {
            return Err(Box::new(IoError::new(
                IoErrorKind::InvalidInput,
                "At least one video extension must be configured.",
            )));
        }
        Ok(())
    }
}
