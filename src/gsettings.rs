// src/gsettings.rs

use std::{
    path::Path,
    process::{Command, ExitStatus},
};

/// The GSettings schema of the Hanabi GNOME extension.
pub const HANABI_SCHEMA: &str = "io.github.jeffshee.hanabi-extension";
/// The schema key holding the active wallpaper video path.
pub const VIDEO_PATH_KEY: &str = "video-path";
/// The name of the gsettings executable.
pub const GSETTINGS_EXECUTABLE_NAME: &str = "gsettings";

/// Outcome of one wallpaper-set invocation. The exit status of the external
/// tool is captured rather than discarded so callers can log it, but a
/// failure is non-fatal: the rotation loop continues regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The external tool exited successfully.
    Applied,
    /// The external tool exited with a non-zero status (the code, if any).
    Failed(Option<i32>),
}

impl SetOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            SetOutcome::Applied
        } else {
            SetOutcome::Failed(status.code())
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, SetOutcome::Applied)
    }
}

/// Applies a video path as the active wallpaper. The trait is the seam that
/// lets tests substitute a recording mock for the real gsettings call.
pub trait WallpaperSetter {
    /// Hands `path` to the external configuration tool and waits for it to
    /// finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the external tool cannot be spawned at all. A
    /// tool that runs but exits non-zero is `Ok(SetOutcome::Failed(..))`.
    fn set_video_path(&self, path: &Path) -> Result<SetOutcome, Box<dyn std::error::Error>>;
}

/// Sets the wallpaper through `gsettings set <schema> <key> <path>`.
///
/// The path is passed as its own argument vector element, never interpolated
/// into a shell command line, so filenames containing quotes or other shell
/// metacharacters are applied verbatim.
pub struct GsettingsSetter {
    program: String,
}

impl GsettingsSetter {
    pub fn new() -> Self {
        GsettingsSetter {
            program: GSETTINGS_EXECUTABLE_NAME.to_string(),
        }
    }

    /// Overrides the executable to invoke. Used by tests to substitute a
    /// program with a known exit status.
    #[cfg(test)]
    pub fn with_program(program: impl Into<String>) -> Self {
        GsettingsSetter {
            program: program.into(),
        }
    }
}

impl Default for GsettingsSetter {
    fn default() -> Self {
        Self::new()
    }
}

impl WallpaperSetter for GsettingsSetter {
    fn set_video_path(&self, path: &Path) -> Result<SetOutcome, Box<dyn std::error::Error>> {
        let status = Command::new(&self.program)
            .arg("set")
            .arg(HANABI_SCHEMA)
            .arg(VIDEO_PATH_KEY)
            .arg(path)
            .status()?; // Blocks until the external tool finishes; no timeout is applied.
        Ok(SetOutcome::from_status(status))
    }
}
