// src/rotator.rs

use crate::config::Config;
use crate::file_utils::find_video_files;
use crate::gsettings::{SetOutcome, WallpaperSetter};
use crate::selection::choose_video;
use rand::prelude::*;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

/// Upper bound on one uninterrupted sleep, so cancellation stays responsive
/// even with long rotation intervals.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// A shared flag that stops the rotation loop. Cloning yields a handle to
/// the same flag, so a test (or a future signal handler) can cancel a loop
/// running elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives the scan → select → apply → sleep cycle.
pub struct Rotator<'a> {
    config: Config,
    setter: &'a dyn WallpaperSetter,
}

impl<'a> Rotator<'a> {
    pub fn new(config: Config, setter: &'a dyn WallpaperSetter) -> Self {
        Rotator { config, setter }
    }

    /// Performs a single rotation: rescan the folder, pick one candidate
    /// uniformly at random, and hand it to the setter. An empty candidate
    /// list is a no-op, not an error. Returns the selected path, if any.
    ///
    /// The chosen path is echoed to stdout as `Video path: <path>`; the
    /// setter's outcome is logged but never fails the rotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder scan fails (e.g. the folder vanished
    /// or became unreadable).
    pub fn rotate_once<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
        let candidates = find_video_files(
            &self.config.folder,
            &self.config.extensions,
            self.config.recursive,
        )?;

        let selected = match choose_video(&candidates, rng) {
            Some(path) => path,
            None => {
                log::debug!(
                    "No matching video files in '{}'; skipping this rotation.",
                    self.config.folder.display()
                );
                return Ok(None);
            }
        };

        println!("Video path: {}", selected.display());

        match self.setter.set_video_path(selected) {
            Ok(SetOutcome::Applied) => {
                log::debug!("Wallpaper set to '{}'.", selected.display());
            }
            Ok(SetOutcome::Failed(code)) => {
                log::warn!(
                    "gsettings exited with status {} for '{}'; continuing.",
                    code.map_or_else(|| "unknown".to_string(), |c| c.to_string()),
                    selected.display()
                );
            }
            Err(e) => {
                log::error!("Could not invoke gsettings: {}; continuing.", e);
            }
        }

        Ok(Some(selected.clone()))
    }

    /// Runs rotations until `cancel` is raised. The flag is checked before
    /// each scan, after each invocation, and repeatedly during the interval
    /// sleep, so a cancelled loop stops within one sleep slice.
    ///
    /// # Errors
    ///
    /// Returns the first scan error; everything else is non-fatal.
    pub fn run(&self, cancel: &CancellationFlag) -> Result<(), Box<dyn std::error::Error>> {
        let mut rng = rand::rng();
        while !cancel.is_cancelled() {
            self.rotate_once(&mut rng)?;
            if cancel.is_cancelled() {
                break;
            }
            sleep_with_cancel(self.config.interval, cancel);
        }
        Ok(())
    }
}

/// Sleeps for `duration` in bounded slices, returning early once `cancel`
/// is raised.
fn sleep_with_cancel(duration: Duration, cancel: &CancellationFlag) {
    let deadline = Instant::now() + duration;
    while !cancel.is_cancelled() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records every path it is handed; optionally raises a cancellation
    /// flag after a fixed number of calls so `run` terminates.
    struct RecordingSetter {
        calls: Mutex<Vec<PathBuf>>,
        cancel_after: Option<(usize, CancellationFlag)>,
    }

    impl RecordingSetter {
        fn new() -> Self {
            RecordingSetter {
                calls: Mutex::new(Vec::new()),
                cancel_after: None,
            }
        }

        fn cancelling_after(count: usize, flag: CancellationFlag) -> Self {
            RecordingSetter {
                calls: Mutex::new(Vec::new()),
                cancel_after: Some((count, flag)),
            }
        }

        fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl WallpaperSetter for RecordingSetter {
        fn set_video_path(&self, path: &Path) -> Result<SetOutcome, Box<dyn std::error::Error>> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(path.to_path_buf());
            if let Some((count, flag)) = &self.cancel_after {
                if calls.len() >= *count {
                    flag.cancel();
                }
            }
            Ok(SetOutcome::Applied)
        }
    }

    fn test_config(folder: &Path) -> Config {
        Config {
            folder: folder.to_path_buf(),
            extensions: vec!["mp4".to_string(), "webm".to_string()],
            interval: Duration::from_millis(1),
            recursive: true,
        }
    }

    #[test]
    fn test_empty_folder_skips_invocation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let setter = RecordingSetter::new();
        let rotator = Rotator::new(test_config(temp_dir.path()), &setter);

        let mut rng = StdRng::seed_from_u64(1);
        let selected = rotator.rotate_once(&mut rng).unwrap();

        assert!(selected.is_none());
        assert!(setter.calls().is_empty());
    }

    #[test]
    fn test_rotation_selects_and_applies_a_candidate() {
        let temp_dir = tempfile::tempdir().unwrap();
        File::create(temp_dir.path().join("a.mp4")).unwrap();
        File::create(temp_dir.path().join("b.webm")).unwrap();
        File::create(temp_dir.path().join("c.txt")).unwrap();

        let setter = RecordingSetter::new();
        let rotator = Rotator::new(test_config(temp_dir.path()), &setter);

        let mut rng = StdRng::seed_from_u64(7);
        let selected = rotator.rotate_once(&mut rng).unwrap().unwrap();

        let ext = selected.extension().unwrap().to_string_lossy().to_lowercase();
        assert!(ext == "mp4" || ext == "webm");
        assert_ne!(selected.file_name().unwrap(), "c.txt");
        assert_eq!(setter.calls(), vec![selected]);
    }

    #[test]
    fn test_quoted_filename_reaches_setter_intact() {
        let temp_dir = tempfile::tempdir().unwrap();
        File::create(temp_dir.path().join("it's.mp4")).unwrap();

        let setter = RecordingSetter::new();
        let rotator = Rotator::new(test_config(temp_dir.path()), &setter);

        let mut rng = StdRng::seed_from_u64(1);
        let selected = rotator.rotate_once(&mut rng).unwrap().unwrap();

        assert_eq!(selected.file_name().unwrap(), "it's.mp4");
        assert_eq!(setter.calls(), vec![selected]);
    }

    #[test]
    fn test_missing_folder_propagates_scan_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let setter = RecordingSetter::new();
        let rotator = Rotator::new(test_config(&temp_dir.path().join("gone")), &setter);

        let mut rng = StdRng::seed_from_u64(1);
        assert!(rotator.rotate_once(&mut rng).is_err());
        assert!(setter.calls().is_empty());
    }

    #[test]
    fn test_run_stops_after_cancellation() {
        let temp_dir = tempfile::tempdir().unwrap();
        File::create(temp_dir.path().join("a.mp4")).unwrap();

        let cancel = CancellationFlag::new();
        let setter = RecordingSetter::cancelling_after(3, cancel.clone());
        let rotator = Rotator::new(test_config(temp_dir.path()), &setter);

        rotator.run(&cancel).unwrap();

        assert_eq!(setter.calls().len(), 3);
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_run_with_raised_flag_never_invokes() {
        let temp_dir = tempfile::tempdir().unwrap();
        File::create(temp_dir.path().join("a.mp4")).unwrap();

        let cancel = CancellationFlag::new();
        cancel.cancel();
        let setter = RecordingSetter::new();
        let rotator = Rotator::new(test_config(temp_dir.path()), &setter);

        rotator.run(&cancel).unwrap();
        assert!(setter.calls().is_empty());
    }

    #[test]
    fn test_sleep_with_cancel_returns_early() {
        let cancel = CancellationFlag::new();
        cancel.cancel();

        let start = Instant::now();
        sleep_with_cancel(Duration::from_secs(30), &cancel);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
