// src/file_utils.rs

use std::{
    io::{Error as IoError, ErrorKind as IoErrorKind},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Scans the specified folder for files whose extension is in `extensions`.
/// The comparison is case-insensitive; `extensions` entries are expected
/// lowercase (see `Config::new`). The scan can be performed recursively.
///
/// The candidate list is rebuilt from scratch on every call; nothing is
/// cached between scans.
///
/// # Arguments
///
/// * `folder_path` - The path to the directory to be scanned.
/// * `extensions` - Recognized extensions, lowercase, without the leading dot.
/// * `recursive` - If true, subdirectories are scanned; otherwise, only the top-level directory is scanned.
///
/// # Errors
///
/// Returns an error if:
/// * `folder_path` is not a valid directory.
/// * An issue occurs while accessing files or directories during the scan.
pub fn find_video_files(
    folder_path: &Path,
    extensions: &[String],
    recursive: bool,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !folder_path.is_dir() {
        return Err(Box::new(IoError::new(
            IoErrorKind::InvalidInput,
            format!("Path is not a directory: {}", folder_path.display()),
        )));
    }

    let mut video_files = Vec::new();

    let walker = WalkDir::new(folder_path).min_depth(1); // Start scanning from depth 1 (contents of the folder)
    let walker = if recursive {
        walker // No max_depth results in a fully recursive scan.
    } else {
        walker.max_depth(1) // Limit scan to the top-level directory contents.
    };

    for entry_result in walker {
        let entry = entry_result?; // Propagate errors encountered during directory walking.
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if extensions.contains(&ext.to_lowercase()) {
                    video_files.push(path.to_path_buf());
                }
            }
        }
    }
    Ok(video_files)
}
