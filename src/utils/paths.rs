use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use walkdir::WalkDir;

// Maximum transcript size: 10MB
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions picked up when scanning directories for transcripts
pub const TRANSCRIPT_EXTENSIONS: [&str; 2] = ["jsonl", "txt"];

/// Validates that a file's size is within acceptable limits (10MB)
///
/// Takes an open file handle so the size checked is the size of the file
/// actually being read.
///
/// # Errors
///
/// Returns an error if the metadata cannot be read or the file is larger than 10MB.
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Open a transcript for reading, rejecting directories and oversized files
pub fn safe_open_file(path: &Path) -> Result<File> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
    if !metadata.is_file() {
        bail!("Not a regular file: {}", path.display());
    }

    validate_file_size(&file, path)?;
    Ok(file)
}

/// Read a whole transcript into memory
pub fn read_transcript(path: &Path) -> Result<String> {
    let mut file = safe_open_file(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .with_context(|| format!("Failed to read transcript (is it UTF-8?): {}", path.display()))?;
    Ok(content)
}

pub fn is_transcript_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TRANSCRIPT_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
}

/// Expand the given paths into transcript files
///
/// Files are kept as given, whatever their extension. Directories are walked
/// recursively for `.jsonl` / `.txt` files, sorted by path.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be walked.
pub fn collect_transcript_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(path).follow_links(false) {
                let entry = entry
                    .with_context(|| format!("Failed to scan directory: {}", path.display()))?;
                if entry.file_type().is_file() && is_transcript_file(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }

    Ok(files)
}

/// File name used for Markdown exports generated on `date`
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("session-analysis-{}.md", date.format("%Y-%m-%d"))
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref()).filter(|h| !h.is_empty());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && let Some(rest) = path_str.strip_prefix(home)
        && (rest.is_empty() || rest.starts_with('/'))
    {
        return format!("~{}", rest);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
