use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

// Maximum size for config, filter and record files: 10MB
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Validates that a file doesn't exceed the maximum allowed size
///
/// # Security
/// Prevents memory exhaustion when loading large inputs into memory
pub fn validate_file_size(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} bytes (max: {} bytes = {}MB)",
            file_size,
            MAX_FILE_SIZE_BYTES,
            MAX_FILE_SIZE_BYTES / (1024 * 1024)
        );
    }

    Ok(())
}

/// Read a whole file as UTF-8 after checking its size
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    validate_file_size(path)?;
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}
