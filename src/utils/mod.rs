pub mod text;

use std::fs;
use std::path::Path;

use crate::error::{GhpError, Result};

pub use text::{char_len, clamp_width, pad, strip_ansi, truncate_with_ellipsis};

/// Ensure the parent directory of a path exists, creating it if necessary.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            GhpError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create directory at {}: {}", parent.display(), e),
            ))
        })?;
    }
    Ok(())
}

/// Check if stdout is a TTY
pub fn is_stdout_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}
