//! Path helpers for the Zellij sandbox.

use std::path::{Path, PathBuf};

/// Directory holding the plugin log files.
///
/// Resolves to `/host/.local/share/zellij/bibshelf`, which is
/// `~/.local/share/zellij/bibshelf` when Zellij was started from the home
/// directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("bibshelf")
}

/// Expands `~` to the `/host` mount.
///
/// # Examples
///
/// ```
/// use bibshelf::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/papers"), "/host/papers");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/srv/library"), "/srv/library");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

/// Removes the `/host` prefix for display.
///
/// ```
/// use bibshelf::infrastructure::strip_host_prefix;
///
/// assert_eq!(strip_host_prefix("/host/papers/knuth"), "/papers/knuth");
/// assert_eq!(strip_host_prefix("/srv/library"), "/srv/library");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    path.strip_prefix("/host").unwrap_or(path).to_string()
}

/// Converts a sandbox path into one a host command can use.
///
/// Paths under `/host` become relative to the host working directory, which
/// is where commands spawned by the plugin start. Other paths are returned
/// as they are.
#[must_use]
pub fn host_relative(path: &Path) -> PathBuf {
    path.strip_prefix("/host")
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_paths_become_relative() {
        assert_eq!(
            host_relative(Path::new("/host/papers/sicp/book.pdf")),
            PathBuf::from("papers/sicp/book.pdf")
        );
        assert_eq!(host_relative(Path::new("/host")), PathBuf::from(""));
        assert_eq!(host_relative(Path::new("/srv/a.pdf")), PathBuf::from("/srv/a.pdf"));
        assert_eq!(host_relative(Path::new("/hostile/a.pdf")), PathBuf::from("/hostile/a.pdf"));
    }

    #[test]
    fn data_dir_is_under_host() {
        assert!(get_data_dir().starts_with("/host"));
    }
}
