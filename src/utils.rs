//! Shared helpers for the CLI: workspace location and input parsing.

use std::path::PathBuf;

use anyhow::Result;

/// Environment variable naming the workspace root.
pub const ENV_HOME: &str = "DOCTAG_HOME";

/// Resolves the workspace root.
///
/// Uses `explicit` if given, then `DOCTAG_HOME`, then `{data_dir}/doctag` where
/// `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if no explicit path or env var is set and the data
/// directory cannot be determined.
pub fn resolve_workspace_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(ENV_HOME).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("doctag"))
}

/// Parses comma-separated variant spellings.
///
/// Splits on commas, trims whitespace from each piece, and filters out empty strings.
///
/// # Examples
///
/// ```
/// use doctag::utils::parse_variants;
///
/// assert_eq!(parse_variants("feline, kitty, "), vec!["feline", "kitty"]);
/// ```
pub fn parse_variants(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn parse_variants_with_normal_input() {
        assert_eq!(parse_variants("feline,kitty"), vec!["feline", "kitty"]);
    }

    #[test]
    fn parse_variants_with_whitespace_and_empty_elements() {
        assert_eq!(parse_variants(" feline ,, kitty ,"), vec!["feline", "kitty"]);
    }

    #[test]
    fn parse_variants_only_whitespace() {
        assert!(parse_variants("  ,  ,  ").is_empty());
        assert!(parse_variants("").is_empty());
    }

    #[test]
    #[serial]
    fn explicit_path_wins_over_environment() {
        unsafe {
            std::env::set_var(ENV_HOME, "/from/env");
        }
        let path = resolve_workspace_path(Some(PathBuf::from("/explicit"))).unwrap();
        assert_eq!(path, PathBuf::from("/explicit"));
        unsafe {
            std::env::remove_var(ENV_HOME);
        }
    }

    #[test]
    #[serial]
    fn environment_used_when_no_explicit_path() {
        unsafe {
            std::env::set_var(ENV_HOME, "/from/env");
        }
        let path = resolve_workspace_path(None).unwrap();
        assert_eq!(path, PathBuf::from("/from/env"));
        unsafe {
            std::env::remove_var(ENV_HOME);
        }
    }

    #[test]
    #[serial]
    fn default_path_ends_with_crate_directory() {
        unsafe {
            std::env::remove_var(ENV_HOME);
        }
        if let Ok(path) = resolve_workspace_path(None) {
            assert!(path.ends_with("doctag"));
        }
    }
}
