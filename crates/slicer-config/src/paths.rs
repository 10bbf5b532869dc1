//! Platform-specific paths for presets and session files.
//!
//! - **User config**: `~/.config/slicer/` (Linux), `~/Library/Application Support/slicer/` (macOS), `%APPDATA%\slicer\` (Windows)
//! - **User presets**: the `presets/` directory inside the user config directory
//! - **Default session**: `session.toml` inside the user config directory
//!
//! Factory presets are compiled in and never touch the filesystem.

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "slicer";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// File name of the default session.
const SESSION_FILE: &str = "session.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform directory cannot be
/// determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Path of the session file loaded when none is given.
pub fn default_session_path() -> PathBuf {
    user_config_dir().join(SESSION_FILE)
}

/// Find a preset file by name or path.
///
/// `name` may be a path to an existing file, or a preset name with or
/// without the `.toml` extension, looked up in the user presets directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

/// [`find_preset`] against an explicit presets directory.
pub fn find_preset_in(name: &str, presets_dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };
    let candidate = presets_dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Ensure the user presets directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_presets_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_presets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List the preset files in the user presets directory.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

/// List the `.toml` files in a directory, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Get the preset name from a file path (the file stem).
///
/// ```rust
/// use slicer_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/drift.toml"));
/// assert_eq!(name, Some("drift".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dirs_are_namespaced() {
        assert!(user_config_dir().ends_with(APP_NAME));
        assert!(user_presets_dir().ends_with("slicer/presets"));
        assert_eq!(
            default_session_path().file_name().and_then(|n| n.to_str()),
            Some("session.toml")
        );
    }

    #[test]
    fn find_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let preset_path = temp_dir.path().join("test.toml");
        fs::write(&preset_path, "name = \"test\"").unwrap();

        let found = find_preset(preset_path.to_str().unwrap());
        assert_eq!(found, Some(preset_path));
    }

    #[test]
    fn find_by_name_with_or_without_extension() {
        let temp_dir = TempDir::new().unwrap();
        let preset_path = temp_dir.path().join("glass.toml");
        fs::write(&preset_path, "name = \"glass\"").unwrap();

        assert_eq!(find_preset_in("glass", temp_dir.path()), Some(preset_path.clone()));
        assert_eq!(find_preset_in("glass.toml", temp_dir.path()), Some(preset_path));
        assert_eq!(find_preset_in("steel", temp_dir.path()), None);
    }

    #[test]
    fn find_missing() {
        assert!(find_preset("nonexistent_preset_12345").is_none());
    }

    #[test]
    fn list_only_toml_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp_dir.path().join("dir.toml")).unwrap();

        let presets = list_presets_in_dir(temp_dir.path());
        let names: Vec<_> = presets
            .iter()
            .filter_map(|p| preset_name_from_path(p))
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn list_missing_dir() {
        assert!(list_presets_in_dir(Path::new("/nonexistent/path/12345")).is_empty());
    }
}
