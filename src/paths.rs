//! Path expansion and normalization utilities.

use std::{
    env,
    path::{MAIN_SEPARATOR, Path, PathBuf},
};

use path_clean::PathClean;

use crate::error::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CMDGATE_CONFIG";

/// Return the default config path for the current platform.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::HomeDirMissing)?;
    Ok(home.join(".cmdgate.toml"))
}

/// Return the config path, honoring the `CMDGATE_CONFIG` override.
pub fn config_path() -> Result<PathBuf> {
    match env::var(CONFIG_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let base_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            expand_path(raw.trim(), &base_dir)
        }
        _ => default_config_path(),
    }
}

/// Expand a user-provided path and resolve it relative to a base directory.
pub fn expand_path(raw: &str, base_dir: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|error| Error::PathExpansion {
        path: raw.to_string(),
        source: error,
    })?;
    let expanded_path = PathBuf::from(expanded.as_ref());
    let resolved = if expanded_path.is_relative() {
        base_dir.join(expanded_path)
    } else {
        expanded_path
    };
    Ok(normalize_path(&resolved))
}

/// Normalize a path for comparisons by cleaning and canonicalizing when possible.
pub fn normalize_path(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => path.clean(),
    }
}

/// Render a path for display, using a tilde prefix for the home directory.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{expand_path, normalize_path};

    #[test]
    fn resolves_relative_paths_against_base() {
        let dir = tempdir().expect("tempdir");
        let base = normalize_path(dir.path());
        let resolved = expand_path("nested/../config.toml", &base).expect("expand");
        assert_eq!(resolved, base.join("config.toml"));
    }

    #[test]
    fn normalizes_existing_paths_to_same_target() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("data.json");
        fs::write(&file, "{}").expect("write");
        let dotted = dir.path().join(".").join("data.json");
        assert_eq!(normalize_path(&file), normalize_path(&dotted));
    }
}
