//! Data directory resolution.

use std::path::PathBuf;

/// Resolve the data directory holding `confide.db` and `config.toml`.
///
/// Priority: `CONFIDE_DATA_DIR`, then `~/.confide`, then `./.confide`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CONFIDE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".confide");
    }

    PathBuf::from(".confide")
}

/// SQLite URL for the chat database inside `data_dir`.
pub fn database_url(data_dir: &std::path::Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("confide.db").display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("CONFIDE_DATA_DIR", "/tmp/test-confide");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-confide"));
        unsafe {
            std::env::remove_var("CONFIDE_DATA_DIR");
        }
    }

    #[test]
    fn test_database_url() {
        let url = database_url(std::path::Path::new("/var/lib/confide"));
        assert_eq!(url, "sqlite:///var/lib/confide/confide.db?mode=rwc");
    }
}
