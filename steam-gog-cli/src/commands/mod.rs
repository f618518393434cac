pub(crate) mod config;
pub(crate) mod gog;
pub(crate) mod steam;

use std::path::Path;

use steam_gog_db::Connection;

use crate::CliError;

/// Open a database that earlier commands must already have created.
pub(crate) fn open_existing_db(path: &Path) -> Result<Connection, CliError> {
    if !path.exists() {
        return Err(CliError::config(format!(
            "No database at {}. Run 'steam-gog steam --sqlite {}' and 'steam-gog gog index' first.",
            path.display(),
            path.display()
        )));
    }
    open_db(path)
}

/// Open or create a database.
pub(crate) fn open_db(path: &Path) -> Result<Connection, CliError> {
    steam_gog_db::open_database(path).map_err(|e| {
        CliError::database(format!("Failed to open database at {}: {}", path.display(), e))
    })
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_str("Half-Life 2", 20), "Half-Life 2");
        assert_eq!(truncate_str("The Witcher 3: Wild Hunt", 10), "The Wit...");
        assert_eq!(truncate_str("Ōkami HD", 4), "Ō...");
        assert_eq!(truncate_str("DOOM", 2), "DO");
    }

    #[test]
    fn missing_database_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_existing_db(&dir.path().join("absent.db")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
