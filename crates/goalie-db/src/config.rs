/// Database configuration.
///
/// The URL is resolved by the caller; `sqlite://goalie.db` (relative to the
/// working directory) is the fallback when nothing is configured.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full SQLite connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// The default connection URL used when nothing else is configured.
    pub const DEFAULT_URL: &str = "sqlite://goalie.db";

    /// Connection URL for a private in-memory database.
    pub const MEMORY_URL: &str = "sqlite::memory:";

    /// Build a config from an explicit URL (useful for tests and CLI flags).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Whether the URL points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Extract the database file path from the URL.
    ///
    /// Returns `None` for in-memory databases or URLs without a path.
    pub fn database_path(&self) -> Option<&str> {
        if self.is_in_memory() {
            return None;
        }
        let rest = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))
            .unwrap_or(&self.database_url);
        // Drop any `?mode=rwc` style query string.
        let path = rest.split('?').next().unwrap_or(rest);
        Some(path).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url() {
        let cfg = DbConfig::new(DbConfig::DEFAULT_URL);
        assert_eq!(cfg.database_url, "sqlite://goalie.db");
        assert_eq!(cfg.database_path(), Some("goalie.db"));
    }

    #[test]
    fn database_path_strips_scheme_and_query() {
        let cfg = DbConfig::new("sqlite:///var/lib/goalie/data.db?mode=rwc");
        assert_eq!(cfg.database_path(), Some("/var/lib/goalie/data.db"));

        let cfg = DbConfig::new("sqlite:todo.db");
        assert_eq!(cfg.database_path(), Some("todo.db"));
    }

    #[test]
    fn in_memory_has_no_path() {
        let cfg = DbConfig::new(DbConfig::MEMORY_URL);
        assert!(cfg.is_in_memory());
        assert_eq!(cfg.database_path(), None);
    }

    #[test]
    fn empty_path_is_none() {
        let cfg = DbConfig::new("sqlite://");
        assert_eq!(cfg.database_path(), None);
    }
}
