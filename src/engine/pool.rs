//! Curated name pool backing random mode.
//!
//! The pool is a plain text file with one name per line. Lines are trimmed and
//! blank lines dropped. Duplicate lines are kept as separate slots. A reload
//! replaces the whole list; a failed reload leaves the pool empty.

use std::path::{Path, PathBuf};

use super::error::PoolError;

/// Outcome of a successful [`NamePool::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The file was read. The count may be zero.
    Loaded(usize),
    /// The file does not exist. The pool is empty until it is created and
    /// the pool reloaded.
    SourceMissing,
}

#[derive(Debug, Clone)]
pub struct NamePool {
    source: PathBuf,
    names: Vec<String>,
}

impl NamePool {
    /// Create an empty pool bound to `source`. Nothing is read until
    /// [`load`](Self::load) is called.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            names: Vec::new(),
        }
    }

    /// Build a pool from names already in memory.
    #[cfg(test)]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: PathBuf::new(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Re-read the backing file, replacing the current names.
    pub fn load(&mut self) -> Result<LoadStatus, PoolError> {
        self.names.clear();
        match std::fs::read_to_string(&self.source) {
            Ok(text) => {
                self.names = parse_names(&text);
                Ok(LoadStatus::Loaded(self.names.len()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LoadStatus::SourceMissing),
            Err(source) => Err(PoolError::Read {
                path: self.source.clone(),
                source,
            }),
        }
    }

    pub fn all(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Split pool text into names: one per line, trimmed, blanks discarded.
pub fn parse_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vcnick-pool-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_parse_names() {
        let text = "  Alice \r\nBob\n\n   \nCarol\r\nBob\n";
        assert_eq!(parse_names(text), vec!["Alice", "Bob", "Carol", "Bob"]);
        assert!(parse_names("").is_empty());
        assert!(parse_names("\n \r\n\t\n").is_empty());
    }

    #[test]
    fn test_load_preserves_file_order() {
        let path = temp_path("order.txt");
        std::fs::write(&path, "Zed\nAmy\n\nMia\n").unwrap();

        let mut pool = NamePool::new(&path);
        assert_eq!(pool.load().unwrap(), LoadStatus::Loaded(3));
        assert_eq!(pool.all(), ["Zed", "Amy", "Mia"]);
        assert!(!pool.is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_empty_file() {
        let path = temp_path("empty.txt");
        std::fs::write(&path, "\n  \n").unwrap();

        let mut pool = NamePool::new(&path);
        assert_eq!(pool.load().unwrap(), LoadStatus::Loaded(0));
        assert!(pool.is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_source_yields_empty_pool() {
        let mut pool = NamePool::from_names(["stale"]);
        pool.source = temp_path("does-not-exist.txt");
        assert_eq!(pool.load().unwrap(), LoadStatus::SourceMissing);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_unreadable_source_clears_pool() {
        let dir = temp_path("a-directory");
        std::fs::create_dir_all(&dir).unwrap();

        let mut pool = NamePool::new(&dir);
        pool.names = vec!["stale".to_string()];
        let err = pool.load().unwrap_err();
        assert!(matches!(err, PoolError::Read { .. }));
        assert!(pool.is_empty());

        std::fs::remove_dir(&dir).unwrap();
    }

    #[test]
    fn test_reload_replaces_names() {
        let path = temp_path("reload.txt");
        std::fs::write(&path, "One\nTwo\n").unwrap();
        let mut pool = NamePool::new(&path);
        pool.load().unwrap();
        assert_eq!(pool.len(), 2);

        std::fs::write(&path, "Three\n").unwrap();
        pool.load().unwrap();
        assert_eq!(pool.all(), ["Three"]);

        std::fs::remove_file(&path).unwrap();
    }
}
