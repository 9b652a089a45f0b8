//! Latest-snapshot-per-source loader.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use common::{Error, RawQuoteRow, Result, Source};
use tracing::{debug, warn};

/// Reads raw quote rows from a directory of scraper snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Newest `{prefix}-*.jsonl` file for a source, by modification time.
    pub fn latest_snapshot(&self, source: Source) -> Result<PathBuf> {
        let prefix = format!("{}-", source.prefix());
        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            Error::Storage(format!(
                "cannot read snapshot dir {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n,
                None => continue,
            };
            if !name.starts_with(&prefix) || !name.ends_with(".jsonl") {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            let newer = newest
                .as_ref()
                .is_none_or(|(best, _)| modified > *best);
            if newer {
                newest = Some((modified, path));
            }
        }

        newest.map(|(_, path)| path).ok_or_else(|| Error::EmptySnapshot {
            src: source.to_string(),
            detail: format!("no {}*.jsonl in {}", prefix, self.dir.display()),
        })
    }

    /// Load the latest snapshot for a source.
    ///
    /// Unparseable lines are skipped with a warning; a snapshot that
    /// yields zero rows is an error, because running the pipeline against
    /// it would silently report "no opportunities".
    pub fn load(&self, source: Source) -> Result<Vec<RawQuoteRow>> {
        let path = self.latest_snapshot(source)?;
        let rows = read_rows(&path)?;
        if rows.is_empty() {
            return Err(Error::EmptySnapshot {
                src: source.to_string(),
                detail: format!("{} contained no usable rows", path.display()),
            });
        }
        debug!(source = %source, path = %path.display(), rows = rows.len(), "snapshot loaded");
        Ok(rows)
    }
}

fn read_rows(path: &Path) -> Result<Vec<RawQuoteRow>> {
    let file = File::open(path)?;
    let mut rows = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawQuoteRow>(&line) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(path = %path.display(), line = idx + 1, error = %e, "skipping bad snapshot line");
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn row_json(event: &str) -> String {
        format!(
            r#"{{"event_id":"e1","event_name":"{}","sport":"Voetbal","market_label":"Draw No Bet","outcome_label":"1","odds":2.0,"start_time":"2025-03-01T20:00:00Z"}}"#,
            event
        )
    }

    fn write_file(dir: &Path, name: &str, lines: &[String]) {
        let mut f = File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(f, "{}", line).unwrap();
        }
    }

    #[test]
    fn test_picks_newest_snapshot_by_mtime() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "toto-0900.jsonl", &[row_json("Old vs Older")]);
        let old = dir.path().join("toto-0900.jsonl");
        let past = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        let file = File::options().append(true).open(&old).unwrap();
        file.set_modified(past).unwrap();
        write_file(dir.path(), "toto-1000.jsonl", &[row_json("Ajax vs PSV")]);

        let store = SnapshotStore::new(dir.path());
        let rows = store.load(Source::Toto).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_name.as_deref(), Some("Ajax vs PSV"));
    }

    #[test]
    fn test_sources_do_not_cross() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "kambi-1000.jsonl", &[row_json("Ajax vs PSV")]);
        let store = SnapshotStore::new(dir.path());
        assert!(store.load(Source::Toto).is_err());
        assert!(store.load(Source::Kambi).is_ok());
    }

    #[test]
    fn test_bad_lines_skipped_good_rows_kept() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "toto-1000.jsonl",
            &[
                row_json("Ajax vs PSV"),
                "not json at all".to_string(),
                row_json("AZ vs Feyenoord"),
            ],
        );
        let store = SnapshotStore::new(dir.path());
        let rows = store.load(Source::Toto).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_empty_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "toto-1000.jsonl", &["".to_string()]);
        let store = SnapshotStore::new(dir.path());
        let err = store.load(Source::Toto).unwrap_err();
        assert!(matches!(err, Error::EmptySnapshot { .. }));
    }

    #[test]
    fn test_missing_directory_is_a_storage_error() {
        let store = SnapshotStore::new("/nonexistent/snapshots");
        assert!(matches!(
            store.load(Source::Toto),
            Err(Error::Storage(_))
        ));
    }
}
