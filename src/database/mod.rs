//! In-memory database of every record in a game data directory.
//!
//! Records live in one owning map keyed by [`RecordKey`].  Cross-references
//! (a weapon's display name comes from the component that mounts it, a
//! build's name from its hull, ...) are resolved by query methods that take
//! explicit keys; records never point back at the database.

mod names;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::files::{self, BatchReport, ToolError};
use crate::record::{ItemType, Record, RecordKey};

/// One decoded file.
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub record: Record,
    /// Payload text exactly as stored in the container.
    pub json: String,
}

impl Entry {
    pub fn key(&self) -> RecordKey {
        self.record.key()
    }

    pub fn file_name(&self) -> String {
        files::file_name(&self.path)
    }
}

enum Loaded {
    Skipped,
    Entry(Entry),
    Failed(ToolError),
}

fn load_one(path: &Path) -> Loaded {
    let container = match files::load_container(path) {
        Ok(Some(c)) => c,
        Ok(None)    => return Loaded::Skipped,
        Err(e)      => return Loaded::Failed(e),
    };
    match Record::from_json(&container.json) {
        Ok(record) => Loaded::Entry(Entry { path: path.to_owned(), record, json: container.json }),
        Err(e)     => Loaded::Failed(ToolError::record(path, e)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Database {
    entries: BTreeMap<RecordKey, Entry>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every regular file in `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<(Self, BatchReport), ToolError> {
        let dir = dir.as_ref();
        let paths = files::list_files(dir)?;

        #[cfg(feature = "parallel")]
        let outcomes: Vec<Loaded> = {
            use rayon::prelude::*;
            paths.par_iter().map(|p| load_one(p)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Loaded> = paths.iter().map(|p| load_one(p)).collect();

        let mut db = Database::new();
        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                Loaded::Skipped => report.skipped += 1,
                Loaded::Failed(e) => {
                    warn!("skipping {e}");
                    report.failures.push(e);
                }
                Loaded::Entry(entry) => {
                    debug!(key = %entry.key(), path = %entry.path.display(), "loaded record");
                    report.processed += 1;
                    if let Some(old) = db.insert(entry) {
                        warn!(key = %old.key(), path = %old.path.display(), "duplicate record replaced");
                    }
                }
            }
        }
        info!(
            dir = %dir.display(),
            loaded = report.processed,
            skipped = report.skipped,
            failed = report.failures.len(),
            "database loaded"
        );
        Ok((db, report))
    }

    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.key(), entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: RecordKey) -> Option<&Entry> {
        self.entries.get(&key)
    }

    pub fn record(&self, key: RecordKey) -> Option<&Record> {
        self.get(key).map(|e| &e.record)
    }

    /// All entries ordered by item type, then id.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn of_type(&self, item_type: ItemType) -> impl Iterator<Item = &Entry> {
        let lo = RecordKey::new(item_type, i32::MIN);
        let hi = RecordKey::new(item_type, i32::MAX);
        self.entries.range(lo..=hi).map(|(_, e)| e)
    }

    /// Path of `key`'s file inside an exported database rooted at `root`.
    pub fn database_file_name(&self, root: &Path, key: RecordKey) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in key.item_type.dir_name().split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}_{}.json", key.id, sanitize(&self.raw_file_name(key))));
        path
    }

    /// Export every record as a plain JSON file under `root`, one directory
    /// per item type.  Returns the number of files written.
    pub fn build<P: AsRef<Path>>(&self, root: P) -> Result<usize, ToolError> {
        let root = root.as_ref();
        files::create_dir_all(root)?;
        for t in ItemType::ALL {
            if !t.dir_name().is_empty() {
                files::create_dir_all(&root.join(t.dir_name()))?;
            }
        }
        for entry in self.iter() {
            let target = self.database_file_name(root, entry.key());
            files::write(&target, entry.json.as_bytes())?;
        }
        info!(root = %root.display(), files = self.len(), "database exported");
        Ok(self.len())
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for t in ItemType::ALL {
            let mut group = self.of_type(t).peekable();
            if group.peek().is_none() {
                continue;
            }
            if !first {
                writeln!(f)?;
            }
            first = false;
            for entry in group {
                writeln!(f, "{}", self.describe(entry.key()))?;
            }
        }
        Ok(())
    }
}

/// Replace characters that cannot appear in a file name.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
