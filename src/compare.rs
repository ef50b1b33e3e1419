//! File-level diff between two game data directories.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::files::{self, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceKind {
    NewFile,
    DeletedFile,
    ChangedFile,
}

impl fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DifferenceKind::NewFile     => "    new file",
            DifferenceKind::DeletedFile => "deleted file",
            DifferenceKind::ChangedFile => "changed file",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub name: String,
    pub kind: DifferenceKind,
    /// File sizes in bytes; 0 for the missing side.
    pub old_len: u64,
    pub new_len: u64,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.name, self.kind, self.old_len, self.new_len)
    }
}

struct Scanned {
    json: String,
    len: u64,
}

/// Containers in `dir` by file name.  Malformed files are left out.
fn scan(dir: &Path) -> Result<BTreeMap<String, Scanned>, ToolError> {
    let mut out = BTreeMap::new();
    for path in files::list_files(dir)? {
        let bytes = files::read(&path)?;
        match crate::container::try_decode(&bytes) {
            Ok(Some(c)) => {
                out.insert(files::file_name(&path), Scanned { json: c.json, len: bytes.len() as u64 });
            }
            Ok(None) => {}
            Err(e) => warn!(path = %path.display(), "not compared: {e}"),
        }
    }
    Ok(out)
}

/// Compare the containers of two directories, matched by file name.  Only
/// the payload text is compared; header differences are ignored.
pub fn compare<P: AsRef<Path>, Q: AsRef<Path>>(old_dir: P, new_dir: Q) -> Result<Vec<Difference>, ToolError> {
    let old = scan(old_dir.as_ref())?;
    let new = scan(new_dir.as_ref())?;

    let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    let mut result = Vec::new();
    for name in names {
        let (kind, old_len, new_len) = match (old.get(name), new.get(name)) {
            (Some(o), Some(n)) if o.json != n.json => (DifferenceKind::ChangedFile, o.len, n.len),
            (Some(_), Some(_))                     => continue,
            (None, Some(n))                        => (DifferenceKind::NewFile, 0, n.len),
            (Some(o), None)                        => (DifferenceKind::DeletedFile, o.len, 0),
            (None, None)                           => continue,
        };
        result.push(Difference { name: name.clone(), kind, old_len, new_len });
    }
    Ok(result)
}
