//! Port mod files to a newer game version.
//!
//! A mod file's payload is kept, but it is stamped with the header of the
//! matching file from the new game version, so the result carries the new
//! format revision.  Matching is either by file name or by `(ItemType, Id)`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::container::encode;
use crate::database::Database;
use crate::files::{self, BatchReport, ToolError};
use crate::header::{Header, HeaderLayout};
use crate::record::{Record, RecordKey};

/// Result of a translation run.
#[derive(Debug, Default)]
pub struct Translation {
    /// Mod files with no counterpart in the new version.
    pub untranslated: Vec<PathBuf>,
    /// `processed` counts written files, `skipped` non-containers.
    pub report: BatchReport,
}

enum Outcome {
    Skipped,
    Untranslated,
    Written,
}

fn translate_one<F>(path: &Path, new_mod: &Path, layout: HeaderLayout, template_for: &mut F) -> Result<Outcome, ToolError>
where
    F: FnMut(&Path) -> Result<Option<PathBuf>, ToolError>,
{
    let Some(container) = files::load_container(path)? else {
        return Ok(Outcome::Skipped);
    };
    let Some(template) = template_for(path)? else {
        return Ok(Outcome::Untranslated);
    };
    let header_bytes = files::read(&template)?;
    let header = Header::from_bytes(&header_bytes).map_err(|e| ToolError::container(&template, e))?;
    let encoded = encode(&header, &container.json, layout).map_err(|e| ToolError::container(&template, e))?;
    let target = new_mod.join(files::file_name(&template));
    files::write(&target, &encoded)?;
    debug!(from = %path.display(), to = %target.display(), "translated");
    Ok(Outcome::Written)
}

/// Translate every container in `old_mod` into `new_mod`.
///
/// `template_for` maps an old mod file to the new-version file whose header
/// (and file name) the output takes.  A file that fails is recorded in the
/// report and its siblings are still translated.
pub fn translate_with<F>(
    old_mod: &Path,
    new_mod: &Path,
    layout: HeaderLayout,
    mut template_for: F,
) -> Result<Translation, ToolError>
where
    F: FnMut(&Path) -> Result<Option<PathBuf>, ToolError>,
{
    files::create_dir_all(new_mod)?;
    let mut out = Translation::default();
    for path in files::list_files(old_mod)? {
        match translate_one(&path, new_mod, layout, &mut template_for) {
            Ok(Outcome::Written)      => out.report.processed += 1,
            Ok(Outcome::Skipped)      => out.report.skipped += 1,
            Ok(Outcome::Untranslated) => out.untranslated.push(path),
            Err(e) => {
                warn!("not translated: {e}");
                out.report.failures.push(e);
            }
        }
    }
    info!(
        translated = out.report.processed,
        untranslated = out.untranslated.len(),
        failed = out.report.failures.len(),
        "translation finished"
    );
    Ok(out)
}

/// Template = file of the same name in `new_events`.
pub fn translate_by_name(
    old_mod: &Path,
    new_events: &Path,
    new_mod: &Path,
    layout: HeaderLayout,
) -> Result<Translation, ToolError> {
    translate_with(old_mod, new_mod, layout, |path| {
        let candidate = path.file_name().map(|name| new_events.join(name));
        Ok(candidate.filter(|c| c.is_file()))
    })
}

/// Template = file in `new_events` holding the record with the same
/// `(ItemType, Id)` as the same-named file in `old_events`.  Handles
/// versions that renamed files.
///
/// Files of `new_events` that fail to load are reported as failures too.
pub fn translate_by_key(
    old_mod: &Path,
    old_events: &Path,
    new_events: &Path,
    new_mod: &Path,
    layout: HeaderLayout,
) -> Result<Translation, ToolError> {
    let (new_db, load_report) = Database::load(new_events)?;
    let by_key: HashMap<RecordKey, PathBuf> = new_db.iter().map(|e| (e.key(), e.path.clone())).collect();

    let mut out = translate_with(old_mod, new_mod, layout, |path| {
        let Some(name) = path.file_name() else {
            return Ok(None);
        };
        let old_event = old_events.join(name);
        if !old_event.is_file() {
            return Ok(None);
        }
        let Some(c) = files::load_container(&old_event)? else {
            return Ok(None);
        };
        let key = Record::from_json(&c.json).map_err(|e| ToolError::record(&old_event, e))?.key();
        Ok(by_key.get(&key).cloned())
    })?;
    out.report.failures.extend(load_report.failures);
    Ok(out)
}
