use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Load every `.txt` file in `dir` into an id -> text map.
///
/// The id is the file stem; text is trimmed. The map is ordered, so iterating
/// it yields identifiers in lexicographic order.
pub fn load_transcript_dir(dir: &Path) -> AppResult<BTreeMap<String, String>> {
    if !dir.is_dir() {
        return Err(AppError::InputMissing {
            path: dir.to_path_buf(),
        });
    }

    let mut items = BTreeMap::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let text = std::fs::read_to_string(&path)?;
        items.insert(id.to_owned(), text.trim().to_owned());
    }

    Ok(items)
}

pub fn write_transcript(dir: &Path, id: &str, text: &str) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{id}.txt"));
    std::fs::write(&path, text)?;
    Ok(path)
}
