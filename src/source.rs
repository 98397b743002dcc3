//! Generation-source loading collaborator.
//!
//! A run directory holds one `.rle` file per generation, named
//! `<stem>_<i>.rle` where `<stem>` is the directory's own file name
//! (Golly's exporter writes `b3_s23/b3_s23_0.rle`, `b3_s23_1.rle`, ...).
//! Loading stops at the first missing index; supplying fewer snapshots
//! than requested is a classification outcome, not an error here.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;

/// Read the ordered in-memory snapshot texts of one run directory, at
/// most `generations + 1` of them (generation 0 is the initial layout).
pub fn load_run_directory(dir: &Path, generations: usize) -> io::Result<Vec<String>> {
    let stem = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut sources = Vec::with_capacity(generations + 1);
    for generation in 0..=generations {
        let path = dir.join(format!("{stem}_{generation}.rle"));
        if !path.exists() {
            debug!("no source for generation {generation}: {}", path.display());
            break;
        }
        sources.push(fs::read_to_string(&path)?);
    }
    debug!(
        "loaded {} of {} sources from {}",
        sources.len(),
        generations + 1,
        dir.display()
    );
    Ok(sources)
}
