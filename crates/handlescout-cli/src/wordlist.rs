//! Candidate list loading and shuffling.
//!
//! The list is read once before the pool starts; a missing or unreadable
//! file is the one fatal input error in the whole program.

use anyhow::{Context, Result};
use handlescout_core::Candidate;
use rand::seq::SliceRandom;
use std::path::Path;
use tracing::warn;

/// Load, validate, and shuffle the candidate list.
///
/// Blank lines are skipped; lines that fail candidate validation are
/// reported and dropped rather than aborting the run.
pub async fn load(path: &Path) -> Result<Vec<Candidate>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read candidate list {}", path.display()))?;

    let mut candidates = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Candidate::new(line) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!("skipping candidate line: {e}"),
        }
    }

    candidates.shuffle(&mut rand::thread_rng());
    Ok(candidates)
}
