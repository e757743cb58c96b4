//! Folder catalog scanner
//!
//! Builds a [`Catalog`] from audio files under a folder. This is a
//! boundary collaborator for the demo host; the controller itself never
//! depends on where catalogs come from. Tags and duration are probed
//! with lofty, falling back to the file stem and "Unknown" artist when
//! a file carries no usable tags.

use lofty::{AudioFile, ItemKey, TaggedFileExt};
use smp_common::{Catalog, Result, Track};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions considered playable
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "m4a", "wav"];

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

/// Scan `root` recursively and build an ordered catalog.
///
/// Files are sorted by path so the track order is stable across runs;
/// ids are assigned by enumeration order within the scan.
pub fn scan_folder(root: &Path) -> Result<Catalog> {
    info!("scanning {} for audio files", root.display());

    let mut paths: Vec<_> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    let mut catalog = Vec::with_capacity(paths.len());
    for (id, path) in paths.into_iter().enumerate() {
        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown")
            .to_string();
        let mut artist = "Unknown".to_string();
        let mut duration_ms = 0u64;

        match lofty::read_from_path(&path) {
            Ok(tagged) => {
                duration_ms = tagged.properties().duration().as_millis() as u64;
                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                        if !v.trim().is_empty() {
                            title = v.trim().to_string();
                        }
                    }
                    if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                        if !v.trim().is_empty() {
                            artist = v.trim().to_string();
                        }
                    }
                }
            }
            Err(e) => debug!("no readable tags in {}: {}", path.display(), e),
        }

        catalog.push(Track {
            id: id as i64,
            title,
            artist,
            duration_ms,
            location: path.to_string_lossy().into_owned(),
        });
    }

    info!("catalog built: {} tracks", catalog.len());
    Ok(catalog)
}
