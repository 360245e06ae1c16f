//! Drive-safe filename generation.

use chrono::{DateTime, Utc};

const MAX_COMPONENT_LENGTH: usize = 100;

/// Characters Drive rejects or that break share links.
const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Sanitize one name component: strip forbidden characters, collapse
/// whitespace runs to a single underscore, trim, cap the length. Falls back
/// to "file" when nothing survives.
pub fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_gap = false;
    for c in raw.trim().chars().take(MAX_COMPONENT_LENGTH) {
        if FORBIDDEN.contains(&c) {
            continue;
        }
        if c.is_whitespace() {
            pending_gap = !out.is_empty();
            continue;
        }
        if pending_gap {
            out.push('_');
            pending_gap = false;
        }
        out.push(c);
    }
    if out.is_empty() {
        "file".to_string()
    } else {
        out
    }
}

/// Deterministic output filename for one dispatched file:
/// `{uploader}_{date}_{workType}_{HHMMSS}_{seq}.{ext}`.
pub fn build_drive_filename(
    uploader: &str,
    date: &str,
    work_type: &str,
    original_name: &str,
    at: DateTime<Utc>,
    seq: usize,
) -> String {
    let ext = original_name
        .rsplit('.')
        .next()
        .filter(|e| !e.is_empty() && e.len() <= 10 && *e != original_name)
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "jpg".to_string());

    format!(
        "{}_{}_{}_{}_{:02}.{}",
        sanitize_component(uploader),
        sanitize_component(date),
        sanitize_component(work_type),
        at.format("%H%M%S"),
        seq,
        sanitize_component(&ext),
    )
}
