//! Filesystem-safe name mapping

/// Characters that cannot appear in a filename segment on any of the
/// supported platforms.
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replace reserved filename characters with `_` and trim surrounding
/// whitespace. Pure and idempotent; empty output is the caller's
/// fallback decision.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if RESERVED_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
