//! Filesystem path -> variable key mapping.
//!
//! Not injective: `a.txt` and `a!txt` both become `a_txt`. The engine
//! detects such collisions within a run; restores never invert keys.

/// True for characters allowed verbatim in a key.
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '~' | '/')
}

/// Replaces every character outside the key alphabet with one `_`.
pub fn sanitize(path: &str) -> String {
    path.chars()
        .map(|c| if is_key_char(c) { c } else { '_' })
        .collect()
}

/// Encodes `path` as a key under `root`.
///
/// Empty and `.` segments are dropped after joining, so doubled separators,
/// trailing slashes and a leading `/` on `path` never show up in the key.
pub fn encode_key(root: &str, path: &str) -> String {
    let sanitized = sanitize(path);
    join_segments(root.split('/').chain(sanitized.split('/')))
}

/// Canonical form of a root: the same segment rules `encode_key` applies,
/// so `/myapp`, `./myapp` and `myapp/` all name `myapp`.
pub fn normalize_root(root: &str) -> String {
    join_segments(root.split('/'))
}

fn join_segments<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            // Only reachable from the root; sanitized paths contain no dots.
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    out.join("/")
}
