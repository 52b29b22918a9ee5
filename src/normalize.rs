//! Identifier and directory normalization.
//!
//! Everything entering a registry passes through here first, so two spellings
//! of the same identifier always land on the same key.

use std::path::Path;

/// Case-fold an identifier into slug form.
///
/// Letters are lowercased, runs of whitespace become a single `-`, and
/// characters other than alphanumerics, `-` and `_` are dropped. Leading and
/// trailing dashes are trimmed. `"Post Types"` becomes `"post-types"`, while
/// `"post_type"` is left alone.
pub fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_dash = !out.is_empty();
            continue;
        }
        if !(ch.is_alphanumeric() || ch == '_') {
            continue;
        }
        if pending_dash {
            out.push('-');
            pending_dash = false;
        }
        out.extend(ch.to_lowercase());
    }

    out
}

/// Normalize a directory into its registry key.
///
/// Backslashes become `/`, repeated separators collapse, and the result always
/// ends with exactly one `/`. Returns `None` for an empty path.
pub fn directory_key(dir: impl AsRef<Path>) -> Option<String> {
    let raw = dir.as_ref().to_string_lossy();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(trimmed.len() + 1);
    for ch in trimmed.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    if !out.ends_with('/') {
        out.push('/');
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases() {
        assert_eq!(slug("JSON"), "json");
        assert_eq!(slug("Widgets"), "widgets");
    }

    #[test]
    fn slug_keeps_underscores() {
        assert_eq!(slug("post_type"), "post_type");
    }

    #[test]
    fn slug_collapses_whitespace_and_dashes() {
        assert_eq!(slug("  Post   Types "), "post-types");
        assert_eq!(slug("side--bar"), "side-bar");
        assert_eq!(slug("-lead"), "lead");
        assert_eq!(slug("trail-"), "trail");
    }

    #[test]
    fn slug_drops_punctuation() {
        assert_eq!(slug("y.m.l"), "yml");
        assert_eq!(slug("wid/gets!"), "widgets");
        assert_eq!(slug("!!!"), "");
    }

    #[test]
    fn directory_key_adds_trailing_separator() {
        assert_eq!(directory_key("a/b").unwrap(), "a/b/");
        assert_eq!(directory_key("a/b/").unwrap(), "a/b/");
    }

    #[test]
    fn directory_key_collapses_separators() {
        assert_eq!(directory_key("/srv//site///").unwrap(), "/srv/site/");
    }

    #[test]
    fn directory_key_accepts_backslashes() {
        assert_eq!(directory_key("a\\b").unwrap(), "a/b/");
        assert_eq!(directory_key("a\\\\b\\").unwrap(), "a/b/");
    }

    #[test]
    fn directory_key_rejects_empty() {
        assert_eq!(directory_key(""), None);
        assert_eq!(directory_key("   "), None);
    }
}
