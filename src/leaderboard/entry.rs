use std::cmp::Ordering;

/// Longest name kept after sanitising
pub const MAX_NAME_LEN: usize = 16;

/// Name used when nothing usable is left after sanitising
pub const DEFAULT_NAME: &str = "Player";

/// One leaderboard line: who and how much
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

impl ScoreEntry {
    /// Create an entry with the name taken as-is
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Create an entry with the name run through [`sanitize_name`]
    pub fn sanitized(name: &str, score: i64) -> Self {
        Self::new(sanitize_name(name), score)
    }
}

/// Leaderboard order: higher score first, then name ascending
pub fn ranking(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name))
}

/// Keep ASCII letters, digits, `_` and `-`, at most [`MAX_NAME_LEN`] of them,
/// falling back to [`DEFAULT_NAME`] when nothing survives
pub fn sanitize_name(raw: &str) -> String {
    let clean: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(MAX_NAME_LEN)
        .collect();

    if clean.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize_name("Al!ice_99"), "Alice_99");
        assert_eq!(sanitize_name("  bob smith "), "bobsmith");
        assert_eq!(sanitize_name("x-y_z"), "x-y_z");
    }

    #[test]
    fn test_sanitize_truncates() {
        assert_eq!(sanitize_name("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmnop");
        // dropped characters do not count towards the limit
        assert_eq!(sanitize_name("a.b.c.d.e.f.g.h.i.j.k.l.m.n.o.p.q"), "abcdefghijklmnop");
    }

    #[test]
    fn test_sanitize_defaults_when_empty() {
        assert_eq!(sanitize_name(""), "Player");
        assert_eq!(sanitize_name("!!! ???"), "Player");
        assert_eq!(sanitize_name("héllo wörld"), "hllowrld");
        assert_eq!(sanitize_name("日本"), "Player");
    }

    #[test]
    fn test_ranking_order() {
        let high = ScoreEntry::new("zed", 50);
        let low = ScoreEntry::new("amy", 10);
        let tie_a = ScoreEntry::new("amy", 50);

        assert_eq!(ranking(&high, &low), Ordering::Less);
        assert_eq!(ranking(&low, &high), Ordering::Greater);
        assert_eq!(ranking(&tie_a, &high), Ordering::Less);
        assert_eq!(ranking(&high, &high), Ordering::Equal);
    }
}
