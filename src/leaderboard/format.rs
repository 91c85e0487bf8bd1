//! Line format of the leaderboard file
//!
//! Each line is `<name> <score>`. Names are written double-quoted with `\`
//! and `"` backslash-escaped, so names with spaces survive a round trip.
//! Reading also accepts a bare first token as the name. Anything after the
//! score token is ignored.

use super::entry::ScoreEntry;

/// Render an entry as one line, without the trailing newline
pub fn encode_line(entry: &ScoreEntry) -> String {
    let mut line = String::with_capacity(entry.name.len() + 16);
    line.push('"');
    for c in entry.name.chars() {
        if c == '"' || c == '\\' {
            line.push('\\');
        }
        line.push(c);
    }
    line.push('"');
    line.push(' ');
    line.push_str(&entry.score.to_string());
    line
}

/// Parse one line, trying the quoted form first and a bare name second
pub fn parse_line(line: &str) -> Option<ScoreEntry> {
    parse_quoted(line).or_else(|| parse_bare(line))
}

fn parse_quoted(line: &str) -> Option<ScoreEntry> {
    let rest = line.trim_start().strip_prefix('"')?;

    let mut name = String::new();
    let mut chars = rest.char_indices();
    let mut close = None;
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => name.push(chars.next()?.1),
            '"' => {
                close = Some(idx);
                break;
            }
            _ => name.push(c),
        }
    }

    let after = &rest[close? + 1..];
    let score = parse_score(after.split_whitespace().next()?)?;
    Some(ScoreEntry::new(name, score))
}

fn parse_bare(line: &str) -> Option<ScoreEntry> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    let score = parse_score(tokens.next()?)?;
    Some(ScoreEntry::new(name, score))
}

fn parse_score(token: &str) -> Option<i64> {
    token.parse().ok()
}
