use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::entry::{ScoreEntry, ranking};
use super::format::{encode_line, parse_line};

/// Ranked, file-backed list of scores
///
/// The list is kept sorted by [`ranking`] and capped at
/// [`Leaderboard::CAPACITY`] after every change. The file is assumed to have
/// a single writer: two running games sharing it will overwrite each other.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    /// Most entries ever kept; lower-ranked ones are dropped for good
    pub const CAPACITY: usize = 200;

    /// Create an empty leaderboard backed by `path` without touching the file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Create a leaderboard and load whatever `path` already holds
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut leaderboard = Self::new(path);
        leaderboard.load();
        leaderboard
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory entries with the file contents
    ///
    /// A missing or unreadable file yields an empty board. Blank and
    /// malformed lines are skipped.
    pub fn load(&mut self) {
        self.entries.clear();

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no leaderboard at {:?} yet", self.path);
                return;
            }
            Err(err) => {
                warn!("could not read leaderboard {:?}: {}", self.path, err);
                return;
            }
        };

        let contents = String::from_utf8_lossy(&bytes);
        let mut skipped = 0;
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(entry) => self.entries.push(entry),
                None => {
                    skipped += 1;
                    debug!("skipping malformed leaderboard line {}", idx + 1);
                }
            }
        }

        self.sort_and_trim();
        info!(
            "loaded {} leaderboard entries from {:?} ({} skipped)",
            self.entries.len(),
            self.path,
            skipped
        );
    }

    /// Overwrite the file with the current entries, one per line
    pub fn save(&self) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create leaderboard file {:?}", self.path))?;
        let mut writer = BufWriter::new(file);

        for entry in &self.entries {
            writeln!(writer, "{}", encode_line(entry))
                .with_context(|| format!("Failed to write leaderboard file {:?}", self.path))?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to flush leaderboard file {:?}", self.path))?;
        Ok(())
    }

    /// Record a score under a sanitised name and persist the board
    ///
    /// Returns the 1-based rank of the new entry, or `None` if it fell off
    /// the end of the capped list. A failed save is logged and otherwise
    /// ignored; the entry stays in memory for the rest of the session.
    pub fn add(&mut self, name: &str, score: i64) -> Option<usize> {
        let entry = ScoreEntry::sanitized(name, score);
        self.entries.push(entry.clone());
        self.sort_and_trim();

        if let Err(err) = self.save() {
            warn!("leaderboard not saved: {:#}", err);
        }

        let rank = self.entries.iter().position(|e| *e == entry).map(|i| i + 1);
        info!("added {:?} with {} points, rank {:?}", entry.name, entry.score, rank);
        rank
    }

    /// The best `n` entries, fewer if the board is shorter
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Every kept entry in rank order
    pub fn all(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort_and_trim(&mut self) {
        self.entries.sort_by(ranking);
        self.entries.truncate(Self::CAPACITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn board_in(dir: &TempDir) -> Leaderboard {
        Leaderboard::open(dir.path().join("leaderboard.txt"))
    }

    fn assert_ranked(entries: &[ScoreEntry]) {
        for pair in entries.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].name <= pair[1].name);
            }
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let board = board_in(&dir);
        assert!(board.is_empty());
        assert!(board.top(3).is_empty());
    }

    #[test]
    fn test_add_sanitizes_name() {
        let dir = TempDir::new().unwrap();
        let mut board = board_in(&dir);

        let rank = board.add("Al!ice_99", 42);

        assert_eq!(rank, Some(1));
        assert_eq!(board.all(), &[ScoreEntry::new("Alice_99", 42)]);
    }

    #[test]
    fn test_add_defaults_empty_name() {
        let dir = TempDir::new().unwrap();
        let mut board = board_in(&dir);
        board.add("   ", 5);
        assert_eq!(board.all()[0].name, "Player");
    }

    #[test]
    fn test_ordering_with_ties() {
        let dir = TempDir::new().unwrap();
        let mut board = board_in(&dir);

        board.add("mike", 10);
        board.add("bob", 30);
        board.add("zoe", 30);
        board.add("anna", 30);
        board.add("carl", 5);

        let names: Vec<&str> = board.all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["anna", "bob", "zoe", "mike", "carl"]);
        assert_ranked(board.all());
    }

    #[test]
    fn test_top_limits_results() {
        let dir = TempDir::new().unwrap();
        let mut board = board_in(&dir);
        board.add("a", 1);
        board.add("b", 2);

        assert_eq!(board.top(1), &[ScoreEntry::new("b", 2)]);
        assert_eq!(board.top(3).len(), 2);
        assert_eq!(board.top(0).len(), 0);
    }

    #[test]
    fn test_cap_drops_lowest_ranked() {
        let dir = TempDir::new().unwrap();
        let mut board = board_in(&dir);

        for i in 0..200 {
            board.add(&format!("p{i}"), 100 + i);
        }
        assert_eq!(board.len(), 200);

        // ties with the current last place but sorts after it by name
        let last = board.all()[199].clone();
        assert_eq!(last, ScoreEntry::new("p0", 100));
        let rank = board.add("zz", 100);

        assert_eq!(rank, None);
        assert_eq!(board.len(), 200);
        assert!(!board.all().iter().any(|e| e.name == "zz"));
        assert_eq!(board.all()[199], last);
    }

    #[test]
    fn test_cap_keeps_better_newcomer() {
        let dir = TempDir::new().unwrap();
        let mut board = board_in(&dir);
        for i in 0..200 {
            board.add(&format!("p{i}"), 10);
        }

        let rank = board.add("best", 11);

        assert_eq!(rank, Some(1));
        assert_eq!(board.len(), 200);
        // p99 sorts last among the tied names and is the one dropped
        assert!(!board.all().iter().any(|e| e.name == "p99"));
        assert_ranked(board.all());
    }

    #[test]
    fn test_persisted_after_add() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard.txt");
        let mut board = Leaderboard::open(&path);
        board.add("alice", 7);
        board.add("bob", 9);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "\"bob\" 9\n\"alice\" 7\n");

        let reopened = Leaderboard::open(&path);
        assert_eq!(reopened.all(), board.all());
    }

    #[test]
    fn test_save_load_round_trip_with_spaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard.txt");
        fs::write(&path, "\"bob smith\" 12\n\"o'neil-x\" 3\n\"a \\\"b\\\"\" 3\n").unwrap();

        let board = Leaderboard::open(&path);
        board.save().unwrap();
        let reloaded = Leaderboard::open(&path);

        assert_eq!(
            reloaded.all(),
            &[
                ScoreEntry::new("bob smith", 12),
                ScoreEntry::new("a \"b\"", 3),
                ScoreEntry::new("o'neil-x", 3),
            ]
        );
        assert_eq!(reloaded.all(), board.all());
    }

    #[test]
    fn test_load_skips_blank_and_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard.txt");
        fs::write(
            &path,
            "\"good\" 5\n\n   \ngarbage\nbare 8\n\"broken 1 2\nname NaN\r\n\"ok\" 6\r\n",
        )
        .unwrap();

        let board = Leaderboard::open(&path);

        assert_eq!(
            board.all(),
            &[
                ScoreEntry::new("bare", 8),
                ScoreEntry::new("ok", 6),
                ScoreEntry::new("good", 5),
                ScoreEntry::new("\"broken", 1),
            ]
        );
    }

    #[test]
    fn test_load_trims_oversized_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard.txt");
        let lines: String = (0..250).map(|i| format!("\"p{i}\" {i}\n")).collect();
        fs::write(&path, lines).unwrap();

        let board = Leaderboard::open(&path);

        assert_eq!(board.len(), Leaderboard::CAPACITY);
        assert_eq!(board.all()[0], ScoreEntry::new("p249", 249));
        assert_eq!(board.all()[199], ScoreEntry::new("p50", 50));
    }

    #[test]
    fn test_load_replaces_memory_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leaderboard.txt");
        let mut board = Leaderboard::open(&path);
        board.add("first", 1);

        fs::write(&path, "\"other\" 2\n").unwrap();
        board.load();

        assert_eq!(board.all(), &[ScoreEntry::new("other", 2)]);
    }

    #[test]
    fn test_unwritable_path_keeps_session_going() {
        let dir = TempDir::new().unwrap();
        // a directory cannot be opened as a file
        let mut board = Leaderboard::new(dir.path());

        assert!(board.save().is_err());
        assert_eq!(board.add("alice", 3), Some(1));
        assert_eq!(board.all(), &[ScoreEntry::new("alice", 3)]);
    }
}
