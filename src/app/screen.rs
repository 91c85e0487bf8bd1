use crate::game::Difficulty;

/// Entries of the main menu, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    StartGame,
    ChangeDifficulty,
    Leaderboards,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::StartGame,
        MenuItem::ChangeDifficulty,
        MenuItem::Leaderboards,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::StartGame => "Start Game",
            MenuItem::ChangeDifficulty => "Change Difficulty",
            MenuItem::Leaderboards => "Leaderboards",
            MenuItem::Quit => "Quit",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MenuItem::StartGame => 0,
            MenuItem::ChangeDifficulty => 1,
            MenuItem::Leaderboards => 2,
            MenuItem::Quit => 3,
        }
    }

    /// Item below, wrapping to the top
    pub fn next(&self) -> MenuItem {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Item above, wrapping to the bottom
    pub fn previous(&self) -> MenuItem {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which screen the session is on, with that screen's local state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu { selected: MenuItem },
    Difficulty { selected: Difficulty },
    Leaderboard,
    Playing,
    NameEntry { input: String },
    GameOver { name: String, rank: Option<usize> },
}

impl Screen {
    pub fn menu() -> Self {
        Screen::Menu {
            selected: MenuItem::StartGame,
        }
    }
}
