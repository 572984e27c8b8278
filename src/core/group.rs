use serde::{Deserialize, Serialize};

use super::color::hashed_group_color;
use super::memo::Memo;

/// One tab on the board and the memos it owns, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub memos: Vec<Memo>,
    pub color: Option<String>,
    pub locked: bool,
}

impl Group {
    pub fn with_memos(memos: Vec<Memo>) -> Self {
        Self {
            memos,
            ..Self::default()
        }
    }

    /// Override color if set, otherwise the hashed color for `name`.
    pub fn display_color(&self, name: &str) -> String {
        self.color
            .clone()
            .unwrap_or_else(|| hashed_group_color(name).to_string())
    }

    pub fn position(&self, id: uuid::Uuid) -> Option<usize> {
        self.memos.iter().position(|m| m.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Earlier,
    Later,
}

/// What a tab bar needs to render one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub name: String,
    pub color: String,
    pub locked: bool,
    pub memo_count: usize,
    pub active: bool,
}

/// Next free `"<name> - copy"` style name.
pub fn copy_name<F>(name: &str, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base = format!("{} - copy", name);
    if !exists(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{} {}", base, n);
        if !exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
