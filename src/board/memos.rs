use uuid::Uuid;

use super::MemoBoard;
use crate::core::color::MEMO_COLORS;
use crate::core::error::{BoardError, BoardResult};
use crate::core::memo::Memo;
use crate::core::text::{derive_title, plain_text};
use crate::store::KeyValueStore;

impl<S: KeyValueStore> MemoBoard<S> {
    /// Memos of `group`, newest first. Unknown groups have none.
    pub fn list_memos(&self, group: &str) -> &[Memo] {
        self.groups
            .get(group)
            .map(|g| g.memos.as_slice())
            .unwrap_or(&[])
    }

    /// Locate a memo anywhere on the board.
    pub fn find_memo(&self, id: Uuid) -> Option<(&str, &Memo)> {
        self.groups.iter().find_map(|(name, g)| {
            g.memos
                .iter()
                .find(|m| m.id == id)
                .map(|m| (name.as_str(), m))
        })
    }

    /// Add a memo to the front of `group`. The title defaults to the first
    /// line of the body.
    pub fn create_memo(&mut self, group: &str, title: Option<&str>, html: &str) -> BoardResult<Memo> {
        self.ensure_unlocked(group)?;
        if plain_text(html).is_empty() {
            return Err(BoardError::EmptyBody);
        }
        let color = self.fresh_color();
        let memo = Memo::new(title, html, &color, self.title_max_chars);
        self.group_mut(group)?.memos.insert(0, memo.clone());
        log::debug!("Created memo {} in {}", memo.id, group);
        self.persist();
        Ok(memo)
    }

    fn memo_mut(&mut self, group: &str, id: Uuid) -> BoardResult<&mut Memo> {
        self.ensure_unlocked(group)?;
        self.group_mut(group)?
            .memos
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(BoardError::UnknownMemo(id))
    }

    /// Set the title. A blank title is derived from the body again.
    pub fn update_title(&mut self, group: &str, id: Uuid, title: &str) -> BoardResult<()> {
        let max = self.title_max_chars;
        let memo = self.memo_mut(group, id)?;
        let title = title.trim();
        memo.title = if title.is_empty() {
            derive_title(&memo.text, max)
        } else {
            title.to_string()
        };
        self.persist();
        Ok(())
    }

    /// Set the card color; only palette colors are accepted.
    pub fn update_color(&mut self, group: &str, id: Uuid, color: &str) -> BoardResult<()> {
        let color = MEMO_COLORS
            .iter()
            .find(|c| c.eq_ignore_ascii_case(color.trim()))
            .ok_or_else(|| BoardError::UnknownColor(color.to_string()))?;
        self.memo_mut(group, id)?.color = color.to_string();
        self.persist();
        Ok(())
    }

    /// Replace the rich body; the plain-text projection follows.
    pub fn update_body(&mut self, group: &str, id: Uuid, html: &str) -> BoardResult<()> {
        self.memo_mut(group, id)?.set_body(html);
        self.persist();
        Ok(())
    }

    pub fn delete_memo(&mut self, group: &str, id: Uuid) -> BoardResult<Memo> {
        self.ensure_unlocked(group)?;
        let g = self.group_mut(group)?;
        let index = g.position(id).ok_or(BoardError::UnknownMemo(id))?;
        let memo = g.memos.remove(index);
        self.forget(id);
        log::debug!("Deleted memo {} from {}", id, group);
        self.persist();
        Ok(memo)
    }

    /// Move a memo to the front of `to`, creating `to` if needed.
    /// Blank `to` or `to == from` does nothing.
    pub fn move_memo_to_group(&mut self, id: Uuid, from: &str, to: &str) -> BoardResult<()> {
        let to = to.trim();
        if to.is_empty() || to == from {
            return Ok(());
        }
        self.ensure_unlocked(from)?;
        if self.groups.contains_key(to) {
            self.ensure_unlocked(to)?;
        }
        let index = self
            .group(from)?
            .position(id)
            .ok_or(BoardError::UnknownMemo(id))?;

        let memo = self.group_mut(from)?.memos.remove(index);
        self.groups.entry(to.to_string()).or_default().memos.insert(0, memo);
        self.forget(id);
        log::debug!("Moved memo {} from {} to {}", id, from, to);
        self.persist();
        Ok(())
    }

    /// Drop draft and selection state pointing at a memo that left its group.
    fn forget(&mut self, id: Uuid) {
        if self.draft.is_editing(id) {
            self.draft.clear();
        }
        if self.selected_memo == Some(id) {
            self.selected_memo = None;
        }
    }
}
