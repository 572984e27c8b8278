use uuid::Uuid;

use super::MemoBoard;
use crate::core::clipboard::{ClipEntry, ClipMode};
use crate::core::error::{BoardError, BoardResult};
use crate::core::memo::Memo;
use crate::store::KeyValueStore;

impl<S: KeyValueStore> MemoBoard<S> {
    /// Put a copy of the memo on the clipboard. The memo itself is untouched.
    pub fn copy_memo(&mut self, group: &str, id: Uuid) -> BoardResult<()> {
        let snapshot = self
            .group(group)?
            .memos
            .iter()
            .find(|m| m.id == id)
            .map(Memo::snapshot)
            .ok_or(BoardError::UnknownMemo(id))?;
        self.clipboard = Some(ClipEntry {
            mode: ClipMode::Copy,
            source_group: group.to_string(),
            snapshot,
        });
        Ok(())
    }

    /// Remove the memo and hold it on the clipboard until the next paste.
    pub fn cut_memo(&mut self, group: &str, id: Uuid) -> BoardResult<()> {
        let memo = self.delete_memo(group, id)?;
        self.clipboard = Some(ClipEntry {
            mode: ClipMode::Cut,
            source_group: group.to_string(),
            snapshot: memo.snapshot(),
        });
        log::debug!("Cut memo {} from {}", id, group);
        Ok(())
    }

    /// Insert the clipboard memo at the front of the active group under a new id.
    /// A cut entry is consumed; a copy entry can be pasted again.
    pub fn paste(&mut self) -> BoardResult<Memo> {
        let entry = self.clipboard.clone().ok_or(BoardError::ClipboardEmpty)?;
        let active = self.active.clone();
        self.ensure_unlocked(&active)?;

        let fallback = self.fresh_color();
        let memo = entry.snapshot.into_memo(&fallback);
        self.group_mut(&active)?.memos.insert(0, memo.clone());
        if entry.mode == ClipMode::Cut {
            self.clipboard = None;
        }
        log::debug!("Pasted memo {} into {}", memo.id, active);
        self.persist();
        Ok(memo)
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard = None;
    }
}
