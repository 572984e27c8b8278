use uuid::Uuid;

use super::MemoBoard;
use crate::core::error::{BoardError, BoardResult};
use crate::core::text::{derive_title, plain_text};
use crate::editor::{EditTarget, FormatOp, RichTextEditable};
use crate::store::KeyValueStore;

impl<S: KeyValueStore> MemoBoard<S> {
    /// Load an existing memo into the draft for editing. The host should
    /// follow with `draft().render_into(surface)`.
    pub fn begin_edit(&mut self, group: &str, id: Uuid) -> BoardResult<()> {
        self.ensure_unlocked(group)?;
        let html = self
            .group(group)?
            .memos
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.html.clone())
            .ok_or(BoardError::UnknownMemo(id))?;
        self.draft.load(
            EditTarget {
                memo_id: id,
                origin_group: group.to_string(),
            },
            &html,
        );
        log::debug!("Editing memo {} from {}", id, group);
        Ok(())
    }

    pub fn cancel_draft(&mut self) {
        self.draft.clear();
    }

    /// Pointer-up, key-up or focus on the draft surface.
    pub fn capture_selection(&mut self, surface: &dyn RichTextEditable) -> bool {
        self.draft.capture_selection(surface)
    }

    /// The user typed into the draft surface.
    pub fn on_draft_input(&mut self, surface: &dyn RichTextEditable) {
        self.draft.on_input(surface);
    }

    /// Run a toolbar action against the bookmarked selection.
    pub fn format(&mut self, surface: &mut dyn RichTextEditable, op: FormatOp) -> BoardResult<()> {
        let owner = self
            .draft
            .target()
            .map(|t| t.origin_group.clone())
            .unwrap_or_else(|| self.active.clone());
        self.ensure_unlocked(&owner)?;
        self.draft.apply(surface, &op)
    }

    /// Commit the draft: overwrite the memo being edited, or create a new memo
    /// in the active group. The draft is cleared afterwards.
    pub fn upsert_from_draft(&mut self) -> BoardResult<Uuid> {
        let html = self.draft.html().trim().to_string();
        let text = plain_text(&html);
        if text.is_empty() {
            return Err(BoardError::EmptyBody);
        }

        let id = match self.draft.target().cloned() {
            Some(target) => {
                self.ensure_unlocked(&target.origin_group)?;
                let max = self.title_max_chars;
                let memo = self
                    .group_mut(&target.origin_group)?
                    .memos
                    .iter_mut()
                    .find(|m| m.id == target.memo_id)
                    .ok_or(BoardError::UnknownMemo(target.memo_id))?;
                memo.set_body(&html);
                if memo.title.trim().is_empty() {
                    memo.title = derive_title(&memo.text, max);
                }
                log::debug!("Saved draft into memo {}", target.memo_id);
                self.persist();
                target.memo_id
            }
            None => {
                let active = self.active.clone();
                self.create_memo(&active, None, &html)?.id
            }
        };

        self.draft.clear();
        Ok(id)
    }
}
