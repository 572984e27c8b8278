use indexmap::IndexMap;

use super::MemoBoard;
use crate::core::error::{BoardError, BoardResult};
use crate::core::group::{Direction, Group, GroupSummary, copy_name};
use crate::core::memo::Memo;
use crate::store::KeyValueStore;

impl<S: KeyValueStore> MemoBoard<S> {
    pub fn list_groups(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    pub fn group_summaries(&self) -> Vec<GroupSummary> {
        self.groups
            .iter()
            .map(|(name, g)| GroupSummary {
                name: name.clone(),
                color: g.display_color(name),
                locked: g.locked,
                memo_count: g.memos.len(),
                active: *name == self.active,
            })
            .collect()
    }

    /// Add a group and make it active. An existing name is just selected.
    pub fn create_group(&mut self, name: &str) -> BoardResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoardError::BlankName);
        }
        if !self.groups.contains_key(name) {
            self.groups.insert(name.to_string(), Group::default());
            log::info!("Created group {}", name);
        }
        self.select_group(name)
    }

    /// Rename `old` to `new`. When `new` already exists the two groups merge,
    /// `old`'s memos first.
    pub fn rename_group(&mut self, old: &str, new: &str) -> BoardResult<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(BoardError::BlankName);
        }
        let source = self.group(old)?;
        if new == old {
            return Ok(());
        }

        if let Some(target) = self.groups.get(new) {
            if source.locked {
                return Err(BoardError::GroupLocked(old.to_string()));
            }
            if target.locked {
                return Err(BoardError::GroupLocked(new.to_string()));
            }
            let source = self.groups.shift_remove(old).unwrap_or_default();
            if let Some(target) = self.groups.get_mut(new) {
                let mut merged = source.memos;
                merged.append(&mut target.memos);
                target.memos = merged;
                if target.color.is_none() {
                    target.color = source.color;
                }
            }
            log::info!("Merged group {} into {}", old, new);
        } else {
            let groups = std::mem::take(&mut self.groups);
            self.groups = groups
                .into_iter()
                .map(|(name, g)| if name == old { (new.to_string(), g) } else { (name, g) })
                .collect::<IndexMap<_, _>>();
            log::info!("Renamed group {} to {}", old, new);
        }

        if self.active == old {
            self.active = new.to_string();
        }
        self.draft.retarget_group(old, new);
        if let Some(entry) = self.clipboard.as_mut() {
            if entry.source_group == old {
                entry.source_group = new.to_string();
            }
        }
        self.persist();
        Ok(())
    }

    /// Delete a group, moving its memos to the front of the first remaining
    /// group. `confirm` is asked with the group name and memo count when the
    /// group is not empty.
    pub fn delete_group<F>(&mut self, name: &str, confirm: F) -> BoardResult<()>
    where
        F: FnOnce(&str, usize) -> bool,
    {
        let group = self.group(name)?;
        if self.groups.len() == 1 {
            log::warn!("Refused to delete the last group {}", name);
            return Err(BoardError::LastGroup);
        }
        if group.locked {
            return Err(BoardError::GroupLocked(name.to_string()));
        }
        let count = group.memos.len();
        let heir = self
            .groups
            .keys()
            .find(|k| k.as_str() != name)
            .cloned()
            .ok_or(BoardError::LastGroup)?;
        if count > 0 {
            self.ensure_unlocked(&heir)?;
            if !confirm(name, count) {
                return Err(BoardError::Cancelled);
            }
        }

        let removed = self.groups.shift_remove(name).unwrap_or_default();
        let heir_group = self.group_mut(&heir)?;
        let mut memos = removed.memos;
        memos.append(&mut heir_group.memos);
        heir_group.memos = memos;

        if self.active == name {
            self.active = heir.clone();
            self.selected_memo = None;
        }
        if self
            .draft
            .target()
            .is_some_and(|target| target.origin_group == name)
        {
            self.draft.clear();
        }
        log::info!("Deleted group {}, {} memos moved to {}", name, count, heir);
        self.persist();
        Ok(())
    }

    /// Copy a group and all its memos under a fresh `"<name> - copy"` name,
    /// placed right after the original. Returns the new name.
    pub fn duplicate_group(&mut self, name: &str) -> BoardResult<String> {
        let source = self.group(name)?;
        let copy = Group {
            memos: source.memos.iter().map(Memo::duplicate).collect(),
            color: source.color.clone(),
            locked: source.locked,
        };
        let new_name = copy_name(name, |candidate| self.groups.contains_key(candidate));

        let source_index = self.groups.get_index_of(name).unwrap_or(0);
        let (index, _) = self.groups.insert_full(new_name.clone(), copy);
        self.groups.move_index(index, source_index + 1);

        log::info!("Duplicated group {} as {}", name, new_name);
        self.select_group(&new_name)?;
        Ok(new_name)
    }

    /// Shift a group one place. Moving past either end does nothing.
    pub fn move_group(&mut self, name: &str, direction: Direction) -> BoardResult<()> {
        let index = self
            .groups
            .get_index_of(name)
            .ok_or_else(|| BoardError::UnknownGroup(name.to_string()))?;
        let other = match direction {
            Direction::Earlier if index > 0 => index - 1,
            Direction::Later if index + 1 < self.groups.len() => index + 1,
            _ => return Ok(()),
        };
        self.groups.swap_indices(index, other);
        self.persist();
        Ok(())
    }

    pub fn set_group_color(&mut self, name: &str, color: &str) -> BoardResult<()> {
        let color = color.trim();
        if color.is_empty() {
            return self.clear_group_color(name);
        }
        self.group_mut(name)?.color = Some(color.to_string());
        self.persist();
        Ok(())
    }

    pub fn clear_group_color(&mut self, name: &str) -> BoardResult<()> {
        self.group_mut(name)?.color = None;
        self.persist();
        Ok(())
    }

    /// Override color, or the color hashed from the name.
    pub fn group_color(&self, name: &str) -> BoardResult<String> {
        Ok(self.group(name)?.display_color(name))
    }

    /// Flip the read-only flag. Returns the new state.
    pub fn toggle_lock(&mut self, name: &str) -> BoardResult<bool> {
        let group = self.group_mut(name)?;
        group.locked = !group.locked;
        let locked = group.locked;
        log::info!("Group {} {}", name, if locked { "locked" } else { "unlocked" });
        self.persist();
        Ok(locked)
    }

    pub fn is_locked(&self, name: &str) -> bool {
        self.groups.get(name).is_some_and(|g| g.locked)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::core::color::hashed_group_color;
    use crate::core::error::BoardError;
    use crate::core::group::Direction;
    use crate::editor::DraftState;

    #[test]
    fn create_appends_and_selects() {
        let mut board = board();
        board.create_group("업무").unwrap();
        assert_eq!(board.list_groups(), vec!["기본", "업무"]);
        assert_eq!(board.active_group(), "업무");
    }

    #[test]
    fn create_is_idempotent_and_trims() {
        let mut board = two_groups();
        board.create_group("  업무 ").unwrap();
        assert_eq!(board.list_groups(), vec!["기본", "업무"]);
        assert_eq!(board.active_group(), "업무");
        assert!(matches!(board.create_group("   "), Err(BoardError::BlankName)));
    }

    #[test]
    fn create_then_delete_restores_list() {
        let mut board = two_groups();
        let before = board.list_groups();
        board.create_group("임시").unwrap();
        board.delete_group("임시", |_, _| panic!("empty group needs no confirmation")).unwrap();
        assert_eq!(board.list_groups(), before);
    }

    #[test]
    fn rename_keeps_position_and_follows_active() {
        let mut board = two_groups();
        board.create_group("개인").unwrap();
        board.select_group("업무").unwrap();
        board.rename_group("업무", "회사").unwrap();
        assert_eq!(board.list_groups(), vec!["기본", "회사", "개인"]);
        assert_eq!(board.active_group(), "회사");
    }

    #[test]
    fn rename_to_blank_or_same_is_noop() {
        let mut board = two_groups();
        assert!(board.rename_group("업무", " ").is_err());
        board.rename_group("업무", "업무").unwrap();
        assert_eq!(board.list_groups(), vec!["기본", "업무"]);
    }

    #[test]
    fn rename_onto_existing_merges_old_first() {
        let mut board = two_groups();
        let a1 = board.create_memo("기본", None, "<p>a1</p>").unwrap();
        let a2 = board.create_memo("기본", None, "<p>a2</p>").unwrap();
        let b1 = board.create_memo("업무", None, "<p>b1</p>").unwrap();
        board.set_group_color("기본", "#ABCDEF").unwrap();

        board.rename_group("기본", "업무").unwrap();

        assert_eq!(board.list_groups(), vec!["업무"]);
        let ids: Vec<_> = board.list_memos("업무").iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![a2.id, a1.id, b1.id]);
        assert_eq!(board.group_color("업무").unwrap(), "#ABCDEF");
        assert_eq!(board.active_group(), "업무");
    }

    #[test]
    fn merge_with_locked_group_is_refused() {
        let mut board = two_groups();
        board.create_memo("기본", None, "<p>a</p>").unwrap();
        board.toggle_lock("업무").unwrap();
        assert!(matches!(
            board.rename_group("기본", "업무"),
            Err(BoardError::GroupLocked(g)) if g == "업무"
        ));
        assert_eq!(board.list_memos("기본").len(), 1);
    }

    #[test]
    fn last_group_cannot_be_deleted() {
        let mut board = board();
        assert!(matches!(
            board.delete_group("기본", |_, _| true),
            Err(BoardError::LastGroup)
        ));
        assert_eq!(board.list_groups(), vec!["기본"]);
    }

    #[test]
    fn delete_reassigns_memos_to_first_remaining() {
        let mut board = two_groups();
        board.create_group("개인").unwrap();
        let kept = board.create_memo("기본", None, "<p>kept</p>").unwrap();
        let moved = board.create_memo("개인", None, "<p>moved</p>").unwrap();
        let total = total_memos(&board);

        let mut asked = None;
        board
            .delete_group("개인", |name, count| {
                asked = Some((name.to_string(), count));
                true
            })
            .unwrap();

        assert_eq!(asked, Some(("개인".to_string(), 1)));
        assert_eq!(total_memos(&board), total);
        let ids: Vec<_> = board.list_memos("기본").iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![moved.id, kept.id]);
        assert_eq!(board.active_group(), "기본");
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let mut board = two_groups();
        board.create_memo("업무", None, "<p>x</p>").unwrap();
        assert!(matches!(
            board.delete_group("업무", |_, _| false),
            Err(BoardError::Cancelled)
        ));
        assert_eq!(board.list_groups(), vec!["기본", "업무"]);
        assert_eq!(board.list_memos("업무").len(), 1);
    }

    #[test]
    fn delete_cancels_draft_editing_inside() {
        let mut board = two_groups();
        let memo = board.create_memo("업무", None, "<p>x</p>").unwrap();
        board.select_group("업무").unwrap();
        board.begin_edit("업무", memo.id).unwrap();
        board.delete_group("업무", |_, _| true).unwrap();
        assert_eq!(board.draft().state(), DraftState::Idle);
        assert_eq!(board.list_memos("기본")[0].id, memo.id);
    }

    #[test]
    fn duplicate_copies_memos_with_fresh_ids() {
        let mut board = two_groups();
        let memo = board.create_memo("기본", Some("A"), "<p>body</p>").unwrap();
        board.toggle_lock("기본").unwrap();

        let name = board.duplicate_group("기본").unwrap();
        assert_eq!(name, "기본 - copy");
        assert_eq!(board.list_groups(), vec!["기본", "기본 - copy", "업무"]);
        assert_eq!(board.active_group(), "기본 - copy");
        assert!(board.is_locked("기본 - copy"));

        let copy = &board.list_memos("기본 - copy")[0];
        assert_ne!(copy.id, memo.id);
        assert_eq!(copy.title, "A");
        assert_eq!(copy.html, memo.html);

        assert_eq!(board.duplicate_group("기본").unwrap(), "기본 - copy 2");
    }

    #[test]
    fn move_group_stops_at_edges() {
        let mut board = two_groups();
        board.create_group("개인").unwrap();
        board.move_group("개인", Direction::Earlier).unwrap();
        assert_eq!(board.list_groups(), vec!["기본", "개인", "업무"]);
        board.move_group("기본", Direction::Earlier).unwrap();
        assert_eq!(board.list_groups(), vec!["기본", "개인", "업무"]);
        board.move_group("업무", Direction::Later).unwrap();
        assert_eq!(board.list_groups(), vec!["기본", "개인", "업무"]);
        board.move_group("기본", Direction::Later).unwrap();
        assert_eq!(board.list_groups(), vec!["개인", "기본", "업무"]);
    }

    #[test]
    fn colors_and_locks() {
        let mut board = two_groups();
        assert_eq!(board.group_color("업무").unwrap(), hashed_group_color("업무"));
        board.set_group_color("업무", "#FF0000").unwrap();
        assert_eq!(board.group_color("업무").unwrap(), "#FF0000");
        board.clear_group_color("업무").unwrap();
        assert_eq!(board.group_color("업무").unwrap(), hashed_group_color("업무"));

        assert!(board.toggle_lock("업무").unwrap());
        assert!(!board.toggle_lock("업무").unwrap());
    }

    #[test]
    fn summaries_describe_tabs() {
        let mut board = two_groups();
        board.create_memo("업무", None, "<p>x</p>").unwrap();
        let summaries = board.group_summaries();
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].active);
        assert_eq!(summaries[1].name, "업무");
        assert_eq!(summaries[1].memo_count, 1);
    }
}
