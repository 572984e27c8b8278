//! The memo board controller.
//!
//! `MemoBoard` owns every piece of mutable board state: the ordered group
//! registry with each group's memos, the active group, the selected memo,
//! the shadow clipboard and the draft editor. Hosts hold it by `&mut` and
//! call one method per user action. A method either validates and applies
//! its whole change, then writes the board through the store, or returns a
//! `BoardError` without touching anything.

mod clipboard;
mod drafting;
mod groups;
mod memos;

use indexmap::IndexMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

use crate::config::BoardConfig;
use crate::core::clipboard::ClipEntry;
use crate::core::color::random_memo_color;
use crate::core::error::{BoardError, BoardResult};
use crate::core::group::Group;
use crate::core::memo::Memo;
use crate::core::text::{derive_title, plain_text};
use crate::editor::DraftEditor;
use crate::store::{
    KEY_ACTIVE_GROUP, KEY_GROUP_COLORS, KEY_GROUP_LOCKS, KEY_GROUP_ORDER, KEY_MEMOS_BY_GROUP,
    KEY_UNREADABLE_MEMOS, KeyValueStore, StoreError, put, try_get,
};

pub struct MemoBoard<S: KeyValueStore> {
    store: S,
    title_max_chars: usize,
    groups: IndexMap<String, Group>,
    active: String,
    selected_memo: Option<Uuid>,
    clipboard: Option<ClipEntry>,
    draft: DraftEditor,
    rng: StdRng,
    /// Keys whose stored value did not decode.
    unreadable: HashSet<&'static str>,
    unreadable_memos: Vec<UnreadableMemo>,
}

/// A stored memo that failed to decode, held under its group name until a
/// later version can read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnreadableMemo {
    group: String,
    value: Value,
}

/// Decode `key`, remembering it in `unreadable` when its stored value is bad
/// so that saving never writes over it.
fn read_key<S, T>(
    store: &S,
    key: &'static str,
    unreadable: &mut HashSet<&'static str>,
) -> Option<T>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match try_get(store, key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Leaving unreadable {} untouched: {}", key, e);
            unreadable.insert(key);
            None
        }
    }
}

fn put_readable<S, T>(
    store: &mut S,
    unreadable: &HashSet<&'static str>,
    key: &'static str,
    value: &T,
) -> Result<(), StoreError>
where
    S: KeyValueStore,
    T: Serialize + ?Sized,
{
    if unreadable.contains(key) {
        log::debug!("Skipping write of unreadable {}", key);
        return Ok(());
    }
    put(store, key, value)
}

impl<S: KeyValueStore> MemoBoard<S> {
    /// Load the board from `store`. Missing keys fall back to a board with the
    /// configured default group. Memos that do not decode are held aside and
    /// written back untouched; keys that do not decode at all are never
    /// overwritten.
    pub fn open(store: S, config: &BoardConfig) -> Self {
        let mut unreadable = HashSet::new();
        let mut rng = StdRng::from_entropy();

        let order: Vec<String> =
            read_key(&store, KEY_GROUP_ORDER, &mut unreadable).unwrap_or_default();
        let stored: IndexMap<String, Vec<Value>> =
            read_key(&store, KEY_MEMOS_BY_GROUP, &mut unreadable).unwrap_or_default();
        let held: Vec<UnreadableMemo> =
            read_key(&store, KEY_UNREADABLE_MEMOS, &mut unreadable).unwrap_or_default();
        let colors: HashMap<String, String> =
            read_key(&store, KEY_GROUP_COLORS, &mut unreadable).unwrap_or_default();
        let locks: HashMap<String, bool> =
            read_key(&store, KEY_GROUP_LOCKS, &mut unreadable).unwrap_or_default();
        let active: Option<String> = read_key(&store, KEY_ACTIVE_GROUP, &mut unreadable);

        let mut by_group: IndexMap<String, Vec<Memo>> = IndexMap::new();
        let mut entries = Vec::new();
        for (group, values) in stored {
            by_group.entry(group.clone()).or_default();
            entries.extend(values.into_iter().map(|v| (group.clone(), v)));
        }
        // Held entries are retried after the stored ones, so a memo that
        // decodes again lands at the back of its group.
        entries.extend(held.into_iter().map(|h| (h.group, h.value)));

        let mut unreadable_memos = Vec::new();
        for (group, value) in entries {
            match serde_json::from_value::<Memo>(value.clone()) {
                Ok(mut memo) => {
                    memo.text = plain_text(&memo.html);
                    if memo.title.trim().is_empty() {
                        memo.title = derive_title(&memo.text, config.title_max_chars);
                    }
                    if memo.color.trim().is_empty() {
                        memo.color = random_memo_color(&mut rng).to_string();
                    }
                    by_group.entry(group).or_default().push(memo);
                }
                Err(e) => {
                    log::warn!("Holding back unreadable memo in {}: {}", group, e);
                    unreadable_memos.push(UnreadableMemo { group, value });
                }
            }
        }

        // Stored order first, then any group that only appears in the memo map.
        let mut names: Vec<String> = Vec::new();
        for name in order.iter().chain(by_group.keys()) {
            if !name.trim().is_empty() && !names.contains(name) {
                names.push(name.clone());
            }
        }
        if names.is_empty() {
            names.push(config.default_group.clone());
        }

        let mut groups = IndexMap::with_capacity(names.len());
        for name in names {
            let group = Group {
                memos: by_group.shift_remove(&name).unwrap_or_default(),
                color: colors.get(&name).cloned(),
                locked: locks.get(&name).copied().unwrap_or(false),
            };
            groups.insert(name, group);
        }

        let active = active
            .filter(|name| groups.contains_key(name))
            .or_else(|| groups.keys().next().cloned())
            .unwrap_or_else(|| config.default_group.clone());

        log::info!(
            "Loaded memo board: {} groups, {} memos, {} unreadable",
            groups.len(),
            groups.values().map(|g| g.memos.len()).sum::<usize>(),
            unreadable_memos.len()
        );

        Self {
            store,
            title_max_chars: config.title_max_chars,
            groups,
            active,
            selected_memo: None,
            clipboard: None,
            draft: DraftEditor::default(),
            rng,
            unreadable,
            unreadable_memos,
        }
    }

    /// Reseed the color generator, for reproducible colors.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Write every board key through the store. Keys that could not be read
    /// at load time are left as they are.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let order: Vec<&String> = self.groups.keys().collect();
        let by_group: IndexMap<&String, &Vec<Memo>> =
            self.groups.iter().map(|(name, g)| (name, &g.memos)).collect();
        let colors: BTreeMap<&String, &String> = self
            .groups
            .iter()
            .filter_map(|(name, g)| g.color.as_ref().map(|c| (name, c)))
            .collect();
        let locks: BTreeMap<&String, bool> = self
            .groups
            .iter()
            .filter(|(_, g)| g.locked)
            .map(|(name, _)| (name, true))
            .collect();

        let store = &mut self.store;
        let skip = &self.unreadable;
        put_readable(store, skip, KEY_GROUP_ORDER, &order)?;
        put_readable(store, skip, KEY_MEMOS_BY_GROUP, &by_group)?;
        put_readable(store, skip, KEY_UNREADABLE_MEMOS, &self.unreadable_memos)?;
        put_readable(store, skip, KEY_GROUP_COLORS, &colors)?;
        put_readable(store, skip, KEY_GROUP_LOCKS, &locks)?;
        put_readable(store, skip, KEY_ACTIVE_GROUP, &self.active)?;
        Ok(())
    }

    /// Save after a mutation. The in-memory board stays authoritative if the write fails.
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            log::error!("Failed to save memo board: {}", e);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn active_group(&self) -> &str {
        &self.active
    }

    pub fn selected_memo(&self) -> Option<Uuid> {
        self.selected_memo
    }

    pub fn draft(&self) -> &DraftEditor {
        &self.draft
    }

    pub fn clipboard(&self) -> Option<&ClipEntry> {
        self.clipboard.as_ref()
    }

    /// Switch the visible group. An edit draft for a memo in another group is
    /// cancelled, since its memo is no longer on screen.
    pub fn select_group(&mut self, name: &str) -> BoardResult<()> {
        if !self.groups.contains_key(name) {
            return Err(BoardError::UnknownGroup(name.to_string()));
        }
        if self
            .draft
            .target()
            .is_some_and(|target| target.origin_group != name)
        {
            log::debug!("Cancelling edit draft on switch to {}", name);
            self.draft.clear();
        }
        self.active = name.to_string();
        self.selected_memo = None;
        self.persist();
        Ok(())
    }

    pub fn select_memo(&mut self, group: &str, id: Uuid) -> BoardResult<()> {
        let g = self.group(group)?;
        if g.position(id).is_none() {
            return Err(BoardError::UnknownMemo(id));
        }
        self.selected_memo = Some(id);
        Ok(())
    }

    fn group(&self, name: &str) -> BoardResult<&Group> {
        self.groups
            .get(name)
            .ok_or_else(|| BoardError::UnknownGroup(name.to_string()))
    }

    fn group_mut(&mut self, name: &str) -> BoardResult<&mut Group> {
        self.groups
            .get_mut(name)
            .ok_or_else(|| BoardError::UnknownGroup(name.to_string()))
    }

    /// The group exists and its memos may be changed.
    fn ensure_unlocked(&self, name: &str) -> BoardResult<()> {
        if self.group(name)?.locked {
            log::warn!("Rejected change to locked group {}", name);
            return Err(BoardError::GroupLocked(name.to_string()));
        }
        Ok(())
    }

    fn fresh_color(&mut self) -> String {
        random_memo_color(&mut self.rng).to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::store::MemoryStore;

    pub fn board() -> MemoBoard<MemoryStore> {
        MemoBoard::open(MemoryStore::default(), &BoardConfig::default()).with_seed(42)
    }

    /// Board with groups `기본` and `업무`, `기본` active.
    pub fn two_groups() -> MemoBoard<MemoryStore> {
        let mut board = board();
        board.create_group("업무").unwrap();
        board.select_group("기본").unwrap();
        board
    }

    pub fn total_memos<S: KeyValueStore>(board: &MemoBoard<S>) -> usize {
        board
            .list_groups()
            .iter()
            .map(|g| board.list_memos(g).len())
            .sum()
    }
}
