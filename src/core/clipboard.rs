use super::memo::MemoSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    Copy,
    Cut,
}

/// The single in-app clipboard entry. Session-only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipEntry {
    pub mode: ClipMode,
    pub source_group: String,
    pub snapshot: MemoSnapshot,
}
