use serde::{Deserialize, Serialize};

/// Identifies one editable region in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// A selection in the host document. Offsets are bytes into the owning
/// surface's HTML; `start <= end`, equal for a bare caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub surface: SurfaceId,
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(surface: SurfaceId, start: usize, end: usize) -> Self {
        Self {
            surface,
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn caret(surface: SurfaceId, at: usize) -> Self {
        Self::new(surface, at, at)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Formatting verbs a host surface executes against its live selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineCommand {
    Bold,
    Italic,
    Underline,
    Justify(Alignment),
    FontName(String),
    ForeColor(String),
    HiliteColor(String),
    InsertOrderedList,
    InsertUnorderedList,
    InsertHtml(String),
    CreateLink(String),
    InsertImage(String),
    RemoveFormat,
}

/// The capabilities the draft editor needs from a rich-text host.
///
/// Every mutating call leaves the live selection on the affected content so
/// the caller can bookmark it again.
pub trait RichTextEditable {
    fn html(&self) -> String;

    /// Replace the whole content. Drops the selection.
    fn set_html(&mut self, html: &str);

    /// The document's live selection, wherever it is anchored.
    fn selection(&self) -> Option<TextRange>;

    fn set_selection(&mut self, range: TextRange);

    /// Whether `range` is anchored inside this surface and still valid for its content.
    fn contains(&self, range: &TextRange) -> bool;

    /// Run `command` against the live selection. Returns false when there is
    /// no selection inside the surface.
    fn apply_inline(&mut self, command: &InlineCommand) -> bool;

    /// Wrap the content of `range` in a span carrying `css`. Returns the range
    /// of the wrapped content.
    fn wrap_range_with_style(&mut self, range: &TextRange, css: &str) -> Option<TextRange>;

    /// Replace `range` with raw `html`. Returns the range the inserted markup occupies.
    fn insert_html(&mut self, range: &TextRange, html: &str) -> Option<TextRange>;
}
