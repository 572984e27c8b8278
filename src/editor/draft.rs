use uuid::Uuid;

use super::surface::{Alignment, InlineCommand, RichTextEditable, TextRange};
use crate::core::error::{BoardError, BoardResult};
use crate::core::text::ZERO_WIDTH_SPACE;

pub const FONT_FAMILIES: [&str; 11] = [
    "Pretendard",
    "Apple SD Gothic Neo",
    "Noto Sans KR",
    "Nanum Gothic",
    "Spoqa Han Sans Neo",
    "Inter",
    "Roboto",
    "Arial",
    "Calibri",
    "Times New Roman",
    "monospace",
];

/// Font sizes in px offered by the toolbar.
pub const FONT_SIZES: [u32; 7] = [12, 14, 16, 18, 20, 24, 32];

pub const MAX_CHECKLIST_ITEMS: u32 = 20;
pub const MAX_TABLE_DIMENSION: u32 = 12;

/// A toolbar action on the draft surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOp {
    Bold,
    Italic,
    Underline,
    Align(Alignment),
    FontFamily(String),
    /// Size in px, applied as an explicit span.
    FontSize(u32),
    TextColor(String),
    Highlight(String),
    OrderedList,
    UnorderedList,
    /// Number of checkbox lines; clamped to 1..=20.
    Checklist(u32),
    /// Clamped to 1..=12 in each dimension.
    Table { rows: u32, cols: u32 },
    Link(String),
    Image(String),
    ClearFormatting,
}

impl FormatOp {
    /// The host command for this action; `None` for sizes, which go through
    /// `wrap_range_with_style` instead.
    fn to_command(&self) -> BoardResult<Option<InlineCommand>> {
        let command = match self {
            Self::Bold => InlineCommand::Bold,
            Self::Italic => InlineCommand::Italic,
            Self::Underline => InlineCommand::Underline,
            Self::Align(align) => InlineCommand::Justify(*align),
            Self::FontFamily(family) => InlineCommand::FontName(family.clone()),
            Self::TextColor(color) => InlineCommand::ForeColor(color.clone()),
            Self::Highlight(color) => InlineCommand::HiliteColor(color.clone()),
            Self::OrderedList => InlineCommand::InsertOrderedList,
            Self::UnorderedList => InlineCommand::InsertUnorderedList,
            Self::Checklist(count) => InlineCommand::InsertHtml(checklist_html(*count)),
            Self::Table { rows, cols } => InlineCommand::InsertHtml(table_html(*rows, *cols)),
            Self::Link(url) => InlineCommand::CreateLink(non_blank_url(url)?),
            Self::Image(url) => InlineCommand::InsertImage(non_blank_url(url)?),
            Self::ClearFormatting => InlineCommand::RemoveFormat,
            Self::FontSize(_) => return Ok(None),
        };
        Ok(Some(command))
    }
}

fn non_blank_url(url: &str) -> BoardResult<String> {
    let url = url.trim();
    if url.is_empty() {
        Err(BoardError::BlankUrl)
    } else {
        Ok(url.to_string())
    }
}

pub fn checklist_html(count: u32) -> String {
    let count = count.clamp(1, MAX_CHECKLIST_ITEMS);
    "<div>☐&nbsp;</div>".repeat(count as usize)
}

pub fn table_html(rows: u32, cols: u32) -> String {
    let rows = rows.clamp(1, MAX_TABLE_DIMENSION) as usize;
    let cols = cols.clamp(1, MAX_TABLE_DIMENSION) as usize;
    let row = format!("<tr>{}</tr>", "<td><br></td>".repeat(cols));
    format!("<table><tbody>{}</tbody></table>", row.repeat(rows))
}

/// The memo a draft will overwrite on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub memo_id: Uuid,
    /// Group the memo was loaded from, which need not be the active one.
    pub origin_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftState {
    Idle,
    ComposingNew,
    ComposingEdit(EditTarget),
}

/// The shared compose buffer and its selection bookmark.
///
/// Toolbar controls take focus away from the editable surface, which
/// collapses the live selection. The bookmark keeps the last range seen
/// inside the surface so a command can be replayed onto it.
#[derive(Debug, Clone, Default)]
pub struct DraftEditor {
    html: String,
    target: Option<EditTarget>,
    bookmark: Option<TextRange>,
}

impl DraftEditor {
    pub fn state(&self) -> DraftState {
        match &self.target {
            Some(target) => DraftState::ComposingEdit(target.clone()),
            None if !self.html.trim().is_empty() => DraftState::ComposingNew,
            None => DraftState::Idle,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn target(&self) -> Option<&EditTarget> {
        self.target.as_ref()
    }

    pub fn bookmark(&self) -> Option<TextRange> {
        self.bookmark
    }

    pub fn is_editing(&self, memo_id: Uuid) -> bool {
        self.target.as_ref().is_some_and(|t| t.memo_id == memo_id)
    }

    pub(crate) fn load(&mut self, target: EditTarget, html: &str) {
        self.target = Some(target);
        self.html = html.to_string();
        self.bookmark = None;
    }

    /// Back to idle: empty buffer, no target, no bookmark.
    pub fn clear(&mut self) {
        self.html.clear();
        self.target = None;
        self.bookmark = None;
    }

    pub(crate) fn retarget_group(&mut self, old: &str, new: &str) {
        if let Some(target) = self.target.as_mut() {
            if target.origin_group == old {
                target.origin_group = new.to_string();
            }
        }
    }

    /// Mirror the surface after the user typed into it.
    pub fn on_input(&mut self, surface: &dyn RichTextEditable) {
        self.html = surface.html();
    }

    /// Push the buffer into the surface, e.g. after loading or clearing a draft.
    pub fn render_into(&self, surface: &mut dyn RichTextEditable) {
        surface.set_html(&self.html);
    }

    /// Bookmark the live selection if it is anchored inside `surface`.
    /// Called on pointer-up, key-up and focus.
    pub fn capture_selection(&mut self, surface: &dyn RichTextEditable) -> bool {
        match surface.selection().filter(|r| surface.contains(r)) {
            Some(range) => {
                self.bookmark = Some(range);
                true
            }
            None => false,
        }
    }

    /// Restore the bookmark, run `op`, then bookmark whatever the surface selected.
    pub fn apply(&mut self, surface: &mut dyn RichTextEditable, op: &FormatOp) -> BoardResult<()> {
        let command = op.to_command()?;

        let range = self
            .bookmark
            .filter(|r| surface.contains(r))
            .or_else(|| surface.selection().filter(|r| surface.contains(r)))
            .ok_or(BoardError::NoSelection)?;
        surface.set_selection(range);

        match (op, command) {
            (FormatOp::FontSize(px), _) => apply_font_size(surface, &range, (*px).max(1))?,
            (_, Some(command)) => {
                if !surface.apply_inline(&command) {
                    return Err(BoardError::NoSelection);
                }
            }
            (_, None) => return Err(BoardError::NoSelection),
        }

        self.bookmark = surface.selection().filter(|r| surface.contains(r));
        self.html = surface.html();
        log::debug!("Applied {:?} to draft", op);
        Ok(())
    }
}

fn apply_font_size(surface: &mut dyn RichTextEditable, range: &TextRange, px: u32) -> BoardResult<()> {
    let css = format!("font-size: {}px;", px);
    if range.is_collapsed() {
        // Typing after this point lands inside the sized span.
        let open = format!(r#"<span style="{}">"#, css);
        let placeholder = format!("{}{}</span>", open, ZERO_WIDTH_SPACE);
        let inserted = surface
            .insert_html(range, &placeholder)
            .ok_or(BoardError::NoSelection)?;
        let caret = inserted.start + open.len() + ZERO_WIDTH_SPACE.len_utf8();
        surface.set_selection(TextRange::caret(range.surface, caret));
    } else {
        let wrapped = surface
            .wrap_range_with_style(range, &css)
            .ok_or(BoardError::NoSelection)?;
        surface.set_selection(wrapped);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::fragment::FragmentSurface;

    fn editing() -> EditTarget {
        EditTarget {
            memo_id: Uuid::now_v7(),
            origin_group: "기본".into(),
        }
    }

    #[test]
    fn state_follows_buffer_and_target() {
        let mut draft = DraftEditor::default();
        assert_eq!(draft.state(), DraftState::Idle);

        let mut surface = FragmentSurface::with_html("<p>hi</p>");
        draft.on_input(&surface);
        assert_eq!(draft.state(), DraftState::ComposingNew);

        let target = editing();
        draft.load(target.clone(), "<p>old</p>");
        assert_eq!(draft.state(), DraftState::ComposingEdit(target));

        draft.clear();
        assert_eq!(draft.state(), DraftState::Idle);
        draft.render_into(&mut surface);
        assert_eq!(surface.html(), "");
    }

    #[test]
    fn bookmark_survives_toolbar_blur() {
        let mut draft = DraftEditor::default();
        let mut surface = FragmentSurface::with_html("make this bold");
        surface.select_text("bold");
        assert!(draft.capture_selection(&surface));

        // Clicking the toolbar takes focus away.
        surface.blur();
        assert!(!draft.capture_selection(&surface));

        draft.apply(&mut surface, &FormatOp::Bold).unwrap();
        assert_eq!(draft.html(), "make this <b>bold</b>");

        let bookmark = draft.bookmark().unwrap();
        assert_eq!(&draft.html()[bookmark.start..bookmark.end], "bold");
    }

    #[test]
    fn selection_outside_surface_is_not_bookmarked() {
        let mut draft = DraftEditor::default();
        let surface = FragmentSurface::with_html("text");
        let mut elsewhere = FragmentSurface::with_html("other");
        elsewhere.select(0, 2);

        let mut foreign = FragmentSurface::with_html("text");
        foreign.set_selection(elsewhere.selection().unwrap());
        assert!(!draft.capture_selection(&foreign));
        assert!(!draft.capture_selection(&surface));
        assert!(draft.bookmark().is_none());
    }

    #[test]
    fn no_selection_is_rejected() {
        let mut draft = DraftEditor::default();
        let mut surface = FragmentSurface::with_html("text");
        let err = draft.apply(&mut surface, &FormatOp::Italic).unwrap_err();
        assert!(matches!(err, BoardError::NoSelection));
        assert_eq!(surface.html(), "text");
    }

    #[test]
    fn font_size_wraps_selection() {
        let mut draft = DraftEditor::default();
        let mut surface = FragmentSurface::with_html("small big");
        surface.select_text("big");
        draft.capture_selection(&surface);
        surface.blur();

        draft.apply(&mut surface, &FormatOp::FontSize(24)).unwrap();
        assert_eq!(draft.html(), r#"small <span style="font-size: 24px;">big</span>"#);
    }

    #[test]
    fn font_size_on_caret_inserts_placeholder() {
        let mut draft = DraftEditor::default();
        let mut surface = FragmentSurface::with_html("ab");
        surface.caret_at_end();
        draft.capture_selection(&surface);
        surface.blur();

        draft.apply(&mut surface, &FormatOp::FontSize(18)).unwrap();
        // The caret now sits inside the span, so typing inherits the size.
        surface.set_selection(draft.bookmark().unwrap());
        surface.type_text("c");
        assert_eq!(
            surface.html(),
            "ab<span style=\"font-size: 18px;\">\u{200B}c</span>"
        );
    }

    #[test]
    fn checklist_and_table_are_bounded() {
        assert_eq!(checklist_html(0).matches("☐").count(), 1);
        assert_eq!(checklist_html(99).matches("☐").count(), 20);
        let table = table_html(50, 0);
        assert_eq!(table.matches("<tr>").count(), 12);
        assert_eq!(table.matches("<td>").count(), 12);
        assert_eq!(table_html(2, 3).matches("<td>").count(), 6);
    }

    #[test]
    fn blank_link_is_cancelled() {
        let mut draft = DraftEditor::default();
        let mut surface = FragmentSurface::with_html("x");
        surface.caret_at_end();
        draft.capture_selection(&surface);
        let err = draft.apply(&mut surface, &FormatOp::Link("  ".into())).unwrap_err();
        assert!(matches!(err, BoardError::BlankUrl));
        assert_eq!(surface.html(), "x");
    }

    #[test]
    fn image_and_color_commands() {
        let mut draft = DraftEditor::default();
        let mut surface = FragmentSurface::with_html("red");
        surface.select_text("red");
        draft.capture_selection(&surface);
        draft.apply(&mut surface, &FormatOp::TextColor("#EF4444".into())).unwrap();
        assert_eq!(draft.html(), r#"<span style="color: #EF4444;">red</span>"#);

        surface.caret_at_end();
        draft.capture_selection(&surface);
        draft.apply(&mut surface, &FormatOp::Image("https://img/x.png".into())).unwrap();
        assert!(draft.html().ends_with(r#"<img src="https://img/x.png">"#));
    }
}
