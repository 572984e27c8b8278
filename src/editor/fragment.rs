use std::sync::atomic::{AtomicU64, Ordering};

use super::surface::{InlineCommand, RichTextEditable, SurfaceId, TextRange};
use crate::core::text::{ZERO_WIDTH_SPACE, escape_attr};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

const VOID_TAGS: &[&str] = &[
    "area", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// Inline elements dropped by `RemoveFormat`.
const FORMAT_TAGS: &[&str] = &[
    "b", "big", "em", "font", "i", "mark", "s", "small", "span", "strike", "strong", "sub",
    "sup", "u",
];

/// One tag or comment in the markup, with the index of its matching tag.
#[derive(Debug, Clone)]
struct Tag {
    start: usize,
    end: usize,
    /// Lowercase element name; empty for comments and declarations.
    name: String,
    closing: bool,
    partner: Option<usize>,
}

/// End of the tag opened at `start`, skipping `>` inside quoted attribute values.
fn tag_end(html: &str, start: usize) -> usize {
    let mut quote = None;
    for (i, c) in html[start..].char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return start + i + 1,
            None => {}
        }
    }
    html.len()
}

/// Every tag in `html`, in order, with open and close tags paired.
fn scan_tags(html: &str) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = html[cursor..].find('<') {
        let start = cursor + offset;
        let rest = &html[start + 1..];
        if rest.starts_with("!--") {
            let end = rest.find("-->").map_or(html.len(), |i| start + 1 + i + 3);
            tags.push(Tag { start, end, name: String::new(), closing: false, partner: None });
            cursor = end;
            continue;
        }
        let closing = rest.starts_with('/');
        let name = rest
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if name.is_empty() && !rest.starts_with('!') {
            cursor = start + 1;
            continue;
        }

        let end = tag_end(html, start);
        let index = tags.len();
        let mut partner = None;
        if closing {
            if let Some(depth) = open.iter().rposition(|&i| tags[i].name == name) {
                let opener = open[depth];
                open.truncate(depth);
                tags[opener].partner = Some(index);
                partner = Some(opener);
            }
        } else if !name.is_empty()
            && !html[start..end].ends_with("/>")
            && !VOID_TAGS.contains(&name.as_str())
        {
            open.push(index);
        }
        tags.push(Tag { start, end, name, closing, partner });
        cursor = end;
    }
    tags
}

/// Byte spans of text between the tags inside `start..end`. Whitespace-only
/// spans are dropped when the range has any visible text.
fn text_runs(html: &str, tags: &[Tag], start: usize, end: usize) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut cursor = start;
    for tag in tags.iter().filter(|t| t.start >= start && t.end <= end) {
        if tag.start > cursor {
            runs.push((cursor, tag.start));
        }
        cursor = tag.end;
    }
    if end > cursor {
        runs.push((cursor, end));
    }
    let visible: Vec<_> = runs
        .iter()
        .copied()
        .filter(|&(s, e)| !html[s..e].trim().is_empty())
        .collect();
    if visible.is_empty() { runs } else { visible }
}

/// Widen `start..end` until no tag inside it has a partner outside it.
fn balance(tags: &[Tag], mut start: usize, mut end: usize) -> (usize, usize) {
    loop {
        let (lo, hi) = (start, end);
        for tag in tags.iter().filter(|t| t.start >= lo && t.end <= hi) {
            if let Some(partner) = tag.partner.map(|p| &tags[p]) {
                start = start.min(partner.start);
                end = end.max(partner.end);
            }
        }
        if (start, end) == (lo, hi) {
            return (start, end);
        }
    }
}

/// An editable region backed by a plain HTML string.
///
/// Formatting is applied by splicing tags around the selected byte range.
/// Range ends that fall inside a tag are pushed outside it first, and new
/// elements are placed so that they nest inside or around existing ones.
/// Used by headless hosts and tests.
#[derive(Debug, Clone)]
pub struct FragmentSurface {
    id: SurfaceId,
    html: String,
    selection: Option<TextRange>,
}

impl Default for FragmentSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentSurface {
    pub fn new() -> Self {
        Self::with_html("")
    }

    pub fn with_html(html: &str) -> Self {
        Self {
            id: SurfaceId(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed)),
            html: html.to_string(),
            selection: None,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Select a byte range of this surface.
    pub fn select(&mut self, start: usize, end: usize) {
        self.selection = Some(TextRange::new(self.id, start, end));
    }

    /// Select the first occurrence of `needle`. Returns false if absent.
    pub fn select_text(&mut self, needle: &str) -> bool {
        match self.html.find(needle) {
            Some(start) => {
                self.select(start, start + needle.len());
                true
            }
            None => false,
        }
    }

    /// Move the caret to the end of the content.
    pub fn caret_at_end(&mut self) {
        let end = self.html.len();
        self.select(end, end);
    }

    /// Focus moved elsewhere, e.g. onto a toolbar control.
    pub fn blur(&mut self) {
        self.selection = None;
    }

    /// Replace the selection with typed text, leaving the caret after it.
    pub fn type_text(&mut self, text: &str) -> bool {
        let Some(range) = self.selection.filter(|r| self.contains(r)) else {
            return false;
        };
        match self.replace(&range, &escape_attr(text)) {
            Some(inserted) => {
                self.selection = Some(TextRange::caret(self.id, inserted.end));
                true
            }
            None => false,
        }
    }

    /// Byte bounds of `range` with any end inside a tag moved outside it.
    fn normalize(&self, range: &TextRange) -> (usize, usize) {
        let tags = scan_tags(&self.html);
        let enclosing = |pos: usize| tags.iter().find(|t| t.start < pos && pos < t.end);
        if range.is_collapsed() {
            let at = enclosing(range.start).map_or(range.start, |t| t.end);
            (at, at)
        } else {
            (
                enclosing(range.start).map_or(range.start, |t| t.start),
                enclosing(range.end).map_or(range.end, |t| t.end),
            )
        }
    }

    fn placeholder(&mut self, at: usize, open: &str, close: &str) -> TextRange {
        let placeholder = format!("{}{}{}", open, ZERO_WIDTH_SPACE, close);
        self.html.insert_str(at, &placeholder);
        TextRange::caret(self.id, at + open.len() + ZERO_WIDTH_SPACE.len_utf8())
    }

    /// Wrap every text run of the range in its own `open`/`close` pair, so
    /// the new element never straddles an existing tag.
    fn wrap(&mut self, range: &TextRange, open: &str, close: &str) -> Option<TextRange> {
        if !self.contains(range) {
            return None;
        }
        let (start, end) = self.normalize(range);
        let tags = scan_tags(&self.html);
        let runs = text_runs(&self.html, &tags, start, end);
        let (Some(&(first, _)), Some(&(_, last))) = (runs.first(), runs.last()) else {
            return Some(self.placeholder(start, open, close));
        };
        for &(run_start, run_end) in runs.iter().rev() {
            self.html.insert_str(run_end, close);
            self.html.insert_str(run_start, open);
        }
        let shift = (runs.len() - 1) * (open.len() + close.len());
        Some(TextRange::new(self.id, first + open.len(), last + open.len() + shift))
    }

    /// Wrap the range in one block element, widened until every tag inside
    /// it has its partner inside too.
    fn wrap_block(&mut self, range: &TextRange, open: &str, close: &str) -> Option<TextRange> {
        if !self.contains(range) {
            return None;
        }
        let (start, end) = self.normalize(range);
        if start == end {
            return Some(self.placeholder(start, open, close));
        }
        let (start, end) = balance(&scan_tags(&self.html), start, end);
        self.html.insert_str(end, close);
        self.html.insert_str(start, open);
        Some(TextRange::new(self.id, start + open.len(), end + open.len()))
    }

    /// Drop inline formatting from the range. Pairs that cross a range end
    /// are split there, so text outside keeps its formatting.
    fn remove_format(&mut self, range: &TextRange) -> Option<TextRange> {
        if !self.contains(range) {
            return None;
        }
        let (start, end) = self.normalize(range);
        let tags = scan_tags(&self.html);
        let mut closers = String::new();
        let mut reopeners = String::new();
        let mut middle = String::new();
        let mut cursor = start;
        for tag in tags.iter().filter(|t| t.start >= start && t.end <= end) {
            let Some(partner) = tag.partner.map(|p| &tags[p]) else {
                continue;
            };
            if !FORMAT_TAGS.contains(&tag.name.as_str()) {
                continue;
            }
            if tag.closing && partner.start < start {
                closers.push_str(&format!("</{}>", tag.name));
            } else if !tag.closing && partner.end > end {
                reopeners.push_str(&self.html[tag.start..tag.end]);
            }
            middle.push_str(&self.html[cursor..tag.start]);
            cursor = tag.end;
        }
        middle.push_str(&self.html[cursor..end]);

        let replacement = format!("{}{}{}", closers, middle, reopeners);
        self.html.replace_range(start..end, &replacement);
        let inner = start + closers.len();
        Some(TextRange::new(self.id, inner, inner + middle.len()))
    }

    fn replace(&mut self, range: &TextRange, markup: &str) -> Option<TextRange> {
        if !self.contains(range) {
            return None;
        }
        let (start, end) = self.normalize(range);
        self.html.replace_range(start..end, markup);
        Some(TextRange::new(self.id, start, start + markup.len()))
    }

    fn span(&mut self, range: &TextRange, property: &str, value: &str) -> Option<TextRange> {
        let open = format!(r#"<span style="{}: {};">"#, property, escape_attr(value));
        self.wrap(range, &open, "</span>")
    }
}

impl RichTextEditable for FragmentSurface {
    fn html(&self) -> String {
        self.html.clone()
    }

    fn set_html(&mut self, html: &str) {
        self.html = html.to_string();
        self.selection = None;
    }

    fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    fn set_selection(&mut self, range: TextRange) {
        self.selection = Some(range);
    }

    fn contains(&self, range: &TextRange) -> bool {
        range.surface == self.id
            && range.end <= self.html.len()
            && self.html.is_char_boundary(range.start)
            && self.html.is_char_boundary(range.end)
    }

    fn apply_inline(&mut self, command: &InlineCommand) -> bool {
        let Some(range) = self.selection.filter(|r| self.contains(r)) else {
            return false;
        };
        let next = match command {
            InlineCommand::Bold => self.wrap(&range, "<b>", "</b>"),
            InlineCommand::Italic => self.wrap(&range, "<i>", "</i>"),
            InlineCommand::Underline => self.wrap(&range, "<u>", "</u>"),
            InlineCommand::Justify(align) => {
                let open = format!(r#"<div style="text-align: {};">"#, align.as_css());
                self.wrap_block(&range, &open, "</div>")
            }
            InlineCommand::FontName(family) => self.span(&range, "font-family", family),
            InlineCommand::ForeColor(color) => self.span(&range, "color", color),
            InlineCommand::HiliteColor(color) => self.span(&range, "background-color", color),
            InlineCommand::InsertOrderedList => self.wrap_block(&range, "<ol><li>", "</li></ol>"),
            InlineCommand::InsertUnorderedList => self.wrap_block(&range, "<ul><li>", "</li></ul>"),
            InlineCommand::InsertHtml(markup) => self
                .replace(&range, markup)
                .map(|r| TextRange::caret(self.id, r.end)),
            InlineCommand::CreateLink(url) => {
                let open = format!(r#"<a href="{}">"#, escape_attr(url));
                if range.is_collapsed() {
                    let markup = format!("{}{}</a>", open, escape_attr(url));
                    self.replace(&range, &markup)
                        .map(|r| TextRange::new(self.id, r.start + open.len(), r.end - "</a>".len()))
                } else {
                    self.wrap(&range, &open, "</a>")
                }
            }
            InlineCommand::InsertImage(url) => {
                let markup = format!(r#"<img src="{}">"#, escape_attr(url));
                self.replace(&range, &markup)
                    .map(|r| TextRange::caret(self.id, r.end))
            }
            InlineCommand::RemoveFormat => self.remove_format(&range),
        };
        match next {
            Some(range) => {
                self.selection = Some(range);
                true
            }
            None => false,
        }
    }

    fn wrap_range_with_style(&mut self, range: &TextRange, css: &str) -> Option<TextRange> {
        let open = format!(r#"<span style="{}">"#, escape_attr(css));
        let wrapped = self.wrap(range, &open, "</span>")?;
        self.selection = Some(wrapped);
        Some(wrapped)
    }

    fn insert_html(&mut self, range: &TextRange, html: &str) -> Option<TextRange> {
        let inserted = self.replace(range, html)?;
        self.selection = Some(TextRange::caret(self.id, inserted.end));
        Some(inserted)
    }
}
