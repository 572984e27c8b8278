use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text::{derive_title, plain_text};

/// A stored memo. Only `id` and `html` are required when decoding; the
/// board fills in a blank title, text or color on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    /// Rich body as an HTML fragment.
    pub html: String,
    /// Plain-text projection of `html`, rewritten with every body change.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "local_now")]
    pub created: NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl Memo {
    /// Build a memo from a rich body. A missing or blank title is derived
    /// from the first line of the body.
    pub fn new(title: Option<&str>, html: &str, color: &str, title_max_chars: usize) -> Self {
        let html = html.trim().to_string();
        let text = plain_text(&html);
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => derive_title(&text, title_max_chars),
        };
        Self {
            id: Uuid::now_v7(),
            title,
            html,
            text,
            color: color.to_string(),
            created: local_now(),
        }
    }

    pub fn set_body(&mut self, html: &str) {
        self.html = html.trim().to_string();
        self.text = plain_text(&self.html);
    }

    /// Copy with a fresh id and creation time.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::now_v7(),
            created: local_now(),
            ..self.clone()
        }
    }

    pub fn snapshot(&self) -> MemoSnapshot {
        MemoSnapshot {
            title: self.title.clone(),
            html: self.html.clone(),
            text: self.text.clone(),
            color: Some(self.color.clone()),
        }
    }
}

/// A memo's content without its identity, as held by the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoSnapshot {
    pub title: String,
    pub html: String,
    pub text: String,
    pub color: Option<String>,
}

impl MemoSnapshot {
    /// Materialize into a new memo. `fallback_color` is used when the snapshot has none.
    pub fn into_memo(self, fallback_color: &str) -> Memo {
        Memo {
            id: Uuid::now_v7(),
            title: self.title,
            html: self.html,
            text: self.text,
            color: self.color.unwrap_or_else(|| fallback_color.to_string()),
            created: local_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_derived_from_body() {
        let memo = Memo::new(None, "  <p>회의 준비</p>\n", "#FEF3C7", 30);
        assert_eq!(memo.title, "회의 준비");
        assert_eq!(memo.text, "회의 준비");
        assert_eq!(memo.html, "<p>회의 준비</p>");
    }

    #[test]
    fn blank_title_is_derived() {
        let memo = Memo::new(Some("   "), "<div>line one</div><div>two</div>", "#FEF3C7", 4);
        assert_eq!(memo.title, "line");
    }

    #[test]
    fn explicit_title_kept() {
        let memo = Memo::new(Some(" Plan "), "<p>body</p>", "#FEF3C7", 30);
        assert_eq!(memo.title, "Plan");
    }

    #[test]
    fn set_body_resyncs_text() {
        let mut memo = Memo::new(None, "<p>a</p>", "#FEF3C7", 30);
        memo.set_body("<p>b</p><p>c</p>");
        assert_eq!(memo.text, "b\nc");
        assert_eq!(memo.title, "a");
    }

    #[test]
    fn duplicate_mints_new_id() {
        let memo = Memo::new(None, "<p>a</p>", "#FEF3C7", 30);
        let copy = memo.duplicate();
        assert_ne!(copy.id, memo.id);
        assert_eq!(copy.html, memo.html);
        assert_eq!(copy.color, memo.color);
    }

    #[test]
    fn snapshot_drops_identity() {
        let memo = Memo::new(Some("A"), "<p>a</p>", "#E0F2FE", 30);
        let pasted = memo.snapshot().into_memo("#FEF3C7");
        assert_ne!(pasted.id, memo.id);
        assert_eq!(pasted.title, "A");
        assert_eq!(pasted.color, "#E0F2FE");

        let colorless = MemoSnapshot { color: None, ..memo.snapshot() };
        assert_eq!(colorless.into_memo("#FEF3C7").color, "#FEF3C7");
    }

    #[test]
    fn decodes_with_only_id_and_html() {
        let id = Uuid::now_v7();
        let memo: Memo =
            serde_json::from_value(serde_json::json!({ "id": id, "html": "<p>x</p>" })).unwrap();
        assert_eq!(memo.id, id);
        assert_eq!(memo.text, "");
        assert_eq!(memo.color, "");

        let missing_html = serde_json::json!({ "id": id, "text": "x" });
        assert!(serde_json::from_value::<Memo>(missing_html).is_err());
    }
}
