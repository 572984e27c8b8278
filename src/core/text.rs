use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Placeholder inserted so an empty styled span can hold the caret.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// Content that is never shown: comments and script or style elements.
static HIDDEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?(?:-->|\z)|<script\b.*?(?:</script\s*>|\z)|<style\b.*?(?:</style\s*>|\z)")
        .unwrap()
});

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)</?(?:p|div|li|tr|h[1-6]|blockquote|pre|ul|ol|table|tbody)(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#,
    )
    .unwrap()
});

static CELL_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</t[dh]\s*>").unwrap());

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<(?:[^>"']|"[^"]*"|'[^']*')*>"#).unwrap());

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());

fn decode_entity(caps: &Captures) -> String {
    let body = &caps[1];
    let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = body.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        match body {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => None,
        }
    };
    match decoded {
        Some(c) => c.to_string(),
        None => caps[0].to_string(),
    }
}

/// Derive the plain-text projection of an HTML fragment.
///
/// Comments and script or style content are dropped first. Block boundaries
/// and `<br>` become single newlines, table cells become tabs, every other
/// tag is dropped and entities are decoded. The result is trimmed. The same
/// input always yields the same output.
pub fn plain_text(html: &str) -> String {
    let text = HIDDEN_RE.replace_all(html, "");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = BLOCK_RE.replace_all(&text, "\n");
    let text = CELL_END_RE.replace_all(&text, "\t");
    let text = TAG_RE.replace_all(&text, "");
    let text = ENTITY_RE.replace_all(&text, decode_entity);

    let text: String = text
        .chars()
        .filter(|c| *c != ZERO_WIDTH_SPACE)
        .map(|c| if c == '\u{a0}' { ' ' } else { c })
        .collect();

    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = lines.join("\n");
    BLANK_RUN_RE.replace_all(&joined, "\n").trim().to_string()
}

/// First non-blank line of `text`, trimmed and cut to `max_chars` characters.
pub fn derive_title(text: &str, max_chars: usize) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(max_chars).collect::<String>().trim_end().to_string())
        .unwrap_or_default()
}

/// Escape text for use inside an HTML attribute value.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_text() {
        assert_eq!(plain_text("<p>회의 준비</p>"), "회의 준비");
    }

    #[test]
    fn blocks_and_breaks_become_lines() {
        let html = "<div>first</div><div>second<br>third</div><p></p>";
        assert_eq!(plain_text(html), "first\nsecond\nthird");
    }

    #[test]
    fn inline_tags_are_dropped() {
        let html = r#"<b>bold</b> and <span style="color:#EF4444">red</span>"#;
        assert_eq!(plain_text(html), "bold and red");
    }

    #[test]
    fn entities_decoded() {
        assert_eq!(plain_text("a &amp; b&nbsp;&lt;c&gt; &#8212; &#x41;"), "a & b <c> — A");
        assert_eq!(plain_text("&bogus;"), "&bogus;");
    }

    #[test]
    fn placeholder_and_whitespace_only_is_empty() {
        let html = "<span style=\"font-size:18px\">\u{200B}</span><div><br></div>&nbsp;";
        assert_eq!(plain_text(html), "");
    }

    #[test]
    fn table_cells_tab_separated() {
        let html = "<table><tbody><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></tbody></table>";
        assert_eq!(plain_text(html), "a\tb\nc\td");
    }

    #[test]
    fn derivation_is_stable() {
        let html = "<ul><li>one</li><li>two</li></ul>";
        let once = plain_text(html);
        assert_eq!(once, plain_text(html));
        assert_eq!(once, "one\ntwo");
    }

    #[test]
    fn title_from_first_line() {
        assert_eq!(derive_title("\n  \n  회의 준비  \nsecond", 30), "회의 준비");
        assert_eq!(derive_title("", 30), "");
    }

    #[test]
    fn title_truncated_by_chars() {
        let long = "가".repeat(40);
        let title = derive_title(&long, 30);
        assert_eq!(title.chars().count(), 30);
    }

    #[test]
    fn quoted_angle_bracket_does_not_end_tag() {
        let html = r#"<span title="a > b">shown</span><div data-x='1>2'>next</div>"#;
        assert_eq!(plain_text(html), "shown\nnext");
    }

    #[test]
    fn hidden_content_is_dropped() {
        let html = "<!-- note > here --><style>p { color: red; }</style>\
                    <script>if (a > b) { run(); }</script><p>visible</p>";
        assert_eq!(plain_text(html), "visible");
        assert_eq!(derive_title(&plain_text(html), 30), "visible");
        assert_eq!(plain_text("<!-- only a comment -->"), "");
        assert_eq!(plain_text("<script>unterminated"), "");
    }

    #[test]
    fn attr_escaping() {
        assert_eq!(escape_attr(r#"a"b<c>&"#), "a&quot;b&lt;c&gt;&amp;");
    }
}
