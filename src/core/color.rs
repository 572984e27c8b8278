use rand::Rng;

/// Pastel background colors a memo card can take.
pub const MEMO_COLORS: [&str; 7] = [
    "#FEF3C7", "#E0F2FE", "#EDE9FE", "#DCFCE7", "#FCE7F3", "#FFEDD5", "#F5F5F4",
];

/// Tab colors a group falls back to when it has no override.
pub const GROUP_TAB_COLORS: [&str; 5] = ["#BFDBFE", "#FBCFE8", "#FDE68A", "#C7D2FE", "#BBF7D0"];

/// (label, value) pairs for the text color menu.
pub const TEXT_COLORS: [(&str, &str); 7] = [
    ("검정", "#111827"),
    ("회색", "#6B7280"),
    ("빨강", "#EF4444"),
    ("주황", "#F97316"),
    ("초록", "#22C55E"),
    ("파랑", "#3B82F6"),
    ("보라", "#A855F7"),
];

/// (label, value) pairs for the highlight menu.
pub const HIGHLIGHT_COLORS: [(&str, &str); 5] = [
    ("노랑", "#fde68a"),
    ("민트", "#bbf7d0"),
    ("하늘", "#bfdbfe"),
    ("핑크", "#fbcfe8"),
    ("보라", "#e9d5ff"),
];

/// Stable string hash, independent of the std hasher's per-release details.
fn name_hash(name: &str) -> u32 {
    name.chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
}

/// Tab color for a group name. The same name always maps to the same color.
pub fn hashed_group_color(name: &str) -> &'static str {
    GROUP_TAB_COLORS[name_hash(name) as usize % GROUP_TAB_COLORS.len()]
}

pub fn random_memo_color<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MEMO_COLORS[rng.gen_range(0..MEMO_COLORS.len())]
}

pub fn is_memo_color(color: &str) -> bool {
    MEMO_COLORS.iter().any(|c| c.eq_ignore_ascii_case(color))
}
