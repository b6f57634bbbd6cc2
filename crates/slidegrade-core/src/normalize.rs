//! Tolerant comparison primitives.
//!
//! All comparators are total: they never panic, and empty input never
//! matches anything.

/// Font size tolerance in points.
pub const FONT_SIZE_TOLERANCE: f64 = 0.1;
/// Position tolerance in EMU.
pub const POSITION_TOLERANCE: i64 = 100;
/// Extent tolerance in EMU.
pub const EXTENT_TOLERANCE: i64 = 1000;

/// Trimmed, case-insensitive equality.
pub fn text_equals(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && !b.is_empty() && a.to_lowercase() == b.to_lowercase()
}

/// Like [`text_equals`], but also ignores whitespace, `_` and `-`.
pub fn text_equals_loose(a: &str, b: &str) -> bool {
    let (a, b) = (strip_separators(a), strip_separators(b));
    !a.is_empty() && a == b
}

/// Case-insensitive substring test.
pub fn text_contains(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !haystack.is_empty()
        && !needle.is_empty()
        && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Lowercase with whitespace, `_` and `-` removed.
pub fn strip_separators(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// `|actual - expected| <= tolerance` for floats.
pub fn within(actual: f64, expected: f64, tolerance: f64) -> bool {
    actual.is_finite() && expected.is_finite() && (actual - expected).abs() <= tolerance
}

/// `|actual - expected| <= tolerance` for EMU values.
pub fn within_emu(actual: i64, expected: i64, tolerance: i64) -> bool {
    actual.abs_diff(expected) <= tolerance.unsigned_abs()
}

/// Canonical `RRGGBB` uppercase form of a colour, if recognizable.
///
/// Accepts `#rrggbb`, `rrggbb`, `0xrrggbb` and a handful of common names.
pub fn normalize_color(s: &str) -> Option<String> {
    let t = s.trim();
    let lower = t.to_lowercase();
    let named = match lower.as_str() {
        "black" | "黑色" => Some("000000"),
        "white" | "白色" => Some("FFFFFF"),
        "red" | "红色" => Some("FF0000"),
        "green" | "绿色" => Some("00FF00"),
        "blue" | "蓝色" => Some("0000FF"),
        "yellow" | "黄色" => Some("FFFF00"),
        _ => None,
    };
    if let Some(hex) = named {
        return Some(hex.to_string());
    }
    let hex = lower
        .strip_prefix('#')
        .or_else(|| lower.strip_prefix("0x"))
        .unwrap_or(&lower);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(hex.to_uppercase())
    } else {
        None
    }
}

/// Colour equality after normalization; falls back to text equality.
pub fn color_equals(actual: &str, expected: &str) -> bool {
    match (normalize_color(actual), normalize_color(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => text_equals(actual, expected),
    }
}

/// Canonical alignment name: "left", "center", "right", "justify",
/// "distributed". Unknown names are returned stripped.
pub fn normalize_alignment(s: &str) -> String {
    let key = strip_separators(s);
    match key.as_str() {
        "l" | "left" | "alignleft" | "左对齐" => "left".into(),
        "ctr" | "center" | "centre" | "aligncenter" | "居中" | "居中对齐" => "center".into(),
        "r" | "right" | "alignright" | "右对齐" => "right".into(),
        "just" | "justify" | "justified" | "两端对齐" => "justify".into(),
        "dist" | "distributed" | "分散对齐" => "distributed".into(),
        _ => key,
    }
}

/// Canonical transition effect name.
pub fn normalize_transition(s: &str) -> String {
    let key = strip_separators(s);
    let key = key.strip_prefix("ppeffect").unwrap_or(&key).to_string();
    match key.as_str() {
        "淡出" | "fadesmoothly" | "fade" => "fade".into(),
        "推进" | "push" => "push".into(),
        "擦除" | "wipe" => "wipe".into(),
        "分割" | "split" => "split".into(),
        "切出" | "cut" => "cut".into(),
        "随机" | "random" => "random".into(),
        "百叶窗" | "blinds" => "blinds".into(),
        "无" | "none" => "none".into(),
        _ => key,
    }
}

/// Layout names compare without spaces or underscores.
pub fn normalize_layout(s: &str) -> String {
    strip_separators(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_equals_trims_and_folds_case() {
        assert!(text_equals("  Title Slide ", "title slide"));
        assert!(!text_equals("Title", "Title Only"));
        assert!(!text_equals("", ""));
        assert!(!text_equals("   ", "x"));
    }

    #[test]
    fn loose_equality_strips_separators() {
        assert!(text_equals_loose("Title_and Content", "titleandcontent"));
        assert!(text_equals_loose("Two-Content", "two content"));
        assert!(!text_equals_loose("", ""));
    }

    #[test]
    fn contains_is_case_insensitive() {
        assert!(text_contains("Quarterly SUMMARY report", "summary"));
        assert!(!text_contains("report", "summary"));
        assert!(!text_contains("", "x"));
        assert!(!text_contains("abc", ""));
    }

    #[test]
    fn numeric_tolerances() {
        assert!(within(24.05, 24.0, FONT_SIZE_TOLERANCE));
        assert!(!within(24.2, 24.0, FONT_SIZE_TOLERANCE));
        assert!(!within(f64::NAN, 24.0, FONT_SIZE_TOLERANCE));
        assert!(within_emu(1_000_100, 1_000_000, POSITION_TOLERANCE));
        assert!(!within_emu(1_000_101, 1_000_000, POSITION_TOLERANCE));
        assert!(within_emu(999_000, 1_000_000, EXTENT_TOLERANCE));
    }

    #[test]
    fn colors_normalize() {
        assert_eq!(normalize_color("#ff0000").as_deref(), Some("FF0000"));
        assert_eq!(normalize_color("0x00ff00").as_deref(), Some("00FF00"));
        assert_eq!(normalize_color("Red").as_deref(), Some("FF0000"));
        assert_eq!(normalize_color("#ff00"), None);
        assert!(color_equals("FF0000", "#ff0000"));
        assert!(color_equals("red", "#FF0000"));
        assert!(!color_equals("#0000FF", "#FF0000"));
    }

    #[test]
    fn alignment_aliases() {
        assert_eq!(normalize_alignment("ctr"), "center");
        assert_eq!(normalize_alignment("Center"), "center");
        assert_eq!(normalize_alignment("居中"), "center");
        assert_eq!(normalize_alignment("Justify"), "justify");
    }

    #[test]
    fn transition_aliases() {
        assert_eq!(normalize_transition("ppEffectFade"), "fade");
        assert_eq!(normalize_transition("淡出"), "fade");
        assert_eq!(normalize_transition("Push"), "push");
        assert_eq!(normalize_transition("Morph"), "morph");
    }
}
