//! Rubric display names to canonical knowledge types.
//!
//! Resolution runs in three steps: an exact table of the authoring tool's
//! localized names, an ordered list of substring rules (first match wins),
//! and finally the base mapping, which accepts canonical tag names and a
//! few generic fallbacks that no detector handles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical knowledge type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KnowledgeType {
    // structural counts
    DeleteSlide,
    InsertSlide,
    InsertImage,
    InsertTable,
    InsertSmartArt,
    // single-slide attributes
    SetSlideLayout,
    SetSlideBackground,
    ApplyTheme,
    SetTableStyle,
    SetFooterText,
    SetSlideNumber,
    InsertNote,
    SetWordArtStyle,
    SetWordArtEffect,
    // text and content search
    InsertTextContent,
    InsertHyperlink,
    SetTableContent,
    SetSmartArtContent,
    // visual properties
    SetSlideFont,
    SetTextFontSize,
    SetTextColor,
    SetTextStyle,
    SetTextAlignment,
    SetElementPosition,
    SetElementSize,
    // multi-target
    SlideTransitionEffect,
    SlideTransitionMode,
    // best effort
    SetAnimationTiming,
    SetAnimationDuration,
    SetAnimationOrder,
    SetAnimationDirection,
    SetAnimationStyle,
    SlideshowMode,
    SlideshowOptions,
    SlideTransitionSound,
    SetSmartArtStyle,
    SetSmartArtColor,
    SetParagraphSpacing,
}

impl KnowledgeType {
    pub const ALL: [KnowledgeType; 38] = [
        KnowledgeType::DeleteSlide,
        KnowledgeType::InsertSlide,
        KnowledgeType::InsertImage,
        KnowledgeType::InsertTable,
        KnowledgeType::InsertSmartArt,
        KnowledgeType::SetSlideLayout,
        KnowledgeType::SetSlideBackground,
        KnowledgeType::ApplyTheme,
        KnowledgeType::SetTableStyle,
        KnowledgeType::SetFooterText,
        KnowledgeType::SetSlideNumber,
        KnowledgeType::InsertNote,
        KnowledgeType::SetWordArtStyle,
        KnowledgeType::SetWordArtEffect,
        KnowledgeType::InsertTextContent,
        KnowledgeType::InsertHyperlink,
        KnowledgeType::SetTableContent,
        KnowledgeType::SetSmartArtContent,
        KnowledgeType::SetSlideFont,
        KnowledgeType::SetTextFontSize,
        KnowledgeType::SetTextColor,
        KnowledgeType::SetTextStyle,
        KnowledgeType::SetTextAlignment,
        KnowledgeType::SetElementPosition,
        KnowledgeType::SetElementSize,
        KnowledgeType::SlideTransitionEffect,
        KnowledgeType::SlideTransitionMode,
        KnowledgeType::SetAnimationTiming,
        KnowledgeType::SetAnimationDuration,
        KnowledgeType::SetAnimationOrder,
        KnowledgeType::SetAnimationDirection,
        KnowledgeType::SetAnimationStyle,
        KnowledgeType::SlideshowMode,
        KnowledgeType::SlideshowOptions,
        KnowledgeType::SlideTransitionSound,
        KnowledgeType::SetSmartArtStyle,
        KnowledgeType::SetSmartArtColor,
        KnowledgeType::SetParagraphSpacing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeType::DeleteSlide => "DeleteSlide",
            KnowledgeType::InsertSlide => "InsertSlide",
            KnowledgeType::InsertImage => "InsertImage",
            KnowledgeType::InsertTable => "InsertTable",
            KnowledgeType::InsertSmartArt => "InsertSmartArt",
            KnowledgeType::SetSlideLayout => "SetSlideLayout",
            KnowledgeType::SetSlideBackground => "SetSlideBackground",
            KnowledgeType::ApplyTheme => "ApplyTheme",
            KnowledgeType::SetTableStyle => "SetTableStyle",
            KnowledgeType::SetFooterText => "SetFooterText",
            KnowledgeType::SetSlideNumber => "SetSlideNumber",
            KnowledgeType::InsertNote => "InsertNote",
            KnowledgeType::SetWordArtStyle => "SetWordArtStyle",
            KnowledgeType::SetWordArtEffect => "SetWordArtEffect",
            KnowledgeType::InsertTextContent => "InsertTextContent",
            KnowledgeType::InsertHyperlink => "InsertHyperlink",
            KnowledgeType::SetTableContent => "SetTableContent",
            KnowledgeType::SetSmartArtContent => "SetSmartArtContent",
            KnowledgeType::SetSlideFont => "SetSlideFont",
            KnowledgeType::SetTextFontSize => "SetTextFontSize",
            KnowledgeType::SetTextColor => "SetTextColor",
            KnowledgeType::SetTextStyle => "SetTextStyle",
            KnowledgeType::SetTextAlignment => "SetTextAlignment",
            KnowledgeType::SetElementPosition => "SetElementPosition",
            KnowledgeType::SetElementSize => "SetElementSize",
            KnowledgeType::SlideTransitionEffect => "SlideTransitionEffect",
            KnowledgeType::SlideTransitionMode => "SlideTransitionMode",
            KnowledgeType::SetAnimationTiming => "SetAnimationTiming",
            KnowledgeType::SetAnimationDuration => "SetAnimationDuration",
            KnowledgeType::SetAnimationOrder => "SetAnimationOrder",
            KnowledgeType::SetAnimationDirection => "SetAnimationDirection",
            KnowledgeType::SetAnimationStyle => "SetAnimationStyle",
            KnowledgeType::SlideshowMode => "SlideshowMode",
            KnowledgeType::SlideshowOptions => "SlideshowOptions",
            KnowledgeType::SlideTransitionSound => "SlideTransitionSound",
            KnowledgeType::SetSmartArtStyle => "SetSmartArtStyle",
            KnowledgeType::SetSmartArtColor => "SetSmartArtColor",
            KnowledgeType::SetParagraphSpacing => "SetParagraphSpacing",
        }
    }
}

impl fmt::Display for KnowledgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KnowledgeType {
    type Err = String;

    /// Exact, case-sensitive canonical name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnowledgeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown knowledge type: {s}"))
    }
}

/// Result of mapping a display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KnowledgeTag {
    Known(KnowledgeType),
    /// A tag no detector is registered for, kept verbatim for reporting.
    Other(String),
}

impl KnowledgeTag {
    pub fn known(&self) -> Option<KnowledgeType> {
        match self {
            KnowledgeTag::Known(t) => Some(*t),
            KnowledgeTag::Other(_) => None,
        }
    }
}

impl fmt::Display for KnowledgeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeTag::Known(t) => write!(f, "{t}"),
            KnowledgeTag::Other(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Localized display names used by the authoring tool.
const DISPLAY_NAMES: &[(&str, KnowledgeType)] = &[
    ("设置幻灯片版式", KnowledgeType::SetSlideLayout),
    ("删除幻灯片", KnowledgeType::DeleteSlide),
    ("插入幻灯片", KnowledgeType::InsertSlide),
    ("设置幻灯片的字体", KnowledgeType::SetSlideFont),
    ("幻灯片切换效果", KnowledgeType::SlideTransitionEffect),
    ("设置幻灯片切换方式", KnowledgeType::SlideTransitionMode),
    ("幻灯片放映方式", KnowledgeType::SlideshowMode),
    ("幻灯片放映选项", KnowledgeType::SlideshowOptions),
    ("幻灯片插入超链接", KnowledgeType::InsertHyperlink),
    ("幻灯片切换播放声音", KnowledgeType::SlideTransitionSound),
    ("幻灯片编号", KnowledgeType::SetSlideNumber),
    ("页脚文字", KnowledgeType::SetFooterText),
    ("幻灯片插入图片", KnowledgeType::InsertImage),
    ("幻灯片插入表格", KnowledgeType::InsertTable),
    ("幻灯片插入smartart图形", KnowledgeType::InsertSmartArt),
    ("插入备注", KnowledgeType::InsertNote),
    ("幻灯片插入文本内容", KnowledgeType::InsertTextContent),
    ("幻灯片插入文本字号", KnowledgeType::SetTextFontSize),
    ("幻灯片插入文本颜色", KnowledgeType::SetTextColor),
    ("幻灯片插入文本字形", KnowledgeType::SetTextStyle),
    ("元素位置", KnowledgeType::SetElementPosition),
    ("元素高度和宽度设置", KnowledgeType::SetElementSize),
    ("艺术字字样", KnowledgeType::SetWordArtStyle),
    ("艺术字文本效果", KnowledgeType::SetWordArtEffect),
    ("smartart颜色", KnowledgeType::SetSmartArtColor),
    ("动画效果-方向", KnowledgeType::SetAnimationDirection),
    ("动画样式", KnowledgeType::SetAnimationStyle),
    ("动画持续时间", KnowledgeType::SetAnimationDuration),
    ("文本对齐方式", KnowledgeType::SetTextAlignment),
    ("动画顺序", KnowledgeType::SetAnimationOrder),
    ("设置文稿应用主题", KnowledgeType::ApplyTheme),
    ("设置幻灯片背景", KnowledgeType::SetSlideBackground),
    ("设置背景样式", KnowledgeType::SetSlideBackground),
    ("单元格内容", KnowledgeType::SetTableContent),
    ("表格样式", KnowledgeType::SetTableStyle),
    ("smartart样式", KnowledgeType::SetSmartArtStyle),
    ("smartart内容", KnowledgeType::SetSmartArtContent),
    ("动画计时与延时设置", KnowledgeType::SetAnimationTiming),
    ("段落行距", KnowledgeType::SetParagraphSpacing),
];

/// Substring rules, most specific first. A rule whose substring contains
/// another rule's substring must come before it.
const SUBSTRING_RULES: &[(&str, KnowledgeType)] = &[
    ("SlideTransitionSound", KnowledgeType::SlideTransitionSound),
    ("TransitionSound", KnowledgeType::SlideTransitionSound),
    ("SlideTransitionMode", KnowledgeType::SlideTransitionMode),
    ("TransitionMode", KnowledgeType::SlideTransitionMode),
    ("SlideTransition", KnowledgeType::SlideTransitionEffect),
    ("SlideshowOptions", KnowledgeType::SlideshowOptions),
    ("SlideshowMode", KnowledgeType::SlideshowMode),
    ("SlideLayout", KnowledgeType::SetSlideLayout),
    ("DeleteSlide", KnowledgeType::DeleteSlide),
    ("SlideNumber", KnowledgeType::SetSlideNumber),
    ("InsertSlide", KnowledgeType::InsertSlide),
    ("SlideFont", KnowledgeType::SetSlideFont),
    ("SlideBackground", KnowledgeType::SetSlideBackground),
    ("BackgroundStyle", KnowledgeType::SetSlideBackground),
    ("TextContent", KnowledgeType::InsertTextContent),
    ("TextFontSize", KnowledgeType::SetTextFontSize),
    ("TextColor", KnowledgeType::SetTextColor),
    ("TextStyle", KnowledgeType::SetTextStyle),
    ("TextAlignment", KnowledgeType::SetTextAlignment),
    ("ElementPosition", KnowledgeType::SetElementPosition),
    ("ElementSize", KnowledgeType::SetElementSize),
    ("Hyperlink", KnowledgeType::InsertHyperlink),
    ("FooterText", KnowledgeType::SetFooterText),
    ("InsertImage", KnowledgeType::InsertImage),
    ("TableContent", KnowledgeType::SetTableContent),
    ("TableStyle", KnowledgeType::SetTableStyle),
    ("InsertTable", KnowledgeType::InsertTable),
    ("SmartArtContent", KnowledgeType::SetSmartArtContent),
    ("SmartArtStyle", KnowledgeType::SetSmartArtStyle),
    ("SmartArtColor", KnowledgeType::SetSmartArtColor),
    ("InsertSmartArt", KnowledgeType::InsertSmartArt),
    ("InsertNote", KnowledgeType::InsertNote),
    ("ApplyTheme", KnowledgeType::ApplyTheme),
    ("AnimationTiming", KnowledgeType::SetAnimationTiming),
    ("AnimationDuration", KnowledgeType::SetAnimationDuration),
    ("AnimationOrder", KnowledgeType::SetAnimationOrder),
    ("AnimationDirection", KnowledgeType::SetAnimationDirection),
    ("AnimationStyle", KnowledgeType::SetAnimationStyle),
    ("WordArtEffect", KnowledgeType::SetWordArtEffect),
    ("WordArtStyle", KnowledgeType::SetWordArtStyle),
    ("ParagraphSpacing", KnowledgeType::SetParagraphSpacing),
];

/// Generic fallbacks of the base mapping. None of these has a detector.
const GENERIC_FALLBACKS: &[(&str, &str)] = &[
    ("Font", "SetFont"),
    ("Color", "SetColor"),
    ("Size", "SetSize"),
    ("Insert", "Insert"),
    ("Delete", "Delete"),
];

/// Maps rubric display names to knowledge tags.
#[derive(Debug, Clone, Default)]
pub struct NameMapper;

impl NameMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map(&self, name: &str) -> KnowledgeTag {
        let trimmed = name.trim();
        if let Some(t) = Self::display_name(trimmed) {
            return KnowledgeTag::Known(t);
        }
        if let Some(t) = SUBSTRING_RULES
            .iter()
            .find(|(needle, _)| trimmed.contains(needle))
            .map(|(_, t)| *t)
        {
            return KnowledgeTag::Known(t);
        }
        Self::base_mapping(trimmed)
    }

    fn display_name(name: &str) -> Option<KnowledgeType> {
        let lower = name.to_lowercase();
        DISPLAY_NAMES
            .iter()
            .find(|(display, _)| *display == lower)
            .map(|(_, t)| *t)
    }

    fn base_mapping(name: &str) -> KnowledgeTag {
        if let Ok(t) = name.parse::<KnowledgeType>() {
            return KnowledgeTag::Known(t);
        }
        GENERIC_FALLBACKS
            .iter()
            .find(|(needle, _)| name.contains(needle))
            .map(|(_, tag)| KnowledgeTag::Other((*tag).to_string()))
            .unwrap_or_else(|| KnowledgeTag::Other(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(name: &str) -> KnowledgeTag {
        NameMapper::new().map(name)
    }

    fn known(t: KnowledgeType) -> KnowledgeTag {
        KnowledgeTag::Known(t)
    }

    #[test]
    fn every_tag_round_trips_through_mapper() {
        for t in KnowledgeType::ALL {
            assert_eq!(map(t.as_str()), known(t), "{t}");
            assert_eq!(t.as_str().parse::<KnowledgeType>().unwrap(), t);
        }
    }

    #[test]
    fn display_names_are_exact_and_case_insensitive() {
        assert_eq!(map("插入幻灯片"), known(KnowledgeType::InsertSlide));
        assert_eq!(map(" 删除幻灯片 "), known(KnowledgeType::DeleteSlide));
        assert_eq!(map("SmartArt颜色"), known(KnowledgeType::SetSmartArtColor));
        assert_eq!(map("幻灯片插入SmartArt图形"), known(KnowledgeType::InsertSmartArt));
        assert_eq!(map("设置背景样式"), known(KnowledgeType::SetSlideBackground));
    }

    #[test]
    fn transition_sound_and_mode_beat_transition() {
        assert_eq!(map("CheckSlideTransitionSound"), known(KnowledgeType::SlideTransitionSound));
        assert_eq!(map("CheckSlideTransitionMode"), known(KnowledgeType::SlideTransitionMode));
        assert_eq!(map("SetSlideTransition"), known(KnowledgeType::SlideTransitionEffect));
    }

    #[test]
    fn slideshow_options_and_mode_are_distinct() {
        assert_eq!(map("CheckSlideshowOptions"), known(KnowledgeType::SlideshowOptions));
        assert_eq!(map("CheckSlideshowMode"), known(KnowledgeType::SlideshowMode));
    }

    #[test]
    fn slide_number_beats_insert_slide() {
        assert_eq!(map("InsertSlideNumber"), known(KnowledgeType::SetSlideNumber));
        assert_eq!(map("InsertSlideAtEnd"), known(KnowledgeType::InsertSlide));
    }

    #[test]
    fn slide_layout_beats_insert_slide() {
        assert_eq!(map("InsertSlideLayout"), known(KnowledgeType::SetSlideLayout));
    }

    #[test]
    fn delete_slide_beats_generic_delete() {
        assert_eq!(map("DeleteSlide"), known(KnowledgeType::DeleteSlide));
        assert_eq!(map("DeleteShape"), KnowledgeTag::Other("Delete".into()));
    }

    #[test]
    fn text_font_size_beats_generic_size_and_font() {
        assert_eq!(map("TextFontSize"), known(KnowledgeType::SetTextFontSize));
        assert_eq!(map("SlideFont"), known(KnowledgeType::SetSlideFont));
        assert_eq!(map("ShapeFont"), KnowledgeTag::Other("SetFont".into()));
    }

    #[test]
    fn table_style_and_content_beat_insert_table() {
        assert_eq!(map("InsertTableStyle"), known(KnowledgeType::SetTableStyle));
        assert_eq!(map("InsertTableContent"), known(KnowledgeType::SetTableContent));
        assert_eq!(map("InsertTable"), known(KnowledgeType::InsertTable));
    }

    #[test]
    fn smart_art_specifics_beat_insert_smart_art() {
        assert_eq!(map("InsertSmartArtContent"), known(KnowledgeType::SetSmartArtContent));
        assert_eq!(map("InsertSmartArtStyle"), known(KnowledgeType::SetSmartArtStyle));
        assert_eq!(map("InsertSmartArtColor"), known(KnowledgeType::SetSmartArtColor));
        assert_eq!(map("InsertSmartArt"), known(KnowledgeType::InsertSmartArt));
    }

    #[test]
    fn text_color_beats_generic_color() {
        assert_eq!(map("TextColor"), known(KnowledgeType::SetTextColor));
        assert_eq!(map("FillColor"), KnowledgeTag::Other("SetColor".into()));
    }

    #[test]
    fn word_art_effect_and_style_are_distinct() {
        assert_eq!(map("WordArtEffect"), known(KnowledgeType::SetWordArtEffect));
        assert_eq!(map("WordArtStyle"), known(KnowledgeType::SetWordArtStyle));
    }

    #[test]
    fn background_style_maps_to_background() {
        assert_eq!(map("BackgroundStyle"), known(KnowledgeType::SetSlideBackground));
    }

    #[test]
    fn insert_image_beats_generic_insert() {
        assert_eq!(map("InsertImage"), known(KnowledgeType::InsertImage));
        assert_eq!(map("InsertChart"), KnowledgeTag::Other("Insert".into()));
    }

    #[test]
    fn unmapped_name_is_kept_verbatim() {
        assert_eq!(map("完全未知的操作"), KnowledgeTag::Other("完全未知的操作".into()));
        assert_eq!(map("  Mystery "), KnowledgeTag::Other("Mystery".into()));
        assert!(map("Mystery").known().is_none());
    }
}
