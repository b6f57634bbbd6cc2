//! Built-in detectors, one per [`KnowledgeType`].
//!
//! Every detector is a plain function with the [`DetectFn`] signature. The
//! helpers here hold the target-selection rules the families share.

pub mod best_effort;
pub mod content;
pub mod slide_attr;
pub mod structural;
pub mod transition;
pub mod visual;

use crate::document::{Document, Shape, ShapeKind, Slide};
use crate::error::GradeError;
use crate::mapping::KnowledgeType;
use crate::navigator;
use crate::normalize::strip_separators;
use crate::params::Parameters;
use crate::traits::DetectFn;

/// Every built-in detector keyed by its tag.
pub fn builtin() -> Vec<(KnowledgeType, DetectFn)> {
    use KnowledgeType as K;
    vec![
        (K::DeleteSlide, structural::delete_slide as DetectFn),
        (K::InsertSlide, structural::insert_slide),
        (K::InsertImage, structural::insert_image),
        (K::InsertTable, structural::insert_table),
        (K::InsertSmartArt, structural::insert_smart_art),
        (K::SetSlideLayout, slide_attr::set_slide_layout),
        (K::SetSlideBackground, slide_attr::set_slide_background),
        (K::ApplyTheme, slide_attr::apply_theme),
        (K::SetTableStyle, slide_attr::set_table_style),
        (K::SetFooterText, slide_attr::set_footer_text),
        (K::SetSlideNumber, slide_attr::set_slide_number),
        (K::InsertNote, slide_attr::insert_note),
        (K::SetWordArtStyle, slide_attr::set_word_art_style),
        (K::SetWordArtEffect, slide_attr::set_word_art_effect),
        (K::InsertTextContent, content::insert_text_content),
        (K::InsertHyperlink, content::insert_hyperlink),
        (K::SetTableContent, content::set_table_content),
        (K::SetSmartArtContent, content::set_smart_art_content),
        (K::SetSlideFont, visual::set_slide_font),
        (K::SetTextFontSize, visual::set_text_font_size),
        (K::SetTextColor, visual::set_text_color),
        (K::SetTextStyle, visual::set_text_style),
        (K::SetTextAlignment, visual::set_text_alignment),
        (K::SetElementPosition, visual::set_element_position),
        (K::SetElementSize, visual::set_element_size),
        (K::SlideTransitionEffect, transition::slide_transition_effect),
        (K::SlideTransitionMode, transition::slide_transition_mode),
        (K::SetAnimationTiming, best_effort::set_animation_timing),
        (K::SetAnimationDuration, best_effort::set_animation_duration),
        (K::SetAnimationOrder, best_effort::set_animation_order),
        (K::SetAnimationDirection, best_effort::set_animation_direction),
        (K::SetAnimationStyle, best_effort::set_animation_style),
        (K::SlideshowMode, best_effort::slideshow_mode),
        (K::SlideshowOptions, best_effort::slideshow_options),
        (K::SlideTransitionSound, best_effort::slide_transition_sound),
        (K::SetSmartArtStyle, best_effort::set_smart_art_style),
        (K::SetSmartArtColor, best_effort::set_smart_art_color),
        (K::SetParagraphSpacing, best_effort::set_paragraph_spacing),
    ]
}

/// The slide named by the required `SlideIndex` parameter.
pub(crate) fn target_slide<'a>(
    doc: &'a Document,
    params: &Parameters,
) -> Result<(i64, &'a Slide), GradeError> {
    let index = params.require_int("SlideIndex")?;
    Ok((index, navigator::slide(doc, index)?))
}

/// The slide named by an optional `SlideIndex`, or every slide.
///
/// A given index must be in range.
pub(crate) fn target_slides<'a>(
    doc: &'a Document,
    params: &Parameters,
) -> Result<Vec<(usize, &'a Slide)>, GradeError> {
    match params.int("SlideIndex") {
        Some(index) => Ok(vec![(index as usize, navigator::slide(doc, index)?)]),
        None => Ok(doc.slides.iter().enumerate().map(|(i, s)| (i + 1, s)).collect()),
    }
}

/// Element category named by an `ElementType` parameter value.
fn element_kind(value: &str) -> Option<&'static str> {
    match strip_separators(value).as_str() {
        "text" | "textbox" | "文本框" | "文本" | "文字" => Some("text"),
        "picture" | "image" | "图片" => Some("picture"),
        "table" | "表格" => Some("table"),
        "smartart" | "smartart图形" => Some("smartart"),
        "chart" | "图表" => Some("chart"),
        _ => None,
    }
}

/// Shapes a visual-property check looks at.
///
/// `ElementType` filters by category. `TextBoxIndex` picks one text box and
/// `ElementIndex` picks one shape of the filtered set, both 1-based. When
/// every slide is searched, slides where the index does not exist are
/// skipped; on an explicit slide the index must exist.
pub(crate) fn candidate_shapes<'a>(
    doc: &'a Document,
    params: &Parameters,
) -> Result<Vec<(usize, &'a Shape)>, GradeError> {
    let explicit_slide = params.int("SlideIndex").is_some();
    let kind = params.string("ElementType").as_deref().and_then(element_kind);
    let text_box = params.int("TextBoxIndex");
    let order = text_box.or_else(|| params.int("ElementIndex"));
    let filter: Box<dyn Fn(&Shape) -> bool> = if text_box.is_some() {
        Box::new(|s: &Shape| matches!(s.kind, ShapeKind::TextBox))
    } else if let Some(k) = kind {
        Box::new(move |s: &Shape| s.kind_name() == k)
    } else {
        Box::new(|_: &Shape| true)
    };

    let mut out = Vec::new();
    for (index, slide) in target_slides(doc, params)? {
        match order {
            Some(order) => match navigator::shape_where(slide, order, &filter) {
                Ok(shape) => out.push((index, shape)),
                Err(e) if explicit_slide => return Err(e),
                Err(_) => {}
            },
            None => out.extend(slide.shapes.iter().filter(|s| filter(*s)).map(|s| (index, s))),
        }
    }
    Ok(out)
}

/// Deduplicated values in first-seen order, comma separated.
pub(crate) fn join_distinct<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    for v in values {
        let v = v.as_ref();
        if !seen.iter().any(|s| s == v) {
            seen.push(v.to_string());
        }
    }
    seen.join(", ")
}
