//! Checks on a single attribute of one slide (or of the document).
//!
//! Without an expected value, each check asks whether the attribute was
//! changed from its default.

use crate::detectors::{join_distinct, target_slide};
use crate::document::{Document, FillKind, PlaceholderKind, WordArt, DEFAULT_THEME_NAME};
use crate::error::GradeError;
use crate::navigator;
use crate::normalize::{
    color_equals, normalize_layout, strip_separators, text_contains, text_equals,
    text_equals_loose,
};
use crate::params::Parameters;
use crate::results::Detection;

const NONE: &str = "(none)";

pub fn set_slide_layout(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let (index, slide) = target_slide(doc, params)?;
    let expected = params.require_string("LayoutType")?;
    let actual = navigator::layout(slide).map(|l| l.name.as_str()).unwrap_or(NONE);
    let ok = navigator::layout(slide).is_some()
        && normalize_layout(actual) == normalize_layout(&expected);
    Ok(Detection::verdict(ok, expected, actual)
        .with_details(format!("slide {index} layout: {actual}")))
}

/// Fill kind named by a `BackgroundType`/`FillType` value.
fn fill_kind(value: &str) -> Option<FillKind> {
    match strip_separators(value).as_str() {
        "solid" | "solidfill" | "纯色" | "纯色填充" => Some(FillKind::Solid),
        "gradient" | "gradientfill" | "渐变" | "渐变填充" => Some(FillKind::Gradient),
        "picture" | "image" | "picturefill" | "图片" | "图片填充" => Some(FillKind::Picture),
        "pattern" | "patternfill" | "图案" | "图案填充" => Some(FillKind::Pattern),
        "texture" | "纹理" | "纹理填充" => Some(FillKind::Texture),
        _ => None,
    }
}

pub fn set_slide_background(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let (index, slide) = target_slide(doc, params)?;
    let background = navigator::background(slide);
    let actual = background
        .map(|b| match &b.color {
            Some(c) => format!("{} {c}", b.fill.as_str()),
            None => b.fill.as_str().to_string(),
        })
        .unwrap_or_else(|| NONE.to_string());

    let expected_type = params.first_string(&["BackgroundType", "FillType"]);
    let expected_color = params.string("Color");

    if expected_type.is_none() && expected_color.is_none() {
        if let Some(style) = params.string("BackgroundStyle") {
            // Preset background styles are not reflected in the fill alone.
            return Ok(Detection::plausible(background.is_some(), style, actual)
                .with_details(format!("slide {index} background style cannot be confirmed")));
        }
        return Ok(Detection::verdict(background.is_some(), "non-default background", actual)
            .with_details(format!("slide {index} background")));
    }

    let type_ok = match (&expected_type, background) {
        (None, _) => true,
        (Some(t), Some(b)) => match fill_kind(t) {
            Some(kind) => kind == b.fill,
            None => text_equals_loose(t, b.fill.as_str()),
        },
        (Some(_), None) => false,
    };
    let color_ok = match (&expected_color, background.and_then(|b| b.color.as_deref())) {
        (None, _) => true,
        (Some(expected), Some(actual)) => color_equals(actual, expected),
        (Some(_), None) => false,
    };
    let expected = [expected_type, expected_color]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Detection::verdict(type_ok && color_ok, expected, actual)
        .with_details(format!("slide {index} background")))
}

pub fn apply_theme(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let actual = doc.theme.as_ref().map(|t| t.name.as_str()).unwrap_or(NONE);
    let theme_set = doc.theme.is_some();
    match params.first_string(&["ThemeName", "Theme"]) {
        Some(expected) => {
            let ok = theme_set && text_equals(actual, &expected);
            Ok(Detection::verdict(ok, expected, actual))
        }
        None => {
            let ok = theme_set && !text_equals(actual, DEFAULT_THEME_NAME);
            Ok(Detection::verdict(ok, "non-default theme", actual))
        }
    }
}

pub fn set_table_style(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let (index, slide) = target_slide(doc, params)?;
    let styles: Vec<&str> = slide.tables().filter_map(|t| t.style.as_deref()).collect();
    let tables = slide.tables().count();
    let actual = if tables == 0 {
        "no table".to_string()
    } else {
        join_distinct(&styles)
    };
    let (ok, expected) = match params.string("TableStyle") {
        Some(expected) => (
            styles.iter().any(|s| text_equals_loose(s, &expected)),
            expected,
        ),
        None => (!styles.is_empty(), "styled table".to_string()),
    };
    Ok(Detection::verdict(ok, expected, actual)
        .with_details(format!("slide {index}: {tables} table(s)")))
}

pub fn set_footer_text(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let (index, slide) = target_slide(doc, params)?;
    let footer = slide
        .placeholder(PlaceholderKind::Footer)
        .map(|s| s.text())
        .unwrap_or_default();
    let (ok, expected) = match params.first_string(&["ExpectedText", "FooterText"]) {
        Some(expected) => (text_contains(&footer, &expected), expected),
        None => (!footer.trim().is_empty(), "footer text".to_string()),
    };
    let actual = if footer.is_empty() { NONE.to_string() } else { footer };
    Ok(Detection::verdict(ok, expected, actual).with_details(format!("slide {index} footer")))
}

pub fn set_slide_number(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let (index, slide) = target_slide(doc, params)?;
    let present = slide.placeholder(PlaceholderKind::SlideNumber).is_some();
    let actual = if present { "slide number shown" } else { "no slide number" };
    Ok(Detection::verdict(present, "slide number shown", actual)
        .with_details(format!("slide {index}")))
}

pub fn insert_note(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let (index, slide) = target_slide(doc, params)?;
    let expected = params.require_any_string(&["NoteText", "NoteContent"])?;
    let notes = navigator::notes(slide).unwrap_or(NONE);
    let ok = navigator::notes(slide).is_some() && text_contains(notes, &expected);
    Ok(Detection::verdict(ok, expected, notes).with_details(format!("slide {index} notes")))
}

pub fn set_word_art_style(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    word_art(doc, params, "WordArtStyle", |w| w.style.as_deref())
}

pub fn set_word_art_effect(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    word_art(doc, params, "EffectType", |w| w.effect.as_deref())
}

fn word_art(
    doc: &Document,
    params: &Parameters,
    key: &str,
    attr: impl Fn(&WordArt) -> Option<&str>,
) -> Result<Detection, GradeError> {
    let (index, slide) = target_slide(doc, params)?;
    let arts: Vec<_> = slide.shapes.iter().filter_map(|s| s.word_art.as_ref()).collect();
    let values: Vec<&str> = arts.iter().filter_map(|w| attr(*w)).collect();
    let actual = if arts.is_empty() {
        "no word art".to_string()
    } else if values.is_empty() {
        "word art".to_string()
    } else {
        join_distinct(&values)
    };
    let (ok, expected) = match params.string(key) {
        Some(expected) => (values.iter().any(|v| text_equals_loose(v, &expected)), expected),
        None => (!arts.is_empty(), "word art".to_string()),
    };
    Ok(Detection::verdict(ok, expected, actual)
        .with_details(format!("slide {index}: {} word art shape(s)", arts.len())))
}
