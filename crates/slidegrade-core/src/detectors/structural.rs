//! Slide and element count checks.

use crate::document::{Document, Slide};
use crate::error::GradeError;
use crate::navigator;
use crate::params::Parameters;
use crate::results::Detection;

/// Default slide count after an insert: the original slide plus one.
const DEFAULT_MIN_SLIDES_AFTER_INSERT: i64 = 2;

pub fn delete_slide(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let actual = doc.slide_count() as i64;
    if let Some(expected) = params.int("ExpectedSlideCount") {
        return Ok(
            Detection::verdict(actual == expected, expected.to_string(), actual.to_string())
                .with_details(format!("slide count: expected {expected}, actual {actual}")),
        );
    }
    // Which slide was removed cannot be told from the result alone.
    if let Some(index) = params.int("SlideIndex") {
        return Ok(Detection::plausible(
            actual > 0,
            format!("slide {index} deleted"),
            format!("{actual} slides"),
        )
        .with_details(format!("{actual} slides remain; deleted slide cannot be identified")));
    }
    Err(GradeError::MissingParameter("ExpectedSlideCount|SlideIndex".into()))
}

pub fn insert_slide(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let actual = doc.slide_count() as i64;
    if let Some(expected) = params.int("ExpectedSlideCount") {
        return Ok(
            Detection::verdict(actual >= expected, expected.to_string(), actual.to_string())
                .with_details(format!("slide count: expected at least {expected}, actual {actual}")),
        );
    }
    if let Some(position) = params.int("Position") {
        return Ok(Detection::verdict(
            actual > position,
            format!("slide inserted after {position}"),
            format!("{actual} slides"),
        )
        .with_details(format!("{actual} slides, insert position {position}")));
    }
    let expected = DEFAULT_MIN_SLIDES_AFTER_INSERT;
    Ok(
        Detection::verdict(actual >= expected, expected.to_string(), actual.to_string())
            .with_details(format!("slide count: expected at least {expected}, actual {actual}")),
    )
}

pub fn insert_image(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    count_at_least(doc, params, "ExpectedImageCount", "image", |s| s.pictures().count())
}

pub fn insert_table(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    count_at_least(doc, params, "ExpectedTableCount", "table", |s| s.tables().count())
}

pub fn insert_smart_art(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    count_at_least(doc, params, "ExpectedSmartArtCount", "SmartArt", |s| {
        s.smart_arts().count()
    })
}

/// `count >= expected` (default 1), on the given slide first and then
/// across the whole document.
fn count_at_least(
    doc: &Document,
    params: &Parameters,
    expected_key: &str,
    what: &str,
    count: impl Fn(&Slide) -> usize,
) -> Result<Detection, GradeError> {
    let expected = params.int(expected_key).unwrap_or(1);
    let slide_index = params.int("SlideIndex");

    if let Some((index, slide)) = slide_index.and_then(|i| navigator::optional_slide(doc, i).map(|s| (i, s))) {
        let on_slide = count(slide) as i64;
        if on_slide >= expected {
            return Ok(Detection::matched(expected.to_string(), on_slide.to_string())
                .with_details(format!("{on_slide} {what}(s) on slide {index}")));
        }
        tracing::debug!(what, index, on_slide, expected, "widening count to all slides");
    }

    let total: i64 = doc.slides.iter().map(|s| count(s) as i64).sum();
    let scope = match slide_index {
        Some(i) => format!("slide {i} short, {total} in document"),
        None => format!("{total} in document"),
    };
    Ok(
        Detection::verdict(total >= expected, expected.to_string(), total.to_string())
            .with_details(format!("{what} count: expected at least {expected}, {scope}")),
    )
}
