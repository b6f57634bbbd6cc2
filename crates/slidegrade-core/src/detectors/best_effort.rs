//! Presence-only checks.
//!
//! These attributes are not exposed precisely enough to compare against
//! the expected value. A check reports `PresentButUnverifiable` when the
//! structure it needs is there and `NotMatched` when it is not; it never
//! reports a verified match.

use crate::detectors::target_slides;
use crate::document::{Document, Slide};
use crate::error::GradeError;
use crate::params::Parameters;
use crate::results::Detection;

/// Expected value echoed on the result: the first given key, else `what`.
fn expected(params: &Parameters, keys: &[&str], what: &str) -> String {
    params.first_string(keys).unwrap_or_else(|| what.to_string())
}

/// Plausible when any target slide satisfies `present`.
fn on_slides(
    doc: &Document,
    params: &Parameters,
    expected: String,
    what: &str,
    present: impl Fn(&Slide) -> bool,
) -> Result<Detection, GradeError> {
    let slides = target_slides(doc, params)?;
    let hit = slides.iter().find(|(_, s)| present(*s)).map(|(i, _)| *i);
    let actual = match hit {
        Some(i) => format!("{what} on slide {i}"),
        None => format!("no {what}"),
    };
    Ok(Detection::plausible(hit.is_some(), expected, actual)
        .with_details(format!("{what} present, value cannot be confirmed")))
}

/// Whether `slide` animates the shape at 1-based `order`.
///
/// When no entry names its target, the timeline must be at least `order`
/// entries long.
fn animates(slide: &Slide, order: i64) -> bool {
    if order < 1 {
        return false;
    }
    let order = order as usize;
    if slide.animations.iter().any(|a| a.target_shape.is_some()) {
        slide.animations.iter().any(|a| a.target_shape == Some(order))
    } else {
        order <= slide.animations.len()
    }
}

/// Animation presence, narrowed to one shape by `ElementIndex`.
fn animated_element(
    doc: &Document,
    params: &Parameters,
    expected: String,
) -> Result<Detection, GradeError> {
    let order = params.int("ElementIndex");
    on_slides(doc, params, expected, "animation", |s| match order {
        Some(o) => animates(s, o),
        None => !s.animations.is_empty(),
    })
}

pub fn set_animation_timing(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["DelayTime", "TriggerMode", "StartMode"], "animation timing");
    animated_element(doc, params, exp)
}

pub fn set_animation_duration(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["Duration", "DurationTime"], "animation duration");
    let order = params.int("ElementIndex");
    on_slides(doc, params, exp, "animation", |s| match order {
        Some(o) => o >= 1 && (o as usize) <= s.animations.len(),
        None => !s.animations.is_empty(),
    })
}

pub fn set_animation_order(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["AnimationOrder", "Order"], "animation order");
    on_slides(doc, params, exp, "animation sequence", |s| {
        s.animations.len() > 1 || s.shapes.len() > 1
    })
}

pub fn set_animation_direction(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["AnimationDirection", "Direction"], "animation direction");
    animated_element(doc, params, exp)
}

pub fn set_animation_style(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["AnimationStyle", "AnimationType"], "animation style");
    animated_element(doc, params, exp)
}

pub fn slide_transition_sound(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["SoundEffect", "Sound"], "transition sound");
    on_slides(doc, params, exp, "transition sound", |s| {
        s.transition.as_ref().is_some_and(|t| t.has_sound)
    })
}

pub fn set_smart_art_style(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["SmartArtStyle", "Style"], "SmartArt style");
    on_slides(doc, params, exp, "SmartArt", |s| s.smart_arts().next().is_some())
}

pub fn set_smart_art_color(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["ColorScheme", "SmartArtColor"], "SmartArt color");
    on_slides(doc, params, exp, "SmartArt", |s| s.smart_arts().next().is_some())
}

pub fn set_paragraph_spacing(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let exp = expected(params, &["LineSpacing", "SpacingValue"], "paragraph spacing");
    on_slides(doc, params, exp, "custom spacing", |s| {
        s.paragraphs().any(|p| p.custom_spacing)
    })
}

fn show_settings(doc: &Document, params: &Parameters, keys: &[&str], what: &str) -> Detection {
    let present = doc
        .show_properties
        .as_ref()
        .is_some_and(|p| !p.entries.is_empty());
    let actual = if present { "slideshow settings present" } else { "default slideshow settings" };
    Detection::plausible(present, expected(params, keys, what), actual)
        .with_details(format!("{what} cannot be confirmed"))
}

pub fn slideshow_mode(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    Ok(show_settings(doc, params, &["SlideshowMode", "ShowType"], "slideshow mode"))
}

pub fn slideshow_options(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    Ok(show_settings(doc, params, &["SlideshowOptions", "Options"], "slideshow options"))
}
