//! Visual property checks.
//!
//! The property is collected from every candidate (run, paragraph or shape)
//! on the target slides, and the check passes if any candidate matches.

use crate::detectors::{candidate_shapes, join_distinct, target_slides};
use crate::document::{Document, Paragraph, Run, Shape, Transform};
use crate::error::GradeError;
use crate::normalize::{
    color_equals, normalize_alignment, normalize_color, strip_separators, text_equals, within,
    within_emu, EXTENT_TOLERANCE, FONT_SIZE_TOLERANCE, POSITION_TOLERANCE,
};
use crate::params::Parameters;
use crate::results::Detection;

fn runs<'a>(shapes: &'a [(usize, &'a Shape)]) -> impl Iterator<Item = &'a Run> {
    shapes.iter().flat_map(|(_, s)| s.runs())
}

fn paragraphs<'a>(shapes: &'a [(usize, &'a Shape)]) -> impl Iterator<Item = &'a Paragraph> {
    shapes
        .iter()
        .filter_map(|(_, s)| s.text.as_ref())
        .flat_map(|t| t.paragraphs.iter())
}

fn nothing_found(what: &str) -> String {
    format!("no {what} found")
}

pub fn set_slide_font(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let expected = params.require_string("FontName")?;
    let mut fonts = Vec::new();
    for (index, slide) in target_slides(doc, params)? {
        for font in slide.runs().filter_map(|r| r.props.font.as_deref()) {
            if text_equals(font, &expected) {
                return Ok(Detection::matched(expected, font)
                    .with_details(format!("font used on slide {index}")));
            }
            fonts.push(font);
        }
    }
    let actual = if fonts.is_empty() {
        nothing_found("explicit font")
    } else {
        join_distinct(&fonts)
    };
    Ok(Detection::not_matched(expected, actual))
}

pub fn set_text_font_size(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let expected = params.require_float("FontSize")?;
    let shapes = candidate_shapes(doc, params)?;
    let sizes: Vec<f64> = runs(&shapes)
        .filter_map(|r| r.props.size)
        .map(|hundredths| f64::from(hundredths) / 100.0)
        .collect();
    let ok = sizes.iter().any(|s| within(*s, expected, FONT_SIZE_TOLERANCE));
    let actual = if sizes.is_empty() {
        nothing_found("explicit font size")
    } else {
        join_distinct(sizes.iter().map(|s| format!("{s}pt")))
    };
    Ok(Detection::verdict(ok, format!("{expected}pt"), actual)
        .with_details(format!("{} sized run(s) checked", sizes.len())))
}

pub fn set_text_color(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let expected = params.require_any_string(&["Color", "TextColor"])?;
    let shapes = candidate_shapes(doc, params)?;
    let colors: Vec<&str> = runs(&shapes).filter_map(|r| r.props.color.as_deref()).collect();
    let ok = colors.iter().any(|c| color_equals(c, &expected));
    let actual = if colors.is_empty() {
        nothing_found("explicit color")
    } else {
        join_distinct(colors.iter().map(|c| normalize_color(c).unwrap_or_else(|| c.to_string())))
    };
    Ok(Detection::verdict(ok, expected, actual))
}

/// Requested style flags, in bold/italic/underline/strike order.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct StyleFlags {
    bold: bool,
    italic: bool,
    underline: bool,
    strike: bool,
}

impl StyleFlags {
    /// Parses combinations such as "Bold Italic" or "加粗倾斜", or a
    /// numeric style code: 1 bold, 2 italic, 3 underline, 4 strikethrough.
    fn parse(value: &str) -> Option<Self> {
        let v = strip_separators(value);
        let coded = StyleFlags::default();
        match v.as_str() {
            "1" => return Some(StyleFlags { bold: true, ..coded }),
            "2" => return Some(StyleFlags { italic: true, ..coded }),
            "3" => return Some(StyleFlags { underline: true, ..coded }),
            "4" => return Some(StyleFlags { strike: true, ..coded }),
            _ => {}
        }
        let has = |aliases: &[&str]| aliases.iter().any(|a| v.contains(a));
        let flags = StyleFlags {
            bold: has(&["bold", "加粗", "粗体"]),
            italic: has(&["italic", "倾斜", "斜体"]),
            underline: has(&["underline", "下划线"]),
            strike: has(&["strike", "删除线"]),
        };
        (flags != StyleFlags::default()).then_some(flags)
    }

    fn satisfied_by(&self, run: &Run) -> bool {
        let on = |flag: Option<bool>| flag.unwrap_or(false);
        (!self.bold || on(run.props.bold))
            && (!self.italic || on(run.props.italic))
            && (!self.underline || on(run.props.underline))
            && (!self.strike || on(run.props.strike))
    }

    fn of(run: &Run) -> String {
        let p = &run.props;
        let names: Vec<&str> = [
            (p.bold, "bold"),
            (p.italic, "italic"),
            (p.underline, "underline"),
            (p.strike, "strikethrough"),
        ]
        .into_iter()
        .filter(|(flag, _)| flag.unwrap_or(false))
        .map(|(_, name)| name)
        .collect();
        if names.is_empty() {
            "regular".to_string()
        } else {
            names.join("+")
        }
    }
}

pub fn set_text_style(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let raw = params.require_any_string(&["FontStyle", "TextStyle", "StyleType"])?;
    let wanted =
        StyleFlags::parse(&raw).ok_or_else(|| GradeError::MissingParameter("FontStyle".into()))?;
    let shapes = candidate_shapes(doc, params)?;
    let ok = runs(&shapes).any(|r| wanted.satisfied_by(r));
    let actual = join_distinct(runs(&shapes).map(StyleFlags::of));
    let actual = if actual.is_empty() { nothing_found("text") } else { actual };
    Ok(Detection::verdict(ok, raw, actual))
}

pub fn set_text_alignment(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let raw = params.require_any_string(&["Alignment", "HorizontalAlignment", "TextAlignment"])?;
    let expected = normalize_alignment(&raw);
    let shapes = candidate_shapes(doc, params)?;
    // Paragraphs without an explicit alignment render left-aligned.
    let actual: Vec<String> = paragraphs(&shapes)
        .map(|p| p.alignment.as_deref().map_or_else(|| "left".to_string(), normalize_alignment))
        .collect();
    let ok = actual.iter().any(|a| *a == expected);
    let shown = if actual.is_empty() {
        nothing_found("paragraph")
    } else {
        join_distinct(&actual)
    };
    Ok(Detection::verdict(ok, raw, shown))
}

/// EMU parameter; decimal values are rounded.
fn emu(params: &Parameters, key: &str) -> Result<i64, GradeError> {
    params.require_float(key).map(|v| v.round() as i64)
}

fn transform_check(
    doc: &Document,
    params: &Parameters,
    (key_a, key_b): (&str, &str),
    tolerance: i64,
    pick: fn(&Transform) -> (i64, i64),
) -> Result<Detection, GradeError> {
    if params.float(key_a).is_none() && params.float(key_b).is_none() {
        return element_present(doc, params, pick);
    }
    let a = emu(params, key_a)?;
    let b = emu(params, key_b)?;
    let found = placed(&candidate_shapes(doc, params)?, pick);
    let expected = format!("({a}, {b})");
    if let Some((index, (x, y))) = found
        .iter()
        .find(|(_, (x, y))| within_emu(*x, a, tolerance) && within_emu(*y, b, tolerance))
    {
        return Ok(Detection::matched(expected, format!("({x}, {y})"))
            .with_details(format!("element on slide {index}")));
    }
    let actual = if found.is_empty() {
        nothing_found("positioned element")
    } else {
        join_distinct(found.iter().map(|(_, (x, y))| format!("({x}, {y})")))
    };
    Ok(Detection::not_matched(expected, actual)
        .with_details(format!("{} element(s) checked, tolerance {tolerance} EMU", found.len())))
}

fn placed(shapes: &[(usize, &Shape)], pick: fn(&Transform) -> (i64, i64)) -> Vec<(usize, (i64, i64))> {
    shapes
        .iter()
        .filter_map(|(i, s)| s.transform.as_ref().map(|t| (*i, pick(t))))
        .collect()
}

/// With no expected values, a placed target element is enough.
fn element_present(
    doc: &Document,
    params: &Parameters,
    pick: fn(&Transform) -> (i64, i64),
) -> Result<Detection, GradeError> {
    let found = placed(&candidate_shapes(doc, params)?, pick);
    Ok(match found.first() {
        Some((index, (a, b))) => Detection::matched("element present", format!("({a}, {b})"))
            .with_details(format!("no expected values given, element on slide {index}")),
        None => Detection::not_matched("element present", nothing_found("positioned element")),
    })
}

pub fn set_element_position(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    transform_check(
        doc,
        params,
        ("ExpectedX", "ExpectedY"),
        POSITION_TOLERANCE,
        |t| (t.x, t.y),
    )
}

pub fn set_element_size(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    transform_check(
        doc,
        params,
        ("ExpectedWidth", "ExpectedHeight"),
        EXTENT_TOLERANCE,
        |t| (t.cx, t.cy),
    )
}
