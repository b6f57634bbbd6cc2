//! Text and content search.
//!
//! The slide named by `SlideIndex` is searched first, then every slide in
//! document order; the first match wins. Expected text only needs to be
//! contained in the actual text.

use crate::detectors::join_distinct;
use crate::document::{Document, Table};
use crate::error::GradeError;
use crate::navigator::search_order;
use crate::normalize::text_contains;
use crate::params::Parameters;
use crate::results::Detection;

pub fn insert_text_content(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let expected = params.require_string("TextContent")?;
    let slides = search_order(doc, params.int("SlideIndex"));
    for (index, slide) in &slides {
        let text = slide.text();
        if text_contains(&text, &expected) {
            return Ok(Detection::matched(expected, text)
                .with_details(format!("found on slide {index}")));
        }
    }
    Ok(Detection::not_matched(expected, "")
        .with_details(format!("not found on any of {} slide(s)", slides.len())))
}

pub fn insert_hyperlink(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let expected = params.first_string(&["ExpectedUrl", "Url", "HyperlinkUrl"]);
    let mut seen = Vec::new();
    for (index, slide) in search_order(doc, params.int("SlideIndex")) {
        for url in slide.runs().filter_map(|r| r.props.hyperlink.as_deref()) {
            let ok = match &expected {
                Some(e) => text_contains(url, e),
                None => !url.trim().is_empty(),
            };
            if ok {
                return Ok(Detection::matched(expected.unwrap_or_default(), url)
                    .with_details(format!("hyperlink on slide {index}")));
            }
            seen.push(url);
        }
    }
    let actual = if seen.is_empty() {
        "no hyperlink".to_string()
    } else {
        join_distinct(&seen)
    };
    Ok(Detection::not_matched(expected.unwrap_or_else(|| "hyperlink".into()), actual))
}

pub fn set_table_content(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let expected = params
        .string_list("Content")
        .ok_or_else(|| GradeError::MissingParameter("Content".into()))?;
    let rows = params.int("Rows");
    let columns = params.int("Columns");
    let expected_text = expected.join(", ");

    let mut last_actual = String::from("no table");
    for (index, slide) in search_order(doc, params.int("SlideIndex")) {
        for table in slide.tables() {
            last_actual = table.cells().collect::<Vec<_>>().join(", ");
            if table_matches(table, &expected, rows, columns) {
                return Ok(Detection::matched(expected_text, last_actual)
                    .with_details(format!("table on slide {index}")));
            }
        }
    }
    Ok(Detection::not_matched(expected_text, last_actual))
}

/// Cells compared position by position in row-major order.
fn table_matches(table: &Table, expected: &[String], rows: Option<i64>, columns: Option<i64>) -> bool {
    let dims_ok = rows.map_or(true, |r| table.row_count() as i64 == r)
        && columns.map_or(true, |c| table.column_count() as i64 == c);
    let cells: Vec<&str> = table.cells().collect();
    dims_ok
        && expected.len() <= cells.len()
        && expected
            .iter()
            .zip(&cells)
            .all(|(e, actual)| text_contains(actual, e))
}

pub fn set_smart_art_content(doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
    let expected = params.require_any_string(&["TextContent", "Content"])?;
    let mut found_any = false;
    for (index, slide) in search_order(doc, params.int("SlideIndex")) {
        for art in slide.smart_arts() {
            found_any = true;
            let text = art.nodes.join(" ");
            if text_contains(&text, &expected) {
                return Ok(Detection::matched(expected, text)
                    .with_details(format!("SmartArt on slide {index}")));
            }
        }
    }
    let actual = if found_any { "text not found" } else { "no SmartArt" };
    Ok(Detection::not_matched(expected, actual))
}
