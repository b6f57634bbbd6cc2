//! Bounds-checked access into the document tree by 1-based position.

use crate::document::{Background, Document, LayoutRef, Shape, Slide, Transition};
use crate::error::GradeError;

/// Slide at 1-based `index`, or `OutOfRange`.
pub fn slide(doc: &Document, index: i64) -> Result<&Slide, GradeError> {
    element_named("slide", &doc.slides, index)
}

/// Slide at 1-based `index`, or `None` when out of range.
pub fn optional_slide(doc: &Document, index: i64) -> Option<&Slide> {
    slide(doc, index).ok()
}

/// Item at 1-based `order` of an ordered sub-collection.
pub fn element<T>(items: &[T], order: i64) -> Result<&T, GradeError> {
    element_named("element", items, order)
}

fn element_named<'a, T>(what: &'static str, items: &'a [T], order: i64) -> Result<&'a T, GradeError> {
    usize::try_from(order)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| items.get(i))
        .ok_or(GradeError::OutOfRange {
            what,
            index: order,
            len: items.len(),
        })
}

/// Shape at 1-based `order` among the shapes accepted by `filter`.
pub fn shape_where<'a>(
    slide: &'a Slide,
    order: i64,
    filter: impl Fn(&Shape) -> bool,
) -> Result<&'a Shape, GradeError> {
    let shapes: Vec<&Shape> = slide.shapes.iter().filter(|s| filter(*s)).collect();
    element_named("element", &shapes, order).copied()
}

/// Slides to search: the given one first (when valid), then every other
/// slide in document order. Yields `(1-based index, slide)`.
pub fn search_order(doc: &Document, preferred: Option<i64>) -> Vec<(usize, &Slide)> {
    let mut order: Vec<(usize, &Slide)> = Vec::with_capacity(doc.slides.len());
    let first = preferred.and_then(|i| optional_slide(doc, i).map(|s| (i as usize, s)));
    if let Some(first) = first {
        order.push(first);
    }
    order.extend(
        doc.slides
            .iter()
            .enumerate()
            .map(|(i, s)| (i + 1, s))
            .filter(|(i, _)| first.map(|(f, _)| f != *i).unwrap_or(true)),
    );
    order
}

pub fn layout(slide: &Slide) -> Option<&LayoutRef> {
    slide.layout.as_ref()
}

pub fn background(slide: &Slide) -> Option<&Background> {
    slide.background.as_ref()
}

pub fn transition(slide: &Slide) -> Option<&Transition> {
    slide.transition.as_ref()
}

/// Non-blank notes text.
pub fn notes(slide: &Slide) -> Option<&str> {
    slide
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PlaceholderKind, Shape, ShapeKind};

    fn three_slides() -> Document {
        Document::new(vec![
            Slide::new(vec![Shape::text_box("one")]),
            Slide::new(vec![Shape::text_box("two")]),
            Slide::new(vec![Shape::text_box("three")]),
        ])
    }

    #[test]
    fn slide_index_boundaries() {
        let doc = three_slides();
        assert!(slide(&doc, 1).is_ok());
        assert!(slide(&doc, 3).is_ok());
        assert_eq!(
            slide(&doc, 0).unwrap_err(),
            GradeError::slide_out_of_range(0, 3)
        );
        assert_eq!(
            slide(&doc, 4).unwrap_err(),
            GradeError::slide_out_of_range(4, 3)
        );
        assert!(slide(&doc, -1).is_err());
        assert!(slide(&doc, i64::MAX).is_err());
    }

    #[test]
    fn element_order_is_one_based() {
        let items = ["a", "b"];
        assert_eq!(*element(&items, 1).unwrap(), "a");
        assert_eq!(*element(&items, 2).unwrap(), "b");
        assert!(element(&items, 0).is_err());
        assert!(element(&items, 3).is_err());
    }

    #[test]
    fn shape_where_filters_before_indexing() {
        let s = Slide::new(vec![
            Shape::picture(),
            Shape::text_box("first"),
            Shape::text_box("second"),
        ]);
        let shape = shape_where(&s, 2, |sh| matches!(sh.kind, ShapeKind::TextBox)).unwrap();
        assert_eq!(shape.text(), "second");
    }

    #[test]
    fn search_order_starts_at_preferred_slide() {
        let doc = three_slides();
        let order: Vec<usize> = search_order(&doc, Some(2)).iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![2, 1, 3]);
        let order: Vec<usize> = search_order(&doc, Some(9)).iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 2, 3]);
        let order: Vec<usize> = search_order(&doc, None).iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn optional_structure_is_none() {
        let s = Slide::new(vec![]).with_notes("   ");
        assert!(layout(&s).is_none());
        assert!(background(&s).is_none());
        assert!(transition(&s).is_none());
        assert!(notes(&s).is_none());
        assert!(s.placeholder(PlaceholderKind::Footer).is_none());
    }
}
