//! Typed parameter lookup over an operation point's parameter list.
//!
//! Lookups are exact-key and case-sensitive; the first occurrence of a key
//! wins. An absent key, an empty value and an unparsable value are all
//! reported the same way: not found.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::document::{Document, ShapeKind, Slide};
use crate::error::GradeError;
use crate::mapping::KnowledgeType;
use crate::model::Parameter;

/// Index value meaning "any valid index", chosen per grading context.
pub const WILDCARD_INDEX: i64 = -1;

/// Scalar kind requested from [`Parameters::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Float,
}

/// A resolved parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Float(f64),
}

/// Ordered parameter pairs with typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    pairs: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: &[Parameter]) -> Self {
        Self {
            pairs: params
                .iter()
                .map(|p| (p.name.clone(), p.value.clone()))
                .collect(),
        }
    }

    /// Builder-style insert; an existing key keeps its first value.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw trimmed value of the first occurrence, if non-empty.
    fn raw(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Replace the value of the first occurrence of `key`.
    fn replace_first(&mut self, key: &str, value: String) {
        if let Some(pair) = self.pairs.iter_mut().find(|(k, _)| k == key) {
            pair.1 = value;
        }
    }

    pub fn resolve(&self, key: &str, kind: ParamKind) -> Option<ParamValue> {
        let raw = self.raw(key)?;
        match kind {
            ParamKind::String => Some(ParamValue::String(raw.to_string())),
            ParamKind::Integer => raw.parse().ok().map(ParamValue::Integer),
            ParamKind::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ParamValue::Float),
        }
    }

    pub fn string(&self, key: &str) -> Option<String> {
        match self.resolve(key, ParamKind::String)? {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.resolve(key, ParamKind::Integer)? {
            ParamValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        match self.resolve(key, ParamKind::Float)? {
            ParamValue::Float(f) => Some(f),
            _ => None,
        }
    }

    /// First non-empty value among `keys`, in order.
    pub fn first_string(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.string(k))
    }

    /// First integer among `keys`, in order.
    pub fn first_int(&self, keys: &[&str]) -> Option<i64> {
        keys.iter().find_map(|k| self.int(k))
    }

    /// Comma-separated integers (ASCII or full-width commas).
    ///
    /// Not found if any item fails to parse.
    pub fn int_list(&self, key: &str) -> Option<Vec<i64>> {
        let raw = self.raw(key)?;
        let items: Option<Vec<i64>> = raw
            .split([',', '，', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().ok())
            .collect();
        items.filter(|v| !v.is_empty())
    }

    /// Comma-separated strings with empty items dropped.
    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        let raw = self.raw(key)?;
        let items: Vec<String> = raw
            .split([',', '，'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        (!items.is_empty()).then_some(items)
    }

    /// Boolean flag: true/false, yes/no, 1/0, 是/否.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.raw(key)?.to_lowercase().as_str() {
            "true" | "yes" | "1" | "是" => Some(true),
            "false" | "no" | "0" | "否" => Some(false),
            _ => None,
        }
    }

    pub fn require_string(&self, key: &str) -> Result<String, GradeError> {
        self.string(key)
            .ok_or_else(|| GradeError::MissingParameter(key.to_string()))
    }

    pub fn require_int(&self, key: &str) -> Result<i64, GradeError> {
        self.int(key)
            .ok_or_else(|| GradeError::MissingParameter(key.to_string()))
    }

    pub fn require_float(&self, key: &str) -> Result<f64, GradeError> {
        self.float(key)
            .ok_or_else(|| GradeError::MissingParameter(key.to_string()))
    }

    /// Like [`first_string`](Self::first_string); the error names every key.
    pub fn require_any_string(&self, keys: &[&str]) -> Result<String, GradeError> {
        self.first_string(keys)
            .ok_or_else(|| GradeError::MissingParameter(keys.join("|")))
    }
}

/// Rewrite authoring-tool parameter keys to the names detectors look up.
///
/// Renames are exact-case. When the renamed key already exists, the
/// earlier pair still wins lookups.
pub fn normalize_keys(tag: Option<KnowledgeType>, params: &Parameters) -> Parameters {
    let is_transition = matches!(
        tag,
        Some(KnowledgeType::SlideTransitionEffect) | Some(KnowledgeType::SlideTransitionMode)
    );
    let pairs = params
        .pairs
        .iter()
        .map(|(k, v)| {
            let key = match k.as_str() {
                "SlideNumber" => "SlideIndex",
                "SlideNumbers" => "SlideIndexes",
                "TextBoxNumber" | "TextBoxOrder" => "TextBoxIndex",
                "ElementNumber" | "ElementOrder" => "ElementIndex",
                "ColorValue" => "Color",
                "HorizontalPosition" => "ExpectedX",
                "VerticalPosition" => "ExpectedY",
                "ElementWidth" => "ExpectedWidth",
                "ElementHeight" => "ExpectedHeight",
                "TransitionEffect" if is_transition => "TransitionType",
                other => other,
            };
            (key.to_string(), v.clone())
        })
        .collect();
    Parameters { pairs }
}

/// Deterministic choices for wildcard indexes within one grading context.
///
/// The generator is seeded from the context id, so the same id always
/// yields the same indexes. Each key is resolved at most once.
#[derive(Debug)]
pub struct IndexResolver {
    context_id: String,
    rng: StdRng,
    resolved: HashMap<String, i64>,
}

impl IndexResolver {
    pub fn new(context_id: &str) -> Self {
        let seed = Uuid::new_v5(&Uuid::NAMESPACE_OID, context_id.as_bytes()).as_u128() as u64;
        Self {
            context_id: context_id.to_string(),
            rng: StdRng::seed_from_u64(seed),
            resolved: HashMap::new(),
        }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// A 1-based index in `1..=max` for `key`, cached after the first call.
    ///
    /// `None` when nothing is cached and `max` is 0.
    pub fn resolve(&mut self, key: &str, max: usize) -> Option<i64> {
        if let Some(index) = self.resolved.get(key) {
            return Some(*index);
        }
        if max == 0 {
            return None;
        }
        let index = self.rng.gen_range(1..=max as i64);
        self.resolved.insert(key.to_string(), index);
        Some(index)
    }

    /// Every index chosen so far.
    pub fn resolved(&self) -> &HashMap<String, i64> {
        &self.resolved
    }
}

/// Replace wildcard slide and element indexes with concrete ones.
///
/// `SlideIndex` and each `SlideIndexes` item range over the document's
/// slides. `TextBoxIndex` and `ElementIndex` range over the text boxes or
/// shapes of the target slide, or of the fullest slide when none is given.
/// A wildcard with nothing to choose from is left in place.
pub fn resolve_wildcards(
    params: &Parameters,
    doc: &Document,
    resolver: &mut IndexResolver,
) -> Parameters {
    let mut out = params.clone();
    let slide_count = doc.slides.len();

    let mut slide = params.int("SlideIndex");
    if slide == Some(WILDCARD_INDEX) {
        if let Some(index) = resolver.resolve("SlideIndex", slide_count) {
            out.replace_first("SlideIndex", index.to_string());
            slide = Some(index);
        }
    }

    if let Some(list) = params.int_list("SlideIndexes") {
        if list.contains(&WILDCARD_INDEX) {
            let items: Vec<String> = list
                .iter()
                .enumerate()
                .map(|(i, &index)| match index {
                    WILDCARD_INDEX => resolver
                        .resolve(&format!("SlideIndexes[{i}]"), slide_count)
                        .unwrap_or(index),
                    other => other,
                })
                .map(|index| index.to_string())
                .collect();
            out.replace_first("SlideIndexes", items.join(","));
        }
    }

    let slides: Vec<&Slide> = match slide {
        Some(index) if index >= 1 => doc.slides.get(index as usize - 1).into_iter().collect(),
        Some(_) => Vec::new(),
        None => doc.slides.iter().collect(),
    };
    let fullest = |count: fn(&Slide) -> usize| slides.iter().map(|&s| count(s)).max().unwrap_or(0);
    for (key, count) in [
        ("TextBoxIndex", text_box_count as fn(&Slide) -> usize),
        ("ElementIndex", shape_count),
    ] {
        if params.int(key) == Some(WILDCARD_INDEX) {
            if let Some(index) = resolver.resolve(key, fullest(count)) {
                out.replace_first(key, index.to_string());
            }
        }
    }
    out
}

fn text_box_count(slide: &Slide) -> usize {
    slide
        .shapes
        .iter()
        .filter(|s| matches!(s.kind, ShapeKind::TextBox))
        .count()
}

fn shape_count(slide: &Slide) -> usize {
    slide.shapes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookups() {
        let p = Parameters::new()
            .with("SlideIndex", " 2 ")
            .with("FontSize", "24.5")
            .with("FontName", "Arial");
        assert_eq!(p.int("SlideIndex"), Some(2));
        assert_eq!(p.float("FontSize"), Some(24.5));
        assert_eq!(p.string("FontName").as_deref(), Some("Arial"));
        assert_eq!(p.int("FontName"), None);
        assert_eq!(p.float("Missing"), None);
    }

    #[test]
    fn lookups_are_case_sensitive() {
        let p = Parameters::new().with("SlideIndex", "1");
        assert_eq!(p.int("slideindex"), None);
    }

    #[test]
    fn empty_and_unparsable_are_not_found() {
        let p = Parameters::new().with("A", "   ").with("B", "abc").with("C", "NaN");
        assert!(p.string("A").is_none());
        assert!(p.int("B").is_none());
        assert!(p.float("C").is_none());
        assert!(matches!(
            p.require_int("B"),
            Err(GradeError::MissingParameter(k)) if k == "B"
        ));
    }

    #[test]
    fn first_occurrence_wins() {
        let p = Parameters::new().with("Color", "red").with("Color", "blue");
        assert_eq!(p.string("Color").as_deref(), Some("red"));
    }

    #[test]
    fn int_list_parses_mixed_separators() {
        let p = Parameters::new()
            .with("SlideIndexes", "1, 2，4")
            .with("Bad", "1,x");
        assert_eq!(p.int_list("SlideIndexes"), Some(vec![1, 2, 4]));
        assert_eq!(p.int_list("Bad"), None);
    }

    #[test]
    fn flags() {
        let p = Parameters::new().with("Bold", "是").with("Italic", "false");
        assert_eq!(p.flag("Bold"), Some(true));
        assert_eq!(p.flag("Italic"), Some(false));
        assert_eq!(p.flag("Underline"), None);
    }

    #[test]
    fn normalize_renames_authoring_keys() {
        let p = Parameters::new()
            .with("SlideNumber", "3")
            .with("ElementOrder", "2")
            .with("ColorValue", "#FF0000")
            .with("TransitionEffect", "Fade");
        let n = normalize_keys(Some(KnowledgeType::SlideTransitionEffect), &p);
        assert_eq!(n.int("SlideIndex"), Some(3));
        assert_eq!(n.int("ElementIndex"), Some(2));
        assert_eq!(n.string("Color").as_deref(), Some("#FF0000"));
        assert_eq!(n.string("TransitionType").as_deref(), Some("Fade"));

        let n = normalize_keys(Some(KnowledgeType::SetTextColor), &p);
        assert!(n.string("TransitionType").is_none());
        assert_eq!(n.string("TransitionEffect").as_deref(), Some("Fade"));
    }

    #[test]
    fn normalize_renames_geometry_keys() {
        let p = Parameters::new()
            .with("HorizontalPosition", "100")
            .with("VerticalPosition", "200")
            .with("ElementWidth", "300")
            .with("ElementHeight", "400");
        let n = normalize_keys(Some(KnowledgeType::SetElementPosition), &p);
        assert_eq!(n.float("ExpectedX"), Some(100.0));
        assert_eq!(n.float("ExpectedY"), Some(200.0));
        assert_eq!(n.float("ExpectedWidth"), Some(300.0));
        assert_eq!(n.float("ExpectedHeight"), Some(400.0));
    }

    #[test]
    fn normalize_keeps_first_duplicate() {
        let p = Parameters::new().with("SlideIndex", "1").with("SlideNumber", "5");
        let n = normalize_keys(None, &p);
        assert_eq!(n.int("SlideIndex"), Some(1));
    }

    fn five_slides() -> Document {
        use crate::document::Shape;
        Document::new(
            (0..5)
                .map(|i| Slide::new(vec![Shape::text_box(&format!("s{i}")), Shape::picture()]))
                .collect(),
        )
    }

    #[test]
    fn wildcard_slide_is_in_range() {
        let doc = five_slides();
        for id in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            let mut resolver = IndexResolver::new(id);
            let p = resolve_wildcards(&Parameters::new().with("SlideIndex", "-1"), &doc, &mut resolver);
            let index = p.int("SlideIndex").unwrap();
            assert!((1..=5).contains(&index), "{id}: {index}");
        }
    }

    #[test]
    fn wildcards_are_deterministic_per_context() {
        let doc = five_slides();
        let p = Parameters::new()
            .with("SlideIndex", "-1")
            .with("ElementIndex", "-1")
            .with("SlideIndexes", "1,-1,-1");
        let first = resolve_wildcards(&p, &doc, &mut IndexResolver::new("deck.json#op1"));
        let second = resolve_wildcards(&p, &doc, &mut IndexResolver::new("deck.json#op1"));
        assert_eq!(first, second);

        let index = first.int("ElementIndex").unwrap();
        assert!((1..=2).contains(&index));
        let list = first.int_list("SlideIndexes").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], 1);
        assert!(list.iter().all(|i| (1..=5).contains(i)));
    }

    #[test]
    fn resolver_caches_each_key() {
        let mut resolver = IndexResolver::new("ctx");
        let first = resolver.resolve("SlideIndex", 100).unwrap();
        for _ in 0..10 {
            assert_eq!(resolver.resolve("SlideIndex", 100), Some(first));
        }
        assert_eq!(resolver.resolve("SlideIndex", 0), Some(first));
        assert_eq!(resolver.resolved().len(), 1);
        assert_eq!(resolver.context_id(), "ctx");
    }

    #[test]
    fn wildcard_without_candidates_is_kept() {
        let mut resolver = IndexResolver::new("ctx");
        let p = Parameters::new().with("SlideIndex", "-1").with("TextBoxIndex", "2");
        let out = resolve_wildcards(&p, &Document::default(), &mut resolver);
        assert_eq!(out.int("SlideIndex"), Some(WILDCARD_INDEX));
        assert_eq!(out.int("TextBoxIndex"), Some(2));
        assert!(resolver.resolved().is_empty());
    }
}
