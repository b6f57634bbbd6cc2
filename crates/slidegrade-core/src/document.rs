//! Read-only presentation document tree.
//!
//! This is the navigable shape of a presentation as produced by a
//! [`DocumentLoader`](crate::traits::DocumentLoader). Coordinates and
//! extents are in EMU; font sizes are in hundredths of a point.

use serde::{Deserialize, Serialize};

/// A presentation: an ordered list of slides plus document-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub theme: Option<Theme>,
    /// Slideshow settings, only as an opaque key/value bag.
    #[serde(default)]
    pub show_properties: Option<ShowProperties>,
}

impl Document {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            ..Default::default()
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Theme applied to the presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
}

/// Name of the stock theme that every new presentation starts with.
pub const DEFAULT_THEME_NAME: &str = "Office Theme";

/// Slideshow settings as loaded, without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowProperties {
    #[serde(default)]
    pub entries: Vec<(String, String)>,
}

/// One slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub layout: Option<LayoutRef>,
    #[serde(default)]
    pub background: Option<Background>,
    #[serde(default)]
    pub transition: Option<Transition>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Timeline entries in play order.
    #[serde(default)]
    pub animations: Vec<Animation>,
}

impl Slide {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, name: &str) -> Self {
        self.layout = Some(LayoutRef { name: name.into() });
        self
    }

    pub fn with_transition(mut self, effect: &str) -> Self {
        self.transition = Some(Transition::new(effect));
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Concatenated text of every text-bearing shape, space separated.
    pub fn text(&self) -> String {
        self.shapes
            .iter()
            .map(Shape::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// All runs on the slide, in shape order.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.shapes.iter().flat_map(Shape::runs)
    }

    /// All paragraphs on the slide, in shape order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.shapes
            .iter()
            .filter_map(|s| s.text.as_ref())
            .flat_map(|t| t.paragraphs.iter())
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|s| matches!(s.kind, ShapeKind::Picture))
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.shapes.iter().filter_map(|s| match &s.kind {
            ShapeKind::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn smart_arts(&self) -> impl Iterator<Item = &SmartArt> {
        self.shapes.iter().filter_map(|s| match &s.kind {
            ShapeKind::SmartArt(sa) => Some(sa),
            _ => None,
        })
    }

    /// First shape bound to a placeholder of the given kind.
    pub fn placeholder(&self, kind: PlaceholderKind) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.placeholder == Some(kind))
    }
}

/// Reference to the slide layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRef {
    pub name: String,
}

/// Slide background fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub fill: FillKind,
    /// RGB hex colour for solid fills.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillKind {
    Solid,
    Gradient,
    Picture,
    Pattern,
    Texture,
}

impl FillKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillKind::Solid => "Solid",
            FillKind::Gradient => "Gradient",
            FillKind::Picture => "Picture",
            FillKind::Pattern => "Pattern",
            FillKind::Texture => "Texture",
        }
    }
}

/// Slide transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Effect name, e.g. "Fade", "Push".
    pub effect: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub has_sound: bool,
}

impl Transition {
    pub fn new(effect: &str) -> Self {
        Self {
            effect: effect.into(),
            direction: None,
            has_sound: false,
        }
    }
}

/// Opaque animation timeline entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// 1-based order of the animated shape on its slide, when known.
    #[serde(default)]
    pub target_shape: Option<usize>,
}

/// One node of the shape tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default)]
    pub name: String,
    pub kind: ShapeKind,
    #[serde(default)]
    pub placeholder: Option<PlaceholderKind>,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub word_art: Option<WordArt>,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            name: String::new(),
            kind,
            placeholder: None,
            transform: None,
            text: None,
            word_art: None,
        }
    }

    /// A text box holding one paragraph with one plain run.
    pub fn text_box(text: &str) -> Self {
        Self::new(ShapeKind::TextBox).with_runs(vec![Run::plain(text)])
    }

    pub fn picture() -> Self {
        Self::new(ShapeKind::Picture)
    }

    pub fn table(rows: Vec<Vec<&str>>) -> Self {
        Self::new(ShapeKind::Table(Table {
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            style: None,
        }))
    }

    /// Replace the text body with a single paragraph of the given runs.
    pub fn with_runs(mut self, runs: Vec<Run>) -> Self {
        self.text = Some(TextBody {
            paragraphs: vec![Paragraph {
                runs,
                ..Default::default()
            }],
        });
        self
    }

    pub fn with_placeholder(mut self, kind: PlaceholderKind) -> Self {
        self.placeholder = Some(kind);
        self
    }

    pub fn with_transform(mut self, x: i64, y: i64, cx: i64, cy: i64) -> Self {
        self.transform = Some(Transform { x, y, cx, cy });
        self
    }

    /// Text of the shape; table and SmartArt text included.
    pub fn text(&self) -> String {
        match &self.kind {
            ShapeKind::Table(t) => t.text(),
            ShapeKind::SmartArt(sa) => sa.nodes.join(" "),
            _ => self
                .text
                .as_ref()
                .map(TextBody::plain_text)
                .unwrap_or_default(),
        }
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.text
            .iter()
            .flat_map(|t| t.paragraphs.iter())
            .flat_map(|p| p.runs.iter())
    }

    /// Short category name used to filter shapes by element type.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ShapeKind::TextBox => "text",
            ShapeKind::Picture => "picture",
            ShapeKind::Table(_) => "table",
            ShapeKind::SmartArt(_) => "smartart",
            ShapeKind::Chart => "chart",
            ShapeKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeKind {
    #[serde(rename = "textbox")]
    TextBox,
    Picture,
    Table(Table),
    #[serde(rename = "smartart")]
    SmartArt(SmartArt),
    Chart,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Title,
    Body,
    Footer,
    SlideNumber,
    Date,
    Other,
}

/// Offset and extent in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl TextBody {
    /// Paragraph texts joined by newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<Run>,
    /// Explicit alignment; unset means the inherited default (left).
    #[serde(default)]
    pub alignment: Option<String>,
    /// True when line or paragraph spacing is set explicitly.
    #[serde(default)]
    pub custom_spacing: bool,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub props: RunProperties,
}

impl Run {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.into(),
            props: RunProperties::default(),
        }
    }

    pub fn styled(text: &str, props: RunProperties) -> Self {
        Self {
            text: text.into(),
            props,
        }
    }
}

/// Explicit run formatting. `None` means inherited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunProperties {
    #[serde(default)]
    pub font: Option<String>,
    /// Hundredths of a point (2400 = 24pt).
    #[serde(default)]
    pub size: Option<u32>,
    /// RGB hex, with or without a leading '#'.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub underline: Option<bool>,
    #[serde(default)]
    pub strike: Option<bool>,
    #[serde(default)]
    pub hyperlink: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub style: Option<String>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flat_map(|r| r.iter().map(String::as_str))
    }

    pub fn text(&self) -> String {
        self.cells().collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartArt {
    /// Node texts in diagram order.
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordArt {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
}
