//! Declarative property sets accepted by the style writers. Each writer
//! recognizes a closed set of keys; anything the caller leaves at its
//! default is not touched in the XML.

/// Tri-state for removable valued attributes. `Keep` leaves the node as it
/// is, `Clear` deletes it if present, `Set` locate-or-creates it and writes
/// the value. Absence in the XML means "inherit default", so clearing is
/// node removal, never an empty value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Apply<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Apply<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Apply::Keep)
    }
}

impl<T> From<Option<T>> for Apply<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Apply::Set(v),
            None => Apply::Clear,
        }
    }
}

/// Run-level character formatting. Boolean flags use `Option<bool>`:
/// `Some(true)` ensures the flag node exists, `Some(false)` removes it
/// entirely (a false flag is normalized to absence on write), `None`
/// leaves it alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontProperties {
    pub ascii: Option<String>,
    pub h_ansi: Option<String>,
    pub east_asia: Option<String>,
    pub cs: Option<String>,
    /// Half-points.
    pub size: Apply<u32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strike: Option<bool>,
    pub caps: Option<bool>,
    pub small_caps: Option<bool>,
    pub underline: Apply<String>,
    pub color: Apply<String>,
    pub highlight: Apply<String>,
    pub vert_align: Apply<String>,
}

impl FontProperties {
    pub(crate) fn names_font(&self) -> bool {
        self.ascii.is_some()
            || self.h_ansi.is_some()
            || self.east_asia.is_some()
            || self.cs.is_some()
    }

    pub(crate) fn is_empty(&self) -> bool {
        !self.names_font()
            && self.size.is_keep()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.strike.is_none()
            && self.caps.is_none()
            && self.small_caps.is_none()
            && self.underline.is_keep()
            && self.color.is_keep()
            && self.highlight.is_keep()
            && self.vert_align.is_keep()
    }
}

/// Twentieths of a point, stored verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndentationProperties {
    pub left: Option<i64>,
    pub right: Option<i64>,
    pub first_line: Option<i64>,
    pub hanging: Option<i64>,
}

/// Spacing values in twentieths of a point; `line` is interpreted through
/// `line_rule` on read (percent-of-240 under the default `auto` rule).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpacingProperties {
    pub before: Option<i64>,
    pub after: Option<i64>,
    pub line: Option<i64>,
    pub line_rule: Option<String>,
}

/// One border edge: style keyword, width in eighths of a point, gap in
/// points, hex color or `auto`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BorderEdgeProperties {
    pub val: Option<String>,
    pub size: Option<u32>,
    pub space: Option<u32>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParagraphBorderProperties {
    pub top: Option<BorderEdgeProperties>,
    pub bottom: Option<BorderEdgeProperties>,
    pub left: Option<BorderEdgeProperties>,
    pub right: Option<BorderEdgeProperties>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableBorderProperties {
    pub top: Option<BorderEdgeProperties>,
    pub bottom: Option<BorderEdgeProperties>,
    pub left: Option<BorderEdgeProperties>,
    pub right: Option<BorderEdgeProperties>,
    pub inside_h: Option<BorderEdgeProperties>,
    pub inside_v: Option<BorderEdgeProperties>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShadingProperties {
    pub val: Option<String>,
    pub color: Option<String>,
    pub fill: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumberingProperties {
    pub num_id: Option<u32>,
    pub level: Option<u32>,
}

/// Aggregate paragraph style for `update_paragraph_style` and
/// `insert_paragraph`. Groups left at `None` are not touched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphProperties {
    pub style_id: Option<String>,
    pub alignment: Option<String>,
    pub indentation: Option<IndentationProperties>,
    pub spacing: Option<SpacingProperties>,
    pub borders: Option<ParagraphBorderProperties>,
    pub shading: Option<ShadingProperties>,
    pub numbering: Option<NumberingProperties>,
    pub font: Option<FontProperties>,
}
