//! Run-level character formatting. One write engine
//! ([`apply_font_properties`]) backs the single-run writer, the bulk
//! per-paragraph writers, and the style expansion used by the insertion
//! operations, so flag normalization behaves identically everywhere.

use indextree::NodeId;
use std::collections::BTreeMap;
use tracing::warn;

use super::document::WmlDocument;
use super::paragraph::read_flag;
use super::support::{locate_or_create, locate_or_create_first};
use super::text::runs_of;
use crate::units::half_points_to_points;
use crate::wml::properties::{Apply, FontProperties};
use crate::xml::namespaces::W;
use crate::xml::{XmlDocument, XName};

/// Full character formatting of one run. Boolean flags are tri-state:
/// `None` is "not set" (inherit), `Some(false)` only appears for an
/// explicit `w:val="false"` in existing content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStyleInfo {
    /// False when the run has no `w:rPr` at all.
    pub present: bool,
    pub ascii: Option<String>,
    pub h_ansi: Option<String>,
    pub east_asia: Option<String>,
    pub cs: Option<String>,
    /// Half-points, as stored.
    pub size: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strike: Option<bool>,
    pub caps: Option<bool>,
    pub small_caps: Option<bool>,
    pub underline: Option<String>,
    pub color: Option<String>,
    pub highlight: Option<String>,
    /// Character spacing (`w:spacing w:val`), twentieths of a point.
    pub char_spacing: Option<String>,
    pub vert_align: Option<String>,
    /// Unmodeled direct rPr children: local tag -> (local attr -> value).
    pub other: BTreeMap<String, BTreeMap<String, String>>,
}

impl RunStyleInfo {
    pub fn size_points(&self) -> Option<f64> {
        self.size
            .as_ref()?
            .parse::<f64>()
            .ok()
            .map(half_points_to_points)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSizeInfo {
    /// Half-points, as stored.
    pub size: Option<String>,
    pub description: String,
}

impl Default for RunSizeInfo {
    fn default() -> Self {
        Self {
            size: None,
            description: "font size not set".to_string(),
        }
    }
}

impl RunSizeInfo {
    pub fn size_points(&self) -> Option<f64> {
        self.size
            .as_ref()?
            .parse::<f64>()
            .ok()
            .map(half_points_to_points)
    }
}

const MODELED_RPR_CHILDREN: &[&str] = &[
    "rFonts", "sz", "b", "i", "u", "color", "highlight", "strike", "caps", "smallCaps", "spacing",
    "vertAlign",
];

fn read_run_style(doc: &XmlDocument, run: NodeId) -> RunStyleInfo {
    let mut info = RunStyleInfo::default();
    let Some(rpr) = doc.first_by_name(run, &W::rPr()) else {
        return info;
    };
    info.present = true;

    if let Some(rfonts) = doc.first_by_name(rpr, &W::rFonts()) {
        info.ascii = doc.attribute(rfonts, &W::ascii()).map(String::from);
        info.h_ansi = doc.attribute(rfonts, &W::hAnsi()).map(String::from);
        info.east_asia = doc.attribute(rfonts, &W::eastAsia()).map(String::from);
        info.cs = doc.attribute(rfonts, &W::cs()).map(String::from);
    }

    info.size = doc
        .first_by_name(rpr, &W::sz())
        .and_then(|n| doc.attribute(n, &W::val()))
        .map(String::from);

    info.bold = read_flag(doc, rpr, &W::b());
    info.italic = read_flag(doc, rpr, &W::i());
    info.strike = read_flag(doc, rpr, &W::strike());
    info.caps = read_flag(doc, rpr, &W::caps());
    info.small_caps = read_flag(doc, rpr, &W::smallCaps());

    // a bare w:u defaults to single underline
    info.underline = doc.first_by_name(rpr, &W::u()).map(|n| {
        doc.attribute(n, &W::val())
            .unwrap_or("single")
            .to_string()
    });

    info.color = doc
        .first_by_name(rpr, &W::color())
        .and_then(|n| doc.attribute(n, &W::val()))
        .map(String::from);
    info.highlight = doc
        .first_by_name(rpr, &W::highlight())
        .and_then(|n| doc.attribute(n, &W::val()))
        .map(String::from);
    info.char_spacing = doc
        .first_by_name(rpr, &W::spacing())
        .and_then(|n| doc.attribute(n, &W::val()))
        .map(String::from);
    info.vert_align = doc
        .first_by_name(rpr, &W::vertAlign())
        .and_then(|n| doc.attribute(n, &W::val()))
        .map(String::from);

    for child in doc.children(rpr) {
        let Some(data) = doc.get(child) else { continue };
        let Some(name) = data.name() else { continue };
        if MODELED_RPR_CHILDREN.contains(&name.local_name.as_str()) {
            continue;
        }
        let attrs = data
            .attributes()
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|a| (a.name.local_name.clone(), a.value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        info.other.insert(name.local_name.clone(), attrs);
    }

    info
}

fn remove_child(doc: &mut XmlDocument, parent: NodeId, name: &XName) {
    if let Some(node) = doc.first_by_name(parent, name) {
        doc.remove(node);
    }
}

/// Write `font` into an `w:rPr` node.
///
/// Boolean flags normalize on write: `Some(true)` leaves exactly one flag
/// node, `Some(false)` removes the node rather than writing `val="false"`.
/// The read side still honors an explicit false from existing content; the
/// asymmetry is deliberate.
pub(crate) fn apply_font_properties(doc: &mut XmlDocument, rpr: NodeId, font: &FontProperties) {
    if font.names_font() {
        let rfonts = locate_or_create(doc, rpr, &W::rFonts());
        for (attr, value) in [
            (W::ascii(), &font.ascii),
            (W::hAnsi(), &font.h_ansi),
            (W::eastAsia(), &font.east_asia),
            (W::cs(), &font.cs),
        ] {
            if let Some(value) = value {
                doc.set_attribute(rfonts, &attr, value);
            }
        }
    }

    match &font.size {
        Apply::Keep => {}
        Apply::Clear => remove_child(doc, rpr, &W::sz()),
        Apply::Set(half_points) => {
            let sz = locate_or_create(doc, rpr, &W::sz());
            doc.set_attribute(sz, &W::val(), &half_points.to_string());
        }
    }

    for (name, flag) in [
        (W::b(), font.bold),
        (W::i(), font.italic),
        (W::strike(), font.strike),
        (W::caps(), font.caps),
        (W::smallCaps(), font.small_caps),
    ] {
        match flag {
            Some(true) => {
                let node = locate_or_create(doc, rpr, &name);
                doc.set_attribute(node, &W::val(), "true");
            }
            Some(false) => remove_child(doc, rpr, &name),
            None => {}
        }
    }

    for (name, value) in [
        (W::u(), &font.underline),
        (W::color(), &font.color),
        (W::highlight(), &font.highlight),
        (W::vertAlign(), &font.vert_align),
    ] {
        match value {
            Apply::Keep => {}
            Apply::Clear => remove_child(doc, rpr, &name),
            Apply::Set(v) => {
                let node = locate_or_create(doc, rpr, &name);
                doc.set_attribute(node, &W::val(), v);
            }
        }
    }
}

impl WmlDocument {
    fn run_node(&self, paragraph_index: usize, run_index: usize) -> Option<NodeId> {
        let doc = self.doc()?;
        let para = self.paragraph_node(paragraph_index)?;
        let runs = runs_of(doc, para);
        match runs.get(run_index) {
            Some(&run) => Some(run),
            None => {
                warn!(run_index, count = runs.len(), "run index out of range");
                None
            }
        }
    }

    pub fn run_style(&self, paragraph_index: usize, run_index: usize) -> Option<RunStyleInfo> {
        let run = self.run_node(paragraph_index, run_index)?;
        Some(read_run_style(self.doc()?, run))
    }

    /// Like [`run_style`](Self::run_style), but addressing the paragraph
    /// through the all-elements index.
    pub fn element_run_style(&self, element_index: usize, run_index: usize) -> Option<RunStyleInfo> {
        let doc = self.doc()?;
        let element = self.element_node(element_index)?;
        let runs = runs_of(doc, element);
        match runs.get(run_index) {
            Some(&run) => Some(read_run_style(doc, run)),
            None => {
                warn!(run_index, count = runs.len(), "run index out of range");
                None
            }
        }
    }

    pub fn run_size(&self, paragraph_index: usize, run_index: usize) -> Option<RunSizeInfo> {
        let style = self.run_style(paragraph_index, run_index)?;
        let mut info = RunSizeInfo {
            size: style.size,
            ..Default::default()
        };
        if let Some(points) = info.size_points() {
            info.description = format!(
                "font size: {points}pt ({})",
                info.size.as_deref().unwrap_or_default()
            );
        }
        Some(info)
    }

    /// Write character formatting on one run.
    pub fn set_run_style(
        &mut self,
        paragraph_index: usize,
        run_index: usize,
        font: &FontProperties,
    ) -> bool {
        let Some(run) = self.run_node(paragraph_index, run_index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let rpr = locate_or_create_first(doc, run, &W::rPr());
        apply_font_properties(doc, rpr, font);
        true
    }

    pub fn set_run_size(&mut self, paragraph_index: usize, run_index: usize, half_points: u32) -> bool {
        self.set_run_style(
            paragraph_index,
            run_index,
            &FontProperties {
                size: Apply::Set(half_points),
                ..Default::default()
            },
        )
    }

    pub fn set_run_bold(&mut self, paragraph_index: usize, run_index: usize, bold: bool) -> bool {
        self.set_run_style(
            paragraph_index,
            run_index,
            &FontProperties {
                bold: Some(bold),
                ..Default::default()
            },
        )
    }

    /// Apply the same character formatting to every run of a paragraph.
    /// A paragraph with zero runs is reported and the operation is a no-op.
    pub fn set_runs_style(&mut self, paragraph_index: usize, font: &FontProperties) -> bool {
        let Some(para) = self.paragraph_node(paragraph_index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let runs = runs_of(doc, para);
        if runs.is_empty() {
            warn!(paragraph_index, "paragraph has no text runs");
            return false;
        }
        for run in runs {
            let rpr = locate_or_create_first(doc, run, &W::rPr());
            apply_font_properties(doc, rpr, font);
        }
        true
    }

    pub fn set_runs_bold(&mut self, paragraph_index: usize, bold: bool) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                bold: Some(bold),
                ..Default::default()
            },
        )
    }

    pub fn set_runs_italic(&mut self, paragraph_index: usize, italic: bool) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                italic: Some(italic),
                ..Default::default()
            },
        )
    }

    pub fn set_runs_strike(&mut self, paragraph_index: usize, strike: bool) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                strike: Some(strike),
                ..Default::default()
            },
        )
    }

    pub fn set_runs_caps(&mut self, paragraph_index: usize, caps: bool) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                caps: Some(caps),
                ..Default::default()
            },
        )
    }

    pub fn set_runs_size(&mut self, paragraph_index: usize, half_points: u32) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                size: Apply::Set(half_points),
                ..Default::default()
            },
        )
    }

    pub fn set_runs_color(&mut self, paragraph_index: usize, color: &str) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                color: Apply::Set(color.to_string()),
                ..Default::default()
            },
        )
    }

    /// `None` removes the underline node.
    pub fn set_runs_underline(&mut self, paragraph_index: usize, underline: Option<&str>) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                underline: Apply::from(underline.map(String::from)),
                ..Default::default()
            },
        )
    }

    /// `None` removes the highlight node.
    pub fn set_runs_highlight(&mut self, paragraph_index: usize, highlight: Option<&str>) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                highlight: Apply::from(highlight.map(String::from)),
                ..Default::default()
            },
        )
    }

    /// Superscript/subscript; `None` removes the node.
    pub fn set_runs_vertical_alignment(
        &mut self,
        paragraph_index: usize,
        alignment: Option<&str>,
    ) -> bool {
        self.set_runs_style(
            paragraph_index,
            &FontProperties {
                vert_align: Apply::from(alignment.map(String::from)),
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAIN: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>one</w:t></w:r><w:r><w:rPr><w:b w:val="false"/><w:u/></w:rPr><w:t>two</w:t></w:r></w:p>
<w:p/>
</w:body>
</w:document>"#;

    #[test]
    fn absent_rpr_reads_unset() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let style = doc.run_style(0, 0).unwrap();
        assert!(!style.present);
        assert_eq!(style.bold, None);
        assert_eq!(style.size_points(), None);
    }

    #[test]
    fn explicit_false_is_distinct_from_unset() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let style = doc.run_style(0, 1).unwrap();
        assert!(style.present);
        assert_eq!(style.bold, Some(false));
        assert_eq!(style.italic, None);
        // bare w:u defaults to single
        assert_eq!(style.underline.as_deref(), Some("single"));
    }

    #[test]
    fn size_roundtrips_through_half_points() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(doc.set_run_size(0, 0, 28));
        let size = doc.run_size(0, 0).unwrap();
        assert_eq!(size.size.as_deref(), Some("28"));
        assert_eq!(size.size_points(), Some(14.0));
    }

    #[test]
    fn bold_flag_is_idempotent_and_removed_on_false() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();

        assert!(doc.set_run_bold(0, 0, true));
        assert!(doc.set_run_bold(0, 0, true));
        {
            let xml = doc.doc().unwrap();
            let para = doc.paragraph_node(0).unwrap();
            let run = runs_of(xml, para)[0];
            let rpr = xml.first_by_name(run, &W::rPr()).unwrap();
            assert_eq!(xml.elements_by_name(rpr, &W::b()).count(), 1);
        }
        assert_eq!(doc.run_style(0, 0).unwrap().bold, Some(true));

        assert!(doc.set_run_bold(0, 0, false));
        {
            let xml = doc.doc().unwrap();
            let para = doc.paragraph_node(0).unwrap();
            let run = runs_of(xml, para)[0];
            let rpr = xml.first_by_name(run, &W::rPr()).unwrap();
            assert_eq!(xml.elements_by_name(rpr, &W::b()).count(), 0);
        }
        // reading an absent flag is "not set", not explicit false
        assert_eq!(doc.run_style(0, 0).unwrap().bold, None);
    }

    #[test]
    fn clear_removes_valued_nodes() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(doc.set_runs_color(0, "FF0000"));
        assert_eq!(doc.run_style(0, 0).unwrap().color.as_deref(), Some("FF0000"));

        assert!(doc.set_runs_style(
            0,
            &FontProperties {
                color: Apply::Clear,
                ..Default::default()
            }
        ));
        assert_eq!(doc.run_style(0, 0).unwrap().color, None);

        assert!(doc.set_runs_underline(0, Some("double")));
        assert_eq!(doc.run_style(0, 1).unwrap().underline.as_deref(), Some("double"));
        assert!(doc.set_runs_underline(0, None));
        assert_eq!(doc.run_style(0, 1).unwrap().underline, None);
    }

    #[test]
    fn bulk_write_touches_every_run() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(doc.set_runs_size(0, 32));
        assert_eq!(doc.run_style(0, 0).unwrap().size_points(), Some(16.0));
        assert_eq!(doc.run_style(0, 1).unwrap().size_points(), Some(16.0));
    }

    #[test]
    fn bulk_write_on_runless_paragraph_is_reported_noop() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(!doc.set_runs_bold(1, true));
        assert!(!doc.set_runs_bold(42, true));
    }

    #[test]
    fn out_of_range_run_reports_none() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(doc.run_style(0, 9).is_none());
        assert!(doc.run_style(7, 0).is_none());
    }
}
