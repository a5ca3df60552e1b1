//! Paragraph-level style access. Reads never create anything: an absent
//! properties node reads back as all-unset with a "not set" description.
//! Writes locate-or-create the `w:pPr` chain down to the attribute holder.

use indextree::NodeId;
use std::collections::BTreeMap;
use tracing::warn;

use super::document::WmlDocument;
use super::run::apply_font_properties;
use super::support::{locate_or_create, locate_or_create_first};
use crate::units::{eighths_to_points, half_points_to_points, line_value_to_percent, twentieths_to_points};
use crate::wml::properties::{
    IndentationProperties, NumberingProperties, ParagraphBorderProperties, ParagraphProperties,
    ShadingProperties, SpacingProperties,
};
use crate::wml::properties::FontProperties;
use crate::xml::namespaces::W;
use crate::xml::{XmlDocument, XName};

#[derive(Clone, Debug, PartialEq)]
pub struct AlignmentInfo {
    pub alignment: Option<String>,
    pub description: String,
}

impl Default for AlignmentInfo {
    fn default() -> Self {
        Self {
            alignment: None,
            description: "not set".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndentationInfo {
    pub left: Option<String>,
    pub right: Option<String>,
    pub first_line: Option<String>,
    pub hanging: Option<String>,
    pub description: Vec<String>,
}

impl IndentationInfo {
    pub fn left_points(&self) -> Option<f64> {
        parse_points(&self.left, twentieths_to_points)
    }

    pub fn right_points(&self) -> Option<f64> {
        parse_points(&self.right, twentieths_to_points)
    }

    pub fn first_line_points(&self) -> Option<f64> {
        parse_points(&self.first_line, twentieths_to_points)
    }

    pub fn hanging_points(&self) -> Option<f64> {
        parse_points(&self.hanging, twentieths_to_points)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpacingInfo {
    pub before: Option<String>,
    pub after: Option<String>,
    pub line: Option<String>,
    pub line_rule: Option<String>,
    pub description: Vec<String>,
}

impl SpacingInfo {
    pub fn before_points(&self) -> Option<f64> {
        parse_points(&self.before, twentieths_to_points)
    }

    pub fn after_points(&self) -> Option<f64> {
        parse_points(&self.after, twentieths_to_points)
    }

    fn line_is_absolute(&self) -> bool {
        matches!(self.line_rule.as_deref(), Some("exact") | Some("atLeast"))
    }

    /// Line spacing in points, only meaningful under `exact` / `atLeast`.
    pub fn line_points(&self) -> Option<f64> {
        if self.line_is_absolute() {
            parse_points(&self.line, twentieths_to_points)
        } else {
            None
        }
    }

    /// Line spacing as a percentage, the reading for the default `auto`
    /// rule (240 = 100%).
    pub fn line_percent(&self) -> Option<f64> {
        if self.line_is_absolute() {
            None
        } else {
            parse_points(&self.line, line_value_to_percent)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BorderEdgeInfo {
    pub val: Option<String>,
    pub size: Option<String>,
    pub space: Option<String>,
    pub color: Option<String>,
}

impl BorderEdgeInfo {
    pub fn size_points(&self) -> Option<f64> {
        parse_points(&self.size, eighths_to_points)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphBordersInfo {
    pub top: Option<BorderEdgeInfo>,
    pub bottom: Option<BorderEdgeInfo>,
    pub left: Option<BorderEdgeInfo>,
    pub right: Option<BorderEdgeInfo>,
    pub description: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShadingInfo {
    pub val: Option<String>,
    pub color: Option<String>,
    pub fill: Option<String>,
    pub description: String,
}

impl Default for ShadingInfo {
    fn default() -> Self {
        Self {
            val: None,
            color: None,
            fill: None,
            description: "no shading".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NumberingInfo {
    pub num_id: Option<String>,
    pub level: Option<String>,
    pub description: String,
}

impl Default for NumberingInfo {
    fn default() -> Self {
        Self {
            num_id: None,
            level: None,
            description: "no numbering".to_string(),
        }
    }
}

/// Character formatting attached to the paragraph mark (`w:pPr/w:rPr`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphFontInfo {
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
    pub description: Vec<String>,
}

impl ParagraphFontInfo {
    pub fn size_points(&self) -> Option<f64> {
        parse_points(&self.size, half_points_to_points)
    }
}

/// Everything the paragraph's properties node carries, grouped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphStyleInfo {
    /// False when the paragraph has no `w:pPr` at all (every group unset).
    pub present: bool,
    pub style_id: Option<String>,
    pub alignment: AlignmentInfo,
    pub indentation: IndentationInfo,
    pub spacing: SpacingInfo,
    pub borders: ParagraphBordersInfo,
    pub shading: ShadingInfo,
    pub numbering: NumberingInfo,
    pub font: ParagraphFontInfo,
    /// Unmodeled direct pPr children: local tag -> (local attr -> value).
    pub other: BTreeMap<String, BTreeMap<String, String>>,
}

fn parse_points(value: &Option<String>, convert: fn(f64) -> f64) -> Option<f64> {
    value.as_ref()?.parse::<f64>().ok().map(convert)
}

fn attr_of(doc: &XmlDocument, node: NodeId, name: &XName) -> Option<String> {
    doc.attribute(node, name).map(String::from)
}

fn ppr_of(doc: &XmlDocument, paragraph: NodeId) -> Option<NodeId> {
    doc.first_by_name(paragraph, &W::pPr())
}

pub(crate) fn alignment_description(alignment: &str) -> &str {
    match alignment {
        "left" | "start" => "left-aligned",
        "right" | "end" => "right-aligned",
        "center" => "centered",
        "both" | "justified" => "justified",
        "distribute" => "distributed",
        other => other,
    }
}

fn read_alignment(doc: &XmlDocument, paragraph: NodeId) -> AlignmentInfo {
    let mut info = AlignmentInfo::default();
    let Some(ppr) = ppr_of(doc, paragraph) else {
        return info;
    };
    let Some(jc) = doc.first_by_name(ppr, &W::jc()) else {
        return info;
    };
    if let Some(alignment) = attr_of(doc, jc, &W::val()) {
        info.description = alignment_description(&alignment).to_string();
        info.alignment = Some(alignment);
    }
    info
}

fn read_indentation(doc: &XmlDocument, paragraph: NodeId) -> IndentationInfo {
    let mut info = IndentationInfo::default();
    let ind = ppr_of(doc, paragraph).and_then(|ppr| doc.first_by_name(ppr, &W::ind()));

    if let Some(ind) = ind {
        let mut capture = |label: &str, attr: XName, slot: &mut Option<String>| {
            if let Some(value) = attr_of(doc, ind, &attr) {
                if let Ok(v) = value.parse::<f64>() {
                    info.description
                        .push(format!("{label}: {value} ({:.2}pt)", twentieths_to_points(v)));
                }
                *slot = Some(value);
            }
        };
        let mut left = None;
        let mut right = None;
        let mut first_line = None;
        let mut hanging = None;
        capture("left indent", W::left(), &mut left);
        capture("right indent", W::right(), &mut right);
        capture("first-line indent", W::firstLine(), &mut first_line);
        capture("hanging indent", W::hanging(), &mut hanging);
        info.left = left;
        info.right = right;
        info.first_line = first_line;
        info.hanging = hanging;
    }

    if info.description.is_empty() {
        info.description.push("no indentation set".to_string());
    }
    info
}

fn read_spacing(doc: &XmlDocument, paragraph: NodeId) -> SpacingInfo {
    let mut info = SpacingInfo::default();
    let spacing = ppr_of(doc, paragraph).and_then(|ppr| doc.first_by_name(ppr, &W::spacing()));

    if let Some(spacing) = spacing {
        info.before = attr_of(doc, spacing, &W::before());
        info.after = attr_of(doc, spacing, &W::after());
        info.line = attr_of(doc, spacing, &W::line());
        info.line_rule = attr_of(doc, spacing, &W::lineRule());

        if let Some(points) = info.before_points() {
            info.description.push(format!(
                "space before: {} ({points:.2}pt)",
                info.before.as_deref().unwrap_or_default()
            ));
        }
        if let Some(points) = info.after_points() {
            info.description.push(format!(
                "space after: {} ({points:.2}pt)",
                info.after.as_deref().unwrap_or_default()
            ));
        }
        if let Some(points) = info.line_points() {
            let rule = info.line_rule.as_deref().unwrap_or_default();
            info.description
                .push(format!("line spacing: {points:.2}pt ({rule})"));
        } else if let Some(percent) = info.line_percent() {
            info.description
                .push(format!("line spacing: {percent:.0}% (auto)"));
        }
    }

    if info.description.is_empty() {
        info.description.push("no spacing set".to_string());
    }
    info
}

fn read_border_edge(doc: &XmlDocument, parent: NodeId, edge: &XName) -> Option<BorderEdgeInfo> {
    let node = doc.first_by_name(parent, edge)?;
    Some(BorderEdgeInfo {
        val: attr_of(doc, node, &W::val()),
        size: attr_of(doc, node, &W::sz()),
        space: attr_of(doc, node, &W::space()),
        color: attr_of(doc, node, &W::color()),
    })
}

fn describe_border(label: &str, edge: &BorderEdgeInfo) -> String {
    let mut parts = Vec::new();
    if let Some(val) = &edge.val {
        parts.push(format!("style {val}"));
    }
    if let Some(points) = edge.size_points() {
        parts.push(format!("{points:.2}pt"));
    }
    if let Some(space) = &edge.space {
        parts.push(format!("space {space}pt"));
    }
    if let Some(color) = &edge.color {
        parts.push(format!("color {color}"));
    }
    format!("{label}: {}", parts.join(", "))
}

fn read_borders(doc: &XmlDocument, paragraph: NodeId) -> ParagraphBordersInfo {
    let mut info = ParagraphBordersInfo::default();
    let pbdr = ppr_of(doc, paragraph).and_then(|ppr| doc.first_by_name(ppr, &W::pBdr()));

    if let Some(pbdr) = pbdr {
        info.top = read_border_edge(doc, pbdr, &W::top());
        info.bottom = read_border_edge(doc, pbdr, &W::bottom());
        info.left = read_border_edge(doc, pbdr, &W::left());
        info.right = read_border_edge(doc, pbdr, &W::right());

        for (label, edge) in [
            ("top border", &info.top),
            ("bottom border", &info.bottom),
            ("left border", &info.left),
            ("right border", &info.right),
        ] {
            if let Some(edge) = edge {
                info.description.push(describe_border(label, edge));
            }
        }
    }

    if info.description.is_empty() {
        info.description.push("no borders".to_string());
    }
    info
}

fn read_shading(doc: &XmlDocument, paragraph: NodeId) -> ShadingInfo {
    let mut info = ShadingInfo::default();
    let shd = ppr_of(doc, paragraph).and_then(|ppr| doc.first_by_name(ppr, &W::shd()));

    if let Some(shd) = shd {
        info.val = attr_of(doc, shd, &W::val());
        info.color = attr_of(doc, shd, &W::color());
        info.fill = attr_of(doc, shd, &W::fill());

        let mut parts = Vec::new();
        if let Some(val) = &info.val {
            parts.push(format!("pattern {val}"));
        }
        if let Some(color) = &info.color {
            parts.push(format!("color {color}"));
        }
        if let Some(fill) = &info.fill {
            parts.push(format!("fill {fill}"));
        }
        if !parts.is_empty() {
            info.description = format!("shading: {}", parts.join(", "));
        }
    }
    info
}

fn read_numbering(doc: &XmlDocument, paragraph: NodeId) -> NumberingInfo {
    let mut info = NumberingInfo::default();
    let numpr = ppr_of(doc, paragraph).and_then(|ppr| doc.first_by_name(ppr, &W::numPr()));

    if let Some(numpr) = numpr {
        info.level = doc
            .first_by_name(numpr, &W::ilvl())
            .and_then(|n| attr_of(doc, n, &W::val()));
        info.num_id = doc
            .first_by_name(numpr, &W::numId())
            .and_then(|n| attr_of(doc, n, &W::val()));

        let mut parts = Vec::new();
        if let Some(id) = &info.num_id {
            parts.push(format!("numbering id {id}"));
        }
        if let Some(level) = &info.level {
            parts.push(format!("level {level}"));
        }
        if !parts.is_empty() {
            info.description = parts.join(", ");
        }
    }
    info
}

/// Tri-state flag read: absent -> `None`, explicit `false` honored, a
/// valueless node is implicitly true.
pub(crate) fn read_flag(doc: &XmlDocument, parent: NodeId, name: &XName) -> Option<bool> {
    let node = doc.first_by_name(parent, name)?;
    let value = doc.attribute(node, &W::val()).unwrap_or("true");
    Some(!value.eq_ignore_ascii_case("false") && value != "0")
}

fn read_font_from_rpr(doc: &XmlDocument, rpr: NodeId) -> ParagraphFontInfo {
    let mut info = ParagraphFontInfo::default();

    if let Some(rfonts) = doc.first_by_name(rpr, &W::rFonts()) {
        info.ascii = attr_of(doc, rfonts, &W::ascii());
        info.h_ansi = attr_of(doc, rfonts, &W::hAnsi());
        info.east_asia = attr_of(doc, rfonts, &W::eastAsia());
        info.cs = attr_of(doc, rfonts, &W::cs());

        for (label, font) in [
            ("ascii font", &info.ascii),
            ("hAnsi font", &info.h_ansi),
            ("east-asian font", &info.east_asia),
            ("complex-script font", &info.cs),
        ] {
            if let Some(font) = font {
                info.description.push(format!("{label}: {font}"));
            }
        }
    }

    if let Some(sz) = doc.first_by_name(rpr, &W::sz()) {
        if let Some(value) = attr_of(doc, sz, &W::val()) {
            if let Ok(v) = value.parse::<f64>() {
                info.description
                    .push(format!("font size: {}pt ({value})", half_points_to_points(v)));
            }
            info.size = Some(value);
        }
    }

    info.bold = read_flag(doc, rpr, &W::b());
    info.italic = read_flag(doc, rpr, &W::i());
    info.strike = read_flag(doc, rpr, &W::strike());
    info.caps = read_flag(doc, rpr, &W::caps());
    info.small_caps = read_flag(doc, rpr, &W::smallCaps());

    for (label, flag) in [
        ("bold", info.bold),
        ("italic", info.italic),
        ("strikethrough", info.strike),
        ("all caps", info.caps),
        ("small caps", info.small_caps),
    ] {
        if flag == Some(true) {
            info.description.push(label.to_string());
        }
    }

    if let Some(u) = doc.first_by_name(rpr, &W::u()) {
        let style = attr_of(doc, u, &W::val()).unwrap_or_else(|| "single".to_string());
        info.description.push(format!("underline: {style}"));
        info.underline = Some(style);
    }

    if let Some(color) = doc.first_by_name(rpr, &W::color()) {
        if let Some(value) = attr_of(doc, color, &W::val()) {
            info.description.push(format!("color: {value}"));
            info.color = Some(value);
        }
    }

    if info.description.is_empty() {
        info.description.push("no font attributes set".to_string());
    }
    info
}

fn read_paragraph_font(doc: &XmlDocument, paragraph: NodeId) -> ParagraphFontInfo {
    let rpr = ppr_of(doc, paragraph).and_then(|ppr| doc.first_by_name(ppr, &W::rPr()));
    match rpr {
        Some(rpr) => read_font_from_rpr(doc, rpr),
        None => ParagraphFontInfo {
            description: vec!["no font attributes set".to_string()],
            ..Default::default()
        },
    }
}

const MODELED_PPR_CHILDREN: &[&str] = &[
    "pStyle", "jc", "ind", "spacing", "pBdr", "shd", "numPr", "rPr",
];

impl WmlDocument {
    pub fn paragraph_alignment(&self, index: usize) -> Option<AlignmentInfo> {
        let doc = self.doc()?;
        let node = self.paragraph_node(index)?;
        Some(read_alignment(doc, node))
    }

    pub fn paragraph_indentation(&self, index: usize) -> Option<IndentationInfo> {
        let doc = self.doc()?;
        let node = self.paragraph_node(index)?;
        Some(read_indentation(doc, node))
    }

    pub fn paragraph_spacing(&self, index: usize) -> Option<SpacingInfo> {
        let doc = self.doc()?;
        let node = self.paragraph_node(index)?;
        Some(read_spacing(doc, node))
    }

    pub fn paragraph_borders(&self, index: usize) -> Option<ParagraphBordersInfo> {
        let doc = self.doc()?;
        let node = self.paragraph_node(index)?;
        Some(read_borders(doc, node))
    }

    pub fn paragraph_shading(&self, index: usize) -> Option<ShadingInfo> {
        let doc = self.doc()?;
        let node = self.paragraph_node(index)?;
        Some(read_shading(doc, node))
    }

    pub fn paragraph_numbering(&self, index: usize) -> Option<NumberingInfo> {
        let doc = self.doc()?;
        let node = self.paragraph_node(index)?;
        Some(read_numbering(doc, node))
    }

    pub fn paragraph_font(&self, index: usize) -> Option<ParagraphFontInfo> {
        let doc = self.doc()?;
        let node = self.paragraph_node(index)?;
        Some(read_paragraph_font(doc, node))
    }

    /// Every style group of one paragraph, in a single pass.
    pub fn paragraph_style(&self, index: usize) -> Option<ParagraphStyleInfo> {
        let doc = self.doc()?;
        let node = self.paragraph_node(index)?;

        let mut info = ParagraphStyleInfo {
            alignment: read_alignment(doc, node),
            indentation: read_indentation(doc, node),
            spacing: read_spacing(doc, node),
            borders: read_borders(doc, node),
            shading: read_shading(doc, node),
            numbering: read_numbering(doc, node),
            font: read_paragraph_font(doc, node),
            ..Default::default()
        };

        if let Some(ppr) = ppr_of(doc, node) {
            info.present = true;
            info.style_id = doc
                .first_by_name(ppr, &W::pStyle())
                .and_then(|n| attr_of(doc, n, &W::val()));

            for child in doc.children(ppr) {
                let Some(data) = doc.get(child) else { continue };
                let Some(name) = data.name() else { continue };
                if MODELED_PPR_CHILDREN.contains(&name.local_name.as_str()) {
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
        }

        Some(info)
    }

    pub fn set_paragraph_style_id(&mut self, index: usize, style_id: &str) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let ppr = locate_or_create_first(doc, node, &W::pPr());
        let pstyle = locate_or_create(doc, ppr, &W::pStyle());
        doc.set_attribute(pstyle, &W::val(), style_id);
        true
    }

    /// `alignment` is one of the `w:jc` keywords (left, right, center,
    /// both, distribute, ...). Stored verbatim.
    pub fn set_paragraph_alignment(&mut self, index: usize, alignment: &str) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let ppr = locate_or_create_first(doc, node, &W::pPr());
        let jc = locate_or_create(doc, ppr, &W::jc());
        doc.set_attribute(jc, &W::val(), alignment);
        true
    }

    /// Values are stored verbatim, already in twentieths of a point.
    pub fn set_paragraph_indentation(
        &mut self,
        index: usize,
        indentation: &IndentationProperties,
    ) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let ppr = locate_or_create_first(doc, node, &W::pPr());
        let ind = locate_or_create(doc, ppr, &W::ind());
        for (attr, value) in [
            (W::left(), indentation.left),
            (W::right(), indentation.right),
            (W::firstLine(), indentation.first_line),
            (W::hanging(), indentation.hanging),
        ] {
            if let Some(value) = value {
                doc.set_attribute(ind, &attr, &value.to_string());
            }
        }
        true
    }

    /// Values are stored verbatim, already in twentieths of a point; the
    /// rule decides how `line` reads back.
    pub fn set_paragraph_spacing(&mut self, index: usize, spacing: &SpacingProperties) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let ppr = locate_or_create_first(doc, node, &W::pPr());
        let spacing_node = locate_or_create(doc, ppr, &W::spacing());
        for (attr, value) in [
            (W::before(), spacing.before),
            (W::after(), spacing.after),
            (W::line(), spacing.line),
        ] {
            if let Some(value) = value {
                doc.set_attribute(spacing_node, &attr, &value.to_string());
            }
        }
        if let Some(rule) = &spacing.line_rule {
            doc.set_attribute(spacing_node, &W::lineRule(), rule);
        }
        true
    }

    pub fn set_paragraph_borders(
        &mut self,
        index: usize,
        borders: &ParagraphBorderProperties,
    ) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let ppr = locate_or_create_first(doc, node, &W::pPr());
        let pbdr = locate_or_create(doc, ppr, &W::pBdr());

        for (edge_name, edge) in [
            (W::top(), &borders.top),
            (W::bottom(), &borders.bottom),
            (W::left(), &borders.left),
            (W::right(), &borders.right),
        ] {
            let Some(edge) = edge else { continue };
            let edge_node = locate_or_create(doc, pbdr, &edge_name);
            if let Some(val) = &edge.val {
                doc.set_attribute(edge_node, &W::val(), val);
            }
            if let Some(size) = edge.size {
                doc.set_attribute(edge_node, &W::sz(), &size.to_string());
            }
            if let Some(space) = edge.space {
                doc.set_attribute(edge_node, &W::space(), &space.to_string());
            }
            if let Some(color) = &edge.color {
                doc.set_attribute(edge_node, &W::color(), color);
            }
        }
        true
    }

    pub fn set_paragraph_shading(&mut self, index: usize, shading: &ShadingProperties) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let ppr = locate_or_create_first(doc, node, &W::pPr());
        let shd = locate_or_create(doc, ppr, &W::shd());
        if let Some(val) = &shading.val {
            doc.set_attribute(shd, &W::val(), val);
        }
        if let Some(color) = &shading.color {
            doc.set_attribute(shd, &W::color(), color);
        }
        if let Some(fill) = &shading.fill {
            doc.set_attribute(shd, &W::fill(), fill);
        }
        true
    }

    pub fn set_paragraph_numbering(
        &mut self,
        index: usize,
        numbering: &NumberingProperties,
    ) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let ppr = locate_or_create_first(doc, node, &W::pPr());
        let numpr = locate_or_create(doc, ppr, &W::numPr());
        if let Some(id) = numbering.num_id {
            let num_id = locate_or_create(doc, numpr, &W::numId());
            doc.set_attribute(num_id, &W::val(), &id.to_string());
        }
        if let Some(level) = numbering.level {
            let ilvl = locate_or_create(doc, numpr, &W::ilvl());
            doc.set_attribute(ilvl, &W::val(), &level.to_string());
        }
        true
    }

    /// Character formatting on the paragraph mark (`w:pPr/w:rPr`).
    pub fn set_paragraph_font(&mut self, index: usize, font: &FontProperties) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let ppr = locate_or_create_first(doc, node, &W::pPr());
        let rpr = locate_or_create(doc, ppr, &W::rPr());
        apply_font_properties(doc, rpr, font);
        true
    }

    /// Apply every group present in `properties`; reports whether all of
    /// them applied.
    pub fn update_paragraph_style(&mut self, index: usize, properties: &ParagraphProperties) -> bool {
        if self.paragraph_node(index).is_none() {
            return false;
        }

        let mut success = true;
        if let Some(style_id) = &properties.style_id {
            success &= self.set_paragraph_style_id(index, style_id);
        }
        if let Some(alignment) = &properties.alignment {
            success &= self.set_paragraph_alignment(index, alignment);
        }
        if let Some(indentation) = &properties.indentation {
            success &= self.set_paragraph_indentation(index, indentation);
        }
        if let Some(spacing) = &properties.spacing {
            success &= self.set_paragraph_spacing(index, spacing);
        }
        if let Some(borders) = &properties.borders {
            success &= self.set_paragraph_borders(index, borders);
        }
        if let Some(shading) = &properties.shading {
            success &= self.set_paragraph_shading(index, shading);
        }
        if let Some(numbering) = &properties.numbering {
            success &= self.set_paragraph_numbering(index, numbering);
        }
        if let Some(font) = &properties.font {
            success &= self.set_paragraph_font(index, font);
        }
        success
    }

    /// Remove a direct pPr child by local name (`"jc"`, `"spacing"`,
    /// `"rPr"`, ...). `false` when the paragraph has no properties node or
    /// no such child.
    pub fn remove_paragraph_property(&mut self, index: usize, property_name: &str) -> bool {
        let Some(node) = self.paragraph_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let Some(ppr) = ppr_of(doc, node) else {
            return false;
        };

        let target = doc
            .children(ppr)
            .find(|&child| {
                doc.name(child)
                    .map(|n| n.matches(W::NS, property_name))
                    .unwrap_or(false)
            });
        match target {
            Some(target) => {
                doc.remove(target);
                true
            }
            None => {
                warn!(property_name, "paragraph property not present");
                false
            }
        }
    }
}
