//! Table-level style access. Width and indent carry a sibling `type`
//! attribute that decides the unit: `pct` values are fiftieths of a
//! percent, `dxa` values twentieths of a point.

use indextree::NodeId;

use super::document::WmlDocument;
use super::paragraph::BorderEdgeInfo;
use super::support::{locate_or_create, locate_or_create_first};
use crate::units::{fiftieths_to_percent, twentieths_to_points};
use crate::wml::properties::TableBorderProperties;
use crate::xml::namespaces::W;
use crate::xml::{XmlDocument, XName};

/// A table measurement plus its `type` discriminator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasureInfo {
    pub value: Option<String>,
    pub kind: Option<String>,
}

impl MeasureInfo {
    fn numeric(&self) -> Option<f64> {
        self.value.as_ref()?.parse().ok()
    }

    /// Points, for `dxa`-typed (or untyped) measurements.
    pub fn points(&self) -> Option<f64> {
        if self.kind.as_deref() == Some("pct") {
            None
        } else {
            self.numeric().map(twentieths_to_points)
        }
    }

    /// Percent, for `pct`-typed measurements (stored in fiftieths).
    pub fn percent(&self) -> Option<f64> {
        if self.kind.as_deref() == Some("pct") {
            self.numeric().map(fiftieths_to_percent)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableBordersInfo {
    pub top: Option<BorderEdgeInfo>,
    pub bottom: Option<BorderEdgeInfo>,
    pub left: Option<BorderEdgeInfo>,
    pub right: Option<BorderEdgeInfo>,
    pub inside_h: Option<BorderEdgeInfo>,
    pub inside_v: Option<BorderEdgeInfo>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellMarginsInfo {
    pub top: Option<MeasureInfo>,
    pub bottom: Option<MeasureInfo>,
    pub left: Option<MeasureInfo>,
    pub right: Option<MeasureInfo>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableStyleInfo {
    pub style_id: Option<String>,
    pub width: MeasureInfo,
    pub indent: MeasureInfo,
    pub borders: TableBordersInfo,
    /// `autofit` or `fixed`.
    pub layout: Option<String>,
    pub cell_margins: CellMarginsInfo,
    /// Column widths from `w:tblGrid`, twentieths of a point, as stored.
    pub grid: Vec<String>,
    pub rows: usize,
    pub columns: usize,
    pub description: Vec<String>,
}

fn read_measure(doc: &XmlDocument, parent: NodeId, name: &XName) -> MeasureInfo {
    match doc.first_by_name(parent, name) {
        Some(node) => MeasureInfo {
            value: doc.attribute(node, &W::w()).map(String::from),
            kind: doc.attribute(node, &W::type_()).map(String::from),
        },
        None => MeasureInfo::default(),
    }
}

fn read_border_edge(doc: &XmlDocument, parent: NodeId, edge: &XName) -> Option<BorderEdgeInfo> {
    let node = doc.first_by_name(parent, edge)?;
    Some(BorderEdgeInfo {
        val: doc.attribute(node, &W::val()).map(String::from),
        size: doc.attribute(node, &W::sz()).map(String::from),
        space: doc.attribute(node, &W::space()).map(String::from),
        color: doc.attribute(node, &W::color()).map(String::from),
    })
}

fn describe_measure(info: &MeasureInfo) -> Option<String> {
    if let Some(percent) = info.percent() {
        Some(format!("{percent:.1}%"))
    } else {
        info.points().map(|points| format!("{points:.1}pt"))
    }
}

impl WmlDocument {
    /// Full style and shape information for table `index` in the
    /// table-only index.
    pub fn table_style(&self, index: usize) -> Option<TableStyleInfo> {
        let doc = self.doc()?;
        let table = self.table_node(index)?;

        let mut info = TableStyleInfo::default();

        if let Some(tblpr) = doc.first_by_name(table, &W::tblPr()) {
            info.style_id = doc
                .first_by_name(tblpr, &W::tblStyle())
                .and_then(|n| doc.attribute(n, &W::val()))
                .map(String::from);
            info.width = read_measure(doc, tblpr, &W::tblW());
            info.indent = read_measure(doc, tblpr, &W::tblInd());

            if let Some(borders) = doc.first_by_name(tblpr, &W::tblBorders()) {
                info.borders = TableBordersInfo {
                    top: read_border_edge(doc, borders, &W::top()),
                    bottom: read_border_edge(doc, borders, &W::bottom()),
                    left: read_border_edge(doc, borders, &W::left()),
                    right: read_border_edge(doc, borders, &W::right()),
                    inside_h: read_border_edge(doc, borders, &W::insideH()),
                    inside_v: read_border_edge(doc, borders, &W::insideV()),
                };
            }

            info.layout = doc
                .first_by_name(tblpr, &W::tblLayout())
                .and_then(|n| doc.attribute(n, &W::type_()))
                .map(String::from);

            if let Some(margins) = doc.first_by_name(tblpr, &W::tblCellMar()) {
                info.cell_margins = CellMarginsInfo {
                    top: doc
                        .first_by_name(margins, &W::top())
                        .map(|_| read_measure(doc, margins, &W::top())),
                    bottom: doc
                        .first_by_name(margins, &W::bottom())
                        .map(|_| read_measure(doc, margins, &W::bottom())),
                    left: doc
                        .first_by_name(margins, &W::left())
                        .map(|_| read_measure(doc, margins, &W::left())),
                    right: doc
                        .first_by_name(margins, &W::right())
                        .map(|_| read_measure(doc, margins, &W::right())),
                };
            }
        }

        if let Some(grid) = doc.first_by_name(table, &W::tblGrid()) {
            info.grid = doc
                .elements_by_name(grid, &W::gridCol())
                .filter_map(|col| doc.attribute(col, &W::w()).map(String::from))
                .collect();
            info.columns = info.grid.len();
        }
        info.rows = doc.descendants_by_name(table, &W::tr()).count();

        info.description
            .push(format!("table size: {} rows x {} columns", info.rows, info.columns));
        if let Some(width) = describe_measure(&info.width) {
            info.description.push(format!("width: {width}"));
        }
        if let Some(indent) = describe_measure(&info.indent) {
            info.description.push(format!("indent: {indent}"));
        }
        if let Some(layout) = &info.layout {
            info.description.push(format!("layout: {layout}"));
        }
        for (label, edge) in [
            ("top border", &info.borders.top),
            ("bottom border", &info.borders.bottom),
            ("left border", &info.borders.left),
            ("right border", &info.borders.right),
            ("inside horizontal border", &info.borders.inside_h),
            ("inside vertical border", &info.borders.inside_v),
        ] {
            if let Some(edge) = edge {
                let mut parts = Vec::new();
                if let Some(val) = &edge.val {
                    parts.push(val.clone());
                }
                if let Some(points) = edge.size_points() {
                    parts.push(format!("{points:.1}pt"));
                }
                if let Some(color) = &edge.color {
                    parts.push(color.clone());
                }
                info.description
                    .push(format!("{label}: {}", parts.join(" ")));
            }
        }

        Some(info)
    }

    /// Set table width; `kind` is the OOXML `type` keyword (`dxa`, `pct`,
    /// `auto`). The value is stored verbatim in the unit the type implies.
    pub fn set_table_width(&mut self, index: usize, value: i64, kind: &str) -> bool {
        let Some(table) = self.table_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let tblpr = locate_or_create_first(doc, table, &W::tblPr());
        let tblw = locate_or_create(doc, tblpr, &W::tblW());
        doc.set_attribute(tblw, &W::w(), &value.to_string());
        doc.set_attribute(tblw, &W::type_(), kind);
        true
    }

    pub fn set_table_borders(&mut self, index: usize, borders: &TableBorderProperties) -> bool {
        let Some(table) = self.table_node(index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };
        let tblpr = locate_or_create_first(doc, table, &W::tblPr());
        let container = locate_or_create(doc, tblpr, &W::tblBorders());

        for (edge_name, edge) in [
            (W::top(), &borders.top),
            (W::bottom(), &borders.bottom),
            (W::left(), &borders.left),
            (W::right(), &borders.right),
            (W::insideH(), &borders.inside_h),
            (W::insideV(), &borders.inside_v),
        ] {
            let Some(edge) = edge else { continue };
            let edge_node = locate_or_create(doc, container, &edge_name);
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
}
