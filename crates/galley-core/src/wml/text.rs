use indextree::NodeId;
use tracing::warn;

use super::document::WmlDocument;
use super::index::ElementKind;
use crate::xml::namespaces::{A, R, W, WP};
use crate::xml::XmlDocument;

/// What one run contains besides plain text (original drawing/symbol/tab
/// probes used when scanning runs for insertion targets).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunContent {
    pub text: String,
    pub has_drawing: bool,
    pub drawing_name: Option<String>,
    pub drawing_description: Option<String>,
    pub drawing_relationship: Option<String>,
    pub has_symbol: bool,
    pub symbol_font: Option<String>,
    pub symbol_char: Option<String>,
    pub has_tab: bool,
}

/// Concatenated text of every `w:t` leaf below `node`, in document order.
/// A missing text node contributes the empty string, never an error.
pub(crate) fn text_below(doc: &XmlDocument, node: NodeId) -> String {
    let mut out = String::new();
    for t in doc.descendants_by_name(node, &W::t()) {
        out.push_str(&doc.element_text(t));
    }
    out
}

/// Direct `w:r` children of a paragraph, in document order.
pub(crate) fn runs_of(doc: &XmlDocument, paragraph: NodeId) -> Vec<NodeId> {
    doc.elements_by_name(paragraph, &W::r()).collect()
}

impl WmlDocument {
    /// Text of paragraph `index` in the paragraph-only index.
    pub fn paragraph_text(&self, index: usize) -> String {
        let (Some(doc), Some(node)) = (self.doc(), self.paragraph_node(index)) else {
            return String::new();
        };
        text_below(doc, node)
    }

    /// Text of element `index` in the all-elements index: paragraph text,
    /// formatted table content, or empty for anything else.
    pub fn element_text(&self, index: usize) -> String {
        let Some(doc) = self.doc() else {
            return String::new();
        };
        let Some(entry) = self.elements().get(index) else {
            warn!(index, count = self.elements().len(), "element index out of range");
            return String::new();
        };

        match entry.kind {
            ElementKind::Paragraph => text_below(doc, entry.node),
            ElementKind::Table => table_text(doc, entry.node),
            _ => String::new(),
        }
    }

    /// Every `w:t` in the document body.
    pub fn all_text(&self) -> String {
        let Some(doc) = self.doc() else {
            return String::new();
        };
        text_below(doc, self.index.body())
    }

    pub fn all_paragraph_texts(&self) -> Vec<String> {
        let Some(doc) = self.doc() else {
            return Vec::new();
        };
        self.paragraphs()
            .iter()
            .map(|p| text_below(doc, p.node))
            .collect()
    }

    /// Per-run text of paragraph `index`.
    pub fn paragraph_run_texts(&self, index: usize) -> Vec<String> {
        let (Some(doc), Some(node)) = (self.doc(), self.paragraph_node(index)) else {
            return Vec::new();
        };
        runs_of(doc, node)
            .into_iter()
            .map(|r| text_below(doc, r))
            .collect()
    }

    /// Per-run text of element `index`.
    pub fn element_run_texts(&self, index: usize) -> Vec<String> {
        let (Some(doc), Some(node)) = (self.doc(), self.element_node(index)) else {
            return Vec::new();
        };
        runs_of(doc, node)
            .into_iter()
            .map(|r| text_below(doc, r))
            .collect()
    }

    pub fn run_count(&self, paragraph_index: usize) -> usize {
        let (Some(doc), Some(node)) = (self.doc(), self.paragraph_node(paragraph_index)) else {
            return 0;
        };
        runs_of(doc, node).len()
    }

    pub fn run_text(&self, paragraph_index: usize, run_index: usize) -> Option<String> {
        let (Some(doc), Some(node)) = (self.doc(), self.paragraph_node(paragraph_index)) else {
            return None;
        };
        let runs = runs_of(doc, node);
        match runs.get(run_index) {
            Some(&run) => Some(text_below(doc, run)),
            None => {
                warn!(run_index, count = runs.len(), "run index out of range");
                None
            }
        }
    }

    /// Per-run content probes for element `index`: text plus drawing,
    /// symbol and tab markers.
    pub fn element_run_contents(&self, index: usize) -> Vec<RunContent> {
        let (Some(doc), Some(node)) = (self.doc(), self.element_node(index)) else {
            return Vec::new();
        };

        runs_of(doc, node)
            .into_iter()
            .map(|run| {
                let mut content = RunContent {
                    text: text_below(doc, run),
                    ..Default::default()
                };

                if let Some(drawing) = doc.first_by_name(run, &W::drawing()) {
                    content.has_drawing = true;
                    if let Some(doc_pr) = doc.descendant_by_name(drawing, &WP::docPr()) {
                        content.drawing_name = doc
                            .attribute(doc_pr, &crate::xml::XName::local("name"))
                            .map(String::from);
                        content.drawing_description = doc
                            .attribute(doc_pr, &crate::xml::XName::local("descr"))
                            .map(String::from);
                    }
                    if let Some(blip) = doc.descendant_by_name(drawing, &A::blip()) {
                        content.drawing_relationship =
                            doc.attribute(blip, &R::embed()).map(String::from);
                    }
                }

                if let Some(sym) = doc.first_by_name(run, &W::sym()) {
                    content.has_symbol = true;
                    content.symbol_font = doc.attribute(sym, &W::font()).map(String::from);
                    content.symbol_char = doc.attribute(sym, &W::char_()).map(String::from);
                }

                content.has_tab = doc.first_by_name(run, &W::tab()).is_some();
                content
            })
            .collect()
    }

    /// Row-major cell text for table `index` in the table-only index: one
    /// string per cell, multi-paragraph cells joined by newline. This is the
    /// 2D array handed to the external tabular exporter.
    pub fn table_cells(&self, index: usize) -> Vec<Vec<String>> {
        let (Some(doc), Some(table)) = (self.doc(), self.table_node(index)) else {
            return Vec::new();
        };

        doc.descendants_by_name(table, &W::tr())
            .map(|row| {
                doc.descendants_by_name(row, &W::tc())
                    .map(|cell| {
                        let mut cell_text = String::new();
                        for para in doc.descendants_by_name(cell, &W::p()) {
                            let p_text = text_below(doc, para);
                            if !cell_text.is_empty() && !p_text.is_empty() {
                                cell_text.push('\n');
                            }
                            cell_text.push_str(&p_text);
                        }
                        cell_text
                    })
                    .collect()
            })
            .collect()
    }
}

/// Human-oriented table rendering: cells joined with ` | `, rows with
/// newlines, blank paragraphs skipped.
pub(crate) fn table_text(doc: &XmlDocument, table: NodeId) -> String {
    let rows: Vec<String> = doc
        .descendants_by_name(table, &W::tr())
        .map(|row| {
            let cells: Vec<String> = doc
                .descendants_by_name(row, &W::tc())
                .map(|cell| {
                    doc.descendants_by_name(cell, &W::p())
                        .map(|p| text_below(doc, p))
                        .filter(|t| !t.trim().is_empty())
                        .collect::<Vec<_>>()
                        .join("")
                })
                .collect();
            cells.join(" | ")
        })
        .collect();
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAIN: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>World</w:t></w:r></w:p>
<w:tbl>
  <w:tr>
    <w:tc><w:p><w:r><w:t>a1</w:t></w:r></w:p><w:p><w:r><w:t>a2</w:t></w:r></w:p></w:tc>
    <w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc>
  </w:tr>
  <w:tr>
    <w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc>
    <w:tc><w:p/></w:tc>
  </w:tr>
</w:tbl>
</w:body>
</w:document>"#;

    #[test]
    fn paragraph_text_joins_runs_in_order() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert_eq!(doc.paragraph_text(0), "Hello World");
        assert_eq!(doc.paragraph_run_texts(0), vec!["Hello ", "World"]);
    }

    #[test]
    fn element_text_formats_tables() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert_eq!(doc.element_text(0), "Hello World");
        assert_eq!(doc.element_text(1), "a1a2 | b\nc | ");
    }

    #[test]
    fn table_cells_are_row_major_with_newline_joins() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let cells = doc.table_cells(0);
        assert_eq!(
            cells,
            vec![
                vec!["a1\na2".to_string(), "b".to_string()],
                vec!["c".to_string(), "".to_string()],
            ]
        );
    }

    #[test]
    fn run_access_reports_out_of_range() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert_eq!(doc.run_count(0), 2);
        assert_eq!(doc.run_text(0, 1).as_deref(), Some("World"));
        assert_eq!(doc.run_text(0, 5), None);
        assert_eq!(doc.run_count(99), 0);
        assert!(doc.paragraph_text(99).is_empty());
    }

    #[test]
    fn all_text_covers_the_body() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert_eq!(doc.all_text(), "Hello Worlda1a2bc");
    }
}
