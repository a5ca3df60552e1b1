//! Structural insertion of paragraphs and runs. Anything that changes the
//! body's child list triggers a full index rebuild; the freshly inserted
//! paragraph is then relocated by content-equality scan rather than node
//! identity.

use indextree::NodeId;
use tracing::warn;

use super::document::WmlDocument;
use super::run::apply_font_properties;
use super::text::runs_of;
use crate::wml::properties::{FontProperties, ParagraphProperties};
use crate::xml::namespaces::{W, W14, XML};
use crate::xml::{nodes_equal, XmlDocument, XmlNodeData};

/// Placement of inserted content relative to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}

/// Whitespace that Word would otherwise collapse: leading, trailing or
/// doubled spaces need `xml:space="preserve"` on the text node.
fn needs_space_preserve(text: &str) -> bool {
    text.starts_with(' ') || text.ends_with(' ') || text.contains("  ")
}

pub(crate) fn append_text_node(doc: &mut XmlDocument, run: NodeId, text: &str) {
    let t = doc.add_child(run, XmlNodeData::element(W::t()));
    if needs_space_preserve(text) {
        doc.set_attribute(t, &XML::space(), "preserve");
    }
    doc.add_child(t, XmlNodeData::text(text));
}

fn populate_paragraph_properties(
    doc: &mut XmlDocument,
    paragraph: NodeId,
    properties: &ParagraphProperties,
) {
    let has_ppr_content = properties.style_id.is_some()
        || properties.alignment.is_some()
        || properties.indentation.is_some()
        || properties.spacing.is_some()
        || properties.borders.is_some()
        || properties.shading.is_some()
        || properties.numbering.is_some()
        || properties.font.is_some();
    if !has_ppr_content {
        return;
    }

    let ppr = doc.add_first_child(paragraph, XmlNodeData::element(W::pPr()));

    if let Some(style_id) = &properties.style_id {
        let pstyle = doc.add_child(ppr, XmlNodeData::element(W::pStyle()));
        doc.set_attribute(pstyle, &W::val(), style_id);
    }
    if let Some(alignment) = &properties.alignment {
        let jc = doc.add_child(ppr, XmlNodeData::element(W::jc()));
        doc.set_attribute(jc, &W::val(), alignment);
    }
    if let Some(indentation) = &properties.indentation {
        let ind = doc.add_child(ppr, XmlNodeData::element(W::ind()));
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
    }
    if let Some(spacing) = &properties.spacing {
        let node = doc.add_child(ppr, XmlNodeData::element(W::spacing()));
        for (attr, value) in [
            (W::before(), spacing.before),
            (W::after(), spacing.after),
            (W::line(), spacing.line),
        ] {
            if let Some(value) = value {
                doc.set_attribute(node, &attr, &value.to_string());
            }
        }
        if let Some(rule) = &spacing.line_rule {
            doc.set_attribute(node, &W::lineRule(), rule);
        }
    }
    if let Some(borders) = &properties.borders {
        let pbdr = doc.add_child(ppr, XmlNodeData::element(W::pBdr()));
        for (edge_name, edge) in [
            (W::top(), &borders.top),
            (W::bottom(), &borders.bottom),
            (W::left(), &borders.left),
            (W::right(), &borders.right),
        ] {
            let Some(edge) = edge else { continue };
            let edge_node = doc.add_child(pbdr, XmlNodeData::element(edge_name));
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
    }
    if let Some(shading) = &properties.shading {
        let shd = doc.add_child(ppr, XmlNodeData::element(W::shd()));
        if let Some(val) = &shading.val {
            doc.set_attribute(shd, &W::val(), val);
        }
        if let Some(color) = &shading.color {
            doc.set_attribute(shd, &W::color(), color);
        }
        if let Some(fill) = &shading.fill {
            doc.set_attribute(shd, &W::fill(), fill);
        }
    }
    if let Some(numbering) = &properties.numbering {
        let numpr = doc.add_child(ppr, XmlNodeData::element(W::numPr()));
        if let Some(level) = numbering.level {
            let ilvl = doc.add_child(numpr, XmlNodeData::element(W::ilvl()));
            doc.set_attribute(ilvl, &W::val(), &level.to_string());
        }
        if let Some(id) = numbering.num_id {
            let num_id = doc.add_child(numpr, XmlNodeData::element(W::numId()));
            doc.set_attribute(num_id, &W::val(), &id.to_string());
        }
    }
    if let Some(font) = &properties.font {
        let rpr = doc.add_child(ppr, XmlNodeData::element(W::rPr()));
        apply_font_properties(doc, rpr, font);
    }
}

impl WmlDocument {
    /// Next free `w14:paraId`, monotonic over the ids already present so
    /// rapid successive insertions cannot collide.
    fn next_paragraph_id(&self) -> String {
        let max = self
            .index
            .paragraphs
            .iter()
            .filter_map(|p| p.para_id.as_deref())
            .filter_map(|id| u64::from_str_radix(id, 16).ok())
            .max()
            .unwrap_or(0);
        format!("{:08X}", max + 1)
    }

    /// Insert a new paragraph before or after element `element_index`
    /// (negative counts from the end). Returns the new paragraph's position
    /// in the paragraph-only index, or `None` on failure.
    pub fn insert_paragraph(
        &mut self,
        element_index: isize,
        position: Position,
        text: &str,
        properties: &ParagraphProperties,
    ) -> Option<usize> {
        let element_count = self.index.elements.len();
        let resolved = if element_index < 0 {
            element_count as isize + element_index
        } else {
            element_index
        };
        if resolved < 0 || resolved as usize >= element_count {
            warn!(element_index, element_count, "element index out of range");
            return None;
        }
        let target = self.index.elements[resolved as usize].node;

        let fresh_para_id = self.next_paragraph_id();
        let doc = self.package.document.as_mut()?;

        // carry a revision-tracking id only when the archive uses them
        let target_uses_para_ids = doc.attribute(target, &W14::paraId()).is_some();

        let new_paragraph = match position {
            Position::Before => doc.add_before(target, XmlNodeData::element(W::p())),
            Position::After => doc.add_after(target, XmlNodeData::element(W::p())),
        };
        if target_uses_para_ids {
            doc.set_attribute(new_paragraph, &W14::paraId(), &fresh_para_id);
        }

        populate_paragraph_properties(doc, new_paragraph, properties);

        if !text.is_empty() {
            let run = doc.add_child(new_paragraph, XmlNodeData::element(W::r()));
            if let Some(font) = &properties.font {
                let rpr = doc.add_first_child(run, XmlNodeData::element(W::rPr()));
                apply_font_properties(doc, rpr, font);
            }
            append_text_node(doc, run, text);
        }

        self.rebuild_index();

        let doc = self.package.document.as_ref()?;
        for (i, entry) in self.index.paragraphs.iter().enumerate() {
            if nodes_equal(doc, entry.node, new_paragraph) {
                return Some(i);
            }
        }
        warn!("inserted paragraph not found in rebuilt index");
        None
    }

    /// Insert a new run into a paragraph (addressed by paragraph-index or
    /// element-index, negative end-relative). The run index is clamped into
    /// range; an out-of-range index degrades to inserting at the matching
    /// end, and a paragraph with no runs gets the new run appended.
    pub fn insert_run(
        &mut self,
        paragraph_index: isize,
        run_index: isize,
        position: Position,
        text: &str,
        font: &FontProperties,
    ) -> bool {
        let Some(paragraph) = self.resolve_paragraph(paragraph_index) else {
            return false;
        };
        let Some(doc) = self.package.document.as_mut() else {
            return false;
        };

        let runs = runs_of(doc, paragraph);

        let new_run = if runs.is_empty() {
            doc.add_child(paragraph, XmlNodeData::element(W::r()))
        } else {
            let mut index = if run_index < 0 {
                (runs.len() as isize + run_index).max(0) as usize
            } else {
                run_index as usize
            };
            let mut position = position;
            if index >= runs.len() {
                index = runs.len() - 1;
                position = Position::After;
            }
            let target = runs[index];
            match position {
                Position::Before => doc.add_before(target, XmlNodeData::element(W::r())),
                Position::After => doc.add_after(target, XmlNodeData::element(W::r())),
            }
        };

        if !font.is_empty() {
            let rpr = doc.add_first_child(new_run, XmlNodeData::element(W::rPr()));
            apply_font_properties(doc, rpr, font);
        }
        if !text.is_empty() {
            append_text_node(doc, new_run, text);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wml::properties::{Apply, SpacingProperties};
    use pretty_assertions::assert_eq;

    const MAIN: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml">
<w:body>
<w:p w14:paraId="000000A0"><w:r><w:t>first</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>
<w:p w14:paraId="000000B0"><w:r><w:t>last</w:t></w:r></w:p>
</w:body>
</w:document>"#;

    #[test]
    fn insert_paragraph_at_end() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let index = doc
            .insert_paragraph(-1, Position::After, "appended", &ParagraphProperties::default())
            .unwrap();

        assert_eq!(index, 2);
        assert_eq!(doc.paragraph_count(), 3);
        assert_eq!(doc.element_count(), 4);
        assert_eq!(doc.paragraph_text(2), "appended");
    }

    #[test]
    fn insert_paragraph_before_target_shifts_ordinals() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let index = doc
            .insert_paragraph(0, Position::Before, "prefix", &ParagraphProperties::default())
            .unwrap();

        assert_eq!(index, 0);
        assert_eq!(doc.paragraph_text(0), "prefix");
        assert_eq!(doc.paragraph_text(1), "first");
        // index rebuilt: positions are consistent with body order
        assert_eq!(doc.paragraphs()[1].position, 1);
    }

    #[test]
    fn inserted_paragraph_inherits_revision_id_scheme() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let index = doc
            .insert_paragraph(-1, Position::After, "tracked", &ParagraphProperties::default())
            .unwrap();

        let para_id = doc.paragraphs()[index].para_id.clone().unwrap();
        // monotonic over 000000A0 / 000000B0
        assert_eq!(para_id, "000000B1");
    }

    #[test]
    fn insert_paragraph_with_styles_builds_the_property_chain() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let index = doc
            .insert_paragraph(
                -1,
                Position::After,
                "styled  text",
                &ParagraphProperties {
                    alignment: Some("center".to_string()),
                    spacing: Some(SpacingProperties {
                        before: Some(400),
                        after: Some(400),
                        ..Default::default()
                    }),
                    font: Some(FontProperties {
                        size: Apply::Set(28),
                        bold: Some(true),
                        color: Apply::Set("FF0000".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(doc.paragraph_alignment(index).unwrap().alignment.as_deref(), Some("center"));
        assert_eq!(doc.paragraph_spacing(index).unwrap().before_points(), Some(20.0));
        let run_style = doc.run_style(index, 0).unwrap();
        assert_eq!(run_style.size_points(), Some(14.0));
        assert_eq!(run_style.bold, Some(true));

        // doubled space forces xml:space="preserve"
        let xml = doc.doc().unwrap();
        let para = doc.paragraph_node(index).unwrap();
        let run = runs_of(xml, para)[0];
        let t = xml.first_by_name(run, &W::t()).unwrap();
        assert_eq!(xml.attribute(t, &XML::space()), Some("preserve"));
        assert_eq!(doc.paragraph_text(index), "styled  text");
    }

    #[test]
    fn insert_paragraph_out_of_range_is_reported() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(doc
            .insert_paragraph(99, Position::After, "x", &ParagraphProperties::default())
            .is_none());
        assert!(doc
            .insert_paragraph(-99, Position::After, "x", &ParagraphProperties::default())
            .is_none());
        // failed insert leaves the index intact
        assert_eq!(doc.paragraph_count(), 2);
    }

    #[test]
    fn insert_run_before_and_after() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();

        assert!(doc.insert_run(0, 0, Position::Before, "pre-", &FontProperties::default()));
        assert_eq!(doc.paragraph_run_texts(0), vec!["pre-", "first"]);

        assert!(doc.insert_run(0, -1, Position::After, "-post", &FontProperties::default()));
        assert_eq!(doc.paragraph_run_texts(0), vec!["pre-", "first", "-post"]);
    }

    #[test]
    fn insert_run_clamps_out_of_range_run_index() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(doc.insert_run(0, 42, Position::Before, "tail", &FontProperties::default()));
        assert_eq!(doc.paragraph_run_texts(0), vec!["first", "tail"]);
    }

    #[test]
    fn insert_run_into_empty_paragraph() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let index = doc
            .insert_paragraph(-1, Position::After, "", &ParagraphProperties::default())
            .unwrap();
        assert_eq!(doc.run_count(index), 0);

        assert!(doc.insert_run(
            index as isize,
            -1,
            Position::After,
            "only",
            &FontProperties {
                italic: Some(true),
                ..Default::default()
            }
        ));
        assert_eq!(doc.paragraph_run_texts(index), vec!["only"]);
        assert_eq!(doc.run_style(index, 0).unwrap().italic, Some(true));
    }

    #[test]
    fn insert_run_rejects_non_paragraph_targets() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        // element 1 is the table
        assert!(!doc.insert_run(-2, 0, Position::After, "x", &FontProperties::default()));
    }
}
