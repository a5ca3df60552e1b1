use std::io::Write;
use std::path::Path;

use indextree::NodeId;
use tracing::warn;

use super::index::{BodyElement, BodyIndex, ElementKind};
use crate::error::{GalleyError, Result};
use crate::package::{part_paths, DocxPackage};
use crate::xml::{namespaces, XmlDocument, XName};

/// A word-processing document: the decomposed package plus the structural
/// index over the main part's body. All style and content operations hang
/// off this type.
///
/// Exactly one mutator owns a `WmlDocument` at a time; there is no internal
/// locking. The happens-before discipline is: any structural body mutation
/// is followed by an index rebuild before the next index-based read.
#[derive(Debug)]
pub struct WmlDocument {
    pub(crate) package: DocxPackage,
    pub(crate) index: BodyIndex,
}

impl WmlDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(DocxPackage::open(path)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_package(DocxPackage::from_bytes(bytes)?)
    }

    /// The main document part is required for any meaningful operation.
    pub fn from_package(package: DocxPackage) -> Result<Self> {
        let Some(document) = package.document.as_ref() else {
            return Err(GalleyError::MissingPart {
                part_path: part_paths::DOCUMENT.to_string(),
            });
        };
        let index = BodyIndex::build(document)?;
        Ok(Self { package, index })
    }

    /// Build a minimal single-part package around the given main XML
    /// (useful for testing).
    pub fn from_main_xml(main_xml: &[u8]) -> Result<Self> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options)?;
            zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#)?;

            zip.start_file("word/document.xml", options)?;
            zip.write_all(main_xml)?;

            zip.start_file("word/_rels/document.xml.rels", options)?;
            zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#)?;

            zip.finish()?;
        }

        Self::from_bytes(&buffer.into_inner())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.package.save(path)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.to_bytes()
    }

    pub fn package(&self) -> &DocxPackage {
        &self.package
    }

    /// Direct package access. A caller that mutates body structure through
    /// this must call [`rebuild_index`](Self::rebuild_index) before the next
    /// index-based read.
    pub fn package_mut(&mut self) -> &mut DocxPackage {
        &mut self.package
    }

    pub fn rebuild_index(&mut self) {
        if let Some(doc) = self.package.document.as_ref() {
            self.index.rebuild(doc);
        }
    }

    pub fn elements(&self) -> &[BodyElement] {
        &self.index.elements
    }

    pub fn paragraphs(&self) -> &[BodyElement] {
        &self.index.paragraphs
    }

    pub fn tables(&self) -> &[BodyElement] {
        &self.index.tables
    }

    pub fn sections(&self) -> &[BodyElement] {
        &self.index.sections
    }

    pub fn element_count(&self) -> usize {
        self.index.elements.len()
    }

    pub fn paragraph_count(&self) -> usize {
        self.index.paragraphs.len()
    }

    pub fn table_count(&self) -> usize {
        self.index.tables.len()
    }

    pub fn paragraph_by_id(&self, para_id: &str) -> Option<&BodyElement> {
        self.index
            .paragraphs
            .iter()
            .find(|p| p.para_id.as_deref() == Some(para_id))
    }

    /// All descendants of the document root matching a conventionally
    /// prefixed tag such as `"w:p"` or `"wp:docPr"`. An unknown prefix
    /// resolves to nothing and is reported.
    pub fn find_by_tag(&self, prefixed_tag: &str) -> Vec<NodeId> {
        let Some(doc) = self.package.document.as_ref() else {
            return Vec::new();
        };
        let Some(root) = doc.root() else {
            return Vec::new();
        };

        let name = match prefixed_tag.split_once(':') {
            Some((prefix, local)) => match namespaces::uri_for_prefix(prefix) {
                Some(uri) => XName::new(uri, local),
                None => {
                    warn!(prefix, "unknown namespace prefix in tag query");
                    return Vec::new();
                }
            },
            None => XName::local(prefixed_tag),
        };

        doc.descendants_by_name(root, &name).collect()
    }

    /// Resolve a caller-supplied paragraph position to its node. Accepts a
    /// paragraph-index, or an element-index that points at a paragraph;
    /// negative values are end-relative over the element index.
    pub(crate) fn resolve_paragraph(&self, index: isize) -> Option<NodeId> {
        let paragraphs = &self.index.paragraphs;
        let elements = &self.index.elements;

        if index >= 0 {
            let i = index as usize;
            if let Some(entry) = paragraphs.get(i) {
                return Some(entry.node);
            }
            if let Some(entry) = elements.get(i) {
                if entry.kind == ElementKind::Paragraph {
                    return Some(entry.node);
                }
            }
            warn!(index, "index does not name a paragraph");
            return None;
        }

        let i = elements.len() as isize + index;
        if i >= 0 {
            if let Some(entry) = elements.get(i as usize) {
                if entry.kind == ElementKind::Paragraph {
                    return Some(entry.node);
                }
            }
        }
        warn!(index, "negative index does not resolve to a paragraph");
        None
    }

    pub(crate) fn paragraph_node(&self, index: usize) -> Option<NodeId> {
        match self.index.paragraphs.get(index) {
            Some(entry) => Some(entry.node),
            None => {
                warn!(
                    index,
                    count = self.index.paragraphs.len(),
                    "paragraph index out of range"
                );
                None
            }
        }
    }

    pub(crate) fn element_node(&self, index: usize) -> Option<NodeId> {
        match self.index.elements.get(index) {
            Some(entry) => Some(entry.node),
            None => {
                warn!(
                    index,
                    count = self.index.elements.len(),
                    "element index out of range"
                );
                None
            }
        }
    }

    pub(crate) fn table_node(&self, index: usize) -> Option<NodeId> {
        match self.index.tables.get(index) {
            Some(entry) => Some(entry.node),
            None => {
                warn!(
                    index,
                    count = self.index.tables.len(),
                    "table index out of range"
                );
                None
            }
        }
    }

    pub(crate) fn doc(&self) -> Option<&XmlDocument> {
        self.package.document.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml">
<w:body>
<w:p w14:paraId="0000000A"><w:r><w:t>alpha</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p><w:r><w:t>omega</w:t></w:r></w:p>
</w:body>
</w:document>"#;

    #[test]
    fn open_builds_the_index() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert_eq!(doc.element_count(), 3);
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.table_count(), 1);
    }

    #[test]
    fn paragraph_lookup_by_revision_id() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let entry = doc.paragraph_by_id("0000000A").unwrap();
        assert_eq!(entry.position, 0);
        assert!(doc.paragraph_by_id("FFFFFFFF").is_none());
    }

    #[test]
    fn find_by_tag_resolves_prefixes() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();
        // three w:p total: two body children plus one inside the table cell
        assert_eq!(doc.find_by_tag("w:p").len(), 3);
        assert_eq!(doc.find_by_tag("w:tbl").len(), 1);
        assert!(doc.find_by_tag("zz:p").is_empty());
    }

    #[test]
    fn resolve_paragraph_accepts_both_index_spaces() {
        let doc = WmlDocument::from_main_xml(MAIN).unwrap();

        // paragraph-index 1 is the second paragraph
        let by_para = doc.resolve_paragraph(1).unwrap();
        // element-index -1 is the last body child, also that paragraph
        let by_element = doc.resolve_paragraph(-1).unwrap();
        assert_eq!(by_para, by_element);

        // element-index 1 is the table, not a paragraph
        assert!(doc.resolve_paragraph(-2).is_none());
        assert!(doc.resolve_paragraph(99).is_none());
    }

    #[test]
    fn document_part_is_required() {
        let mut buffer = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("word/styles.xml", options).unwrap();
            zip.write_all(b"<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"/>").unwrap();
            zip.finish().unwrap();
        }
        let err = WmlDocument::from_bytes(&buffer.into_inner()).unwrap_err();
        assert!(matches!(err, GalleyError::MissingPart { .. }));
    }
}
