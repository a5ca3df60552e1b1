use indextree::NodeId;

use crate::error::{GalleyError, Result};
use crate::xml::namespaces::{W, W14};
use crate::xml::{XmlDocument, XName};

/// Classification of a direct body child by its tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Paragraph,
    Table,
    Section,
    BookmarkStart,
    BookmarkEnd,
    Other,
}

impl ElementKind {
    fn classify(name: &XName) -> Self {
        if name.namespace.as_deref() != Some(W::NS) {
            return ElementKind::Other;
        }
        match name.local_name.as_str() {
            "p" => ElementKind::Paragraph,
            "tbl" => ElementKind::Table,
            "sectPr" => ElementKind::Section,
            "bookmarkStart" => ElementKind::BookmarkStart,
            "bookmarkEnd" => ElementKind::BookmarkEnd,
            _ => ElementKind::Other,
        }
    }
}

/// One direct child of the document body. A view, never a copy: `node` is a
/// handle into the document tree, and `position` is the child's ordinal
/// among the body's children at the time the index was built.
#[derive(Clone, Debug)]
pub struct BodyElement {
    pub position: usize,
    pub tag: XName,
    pub short_tag: String,
    pub kind: ElementKind,
    /// `w14:paraId` revision-tracking id, when the paragraph carries one.
    pub para_id: Option<String>,
    pub node: NodeId,
}

/// Parallel views over the body's direct children. Positions and node
/// handles go stale on any structural body mutation, so the whole index is
/// rebuilt wholesale rather than patched.
#[derive(Debug)]
pub struct BodyIndex {
    body: NodeId,
    pub elements: Vec<BodyElement>,
    pub paragraphs: Vec<BodyElement>,
    pub tables: Vec<BodyElement>,
    pub sections: Vec<BodyElement>,
}

impl BodyIndex {
    pub fn build(doc: &XmlDocument) -> Result<Self> {
        let body = find_body(doc).ok_or_else(|| GalleyError::InvalidPackage {
            message: "document has no w:body element".to_string(),
        })?;

        let mut index = Self {
            body,
            elements: Vec::new(),
            paragraphs: Vec::new(),
            tables: Vec::new(),
            sections: Vec::new(),
        };
        index.rebuild(doc);
        Ok(index)
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Replace all four lists with a single forward pass over the body's
    /// direct children, in document order.
    pub fn rebuild(&mut self, doc: &XmlDocument) {
        self.elements.clear();
        self.paragraphs.clear();
        self.tables.clear();
        self.sections.clear();

        let children: Vec<NodeId> = doc.children(self.body).collect();
        let mut position = 0;
        for node in children {
            let Some(name) = doc.name(node).cloned() else {
                // text/comment nodes between block elements carry no tag
                continue;
            };

            let kind = ElementKind::classify(&name);
            let para_id = match kind {
                ElementKind::Paragraph => doc.attribute(node, &W14::paraId()).map(String::from),
                _ => None,
            };

            let entry = BodyElement {
                position,
                short_tag: name.local_name.clone(),
                tag: name,
                kind,
                para_id,
                node,
            };

            match kind {
                ElementKind::Paragraph => self.paragraphs.push(entry.clone()),
                ElementKind::Table => self.tables.push(entry.clone()),
                ElementKind::Section => self.sections.push(entry.clone()),
                _ => {}
            }
            self.elements.push(entry);
            position += 1;
        }
    }
}

pub fn find_body(doc: &XmlDocument) -> Option<NodeId> {
    let root = doc.root()?;
    doc.descendant_by_name(root, &W::body())
}
