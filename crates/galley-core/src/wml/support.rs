//! Small locate-or-create helpers shared by the style writers. Style
//! containers are lazily materialized: reads never create them, writes
//! create the chain down to the node being set.

use indextree::NodeId;

use crate::xml::{XmlDocument, XmlNodeData, XName};

/// First direct child with the given name, created (appended) if missing.
pub fn locate_or_create(doc: &mut XmlDocument, parent: NodeId, name: &XName) -> NodeId {
    match doc.first_by_name(parent, name) {
        Some(node) => node,
        None => doc.add_child(parent, XmlNodeData::element(name.clone())),
    }
}

/// Like `locate_or_create`, but a newly created node is prepended. `w:pPr`
/// and `w:rPr` are schema-required to be the first child of their parent.
pub fn locate_or_create_first(doc: &mut XmlDocument, parent: NodeId, name: &XName) -> NodeId {
    match doc.first_by_name(parent, name) {
        Some(node) => node,
        None => doc.add_first_child(parent, XmlNodeData::element(name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::namespaces::W;

    #[test]
    fn locate_or_create_is_idempotent() {
        let mut doc = XmlDocument::new();
        let para = doc.add_root(XmlNodeData::element(W::p()));

        let first = locate_or_create(&mut doc, para, &W::pPr());
        let second = locate_or_create(&mut doc, para, &W::pPr());
        assert_eq!(first, second);
        assert_eq!(doc.children(para).count(), 1);
    }

    #[test]
    fn created_property_container_lands_first() {
        let mut doc = XmlDocument::new();
        let para = doc.add_root(XmlNodeData::element(W::p()));
        doc.add_child(para, XmlNodeData::element(W::r()));

        let ppr = locate_or_create_first(&mut doc, para, &W::pPr());
        assert_eq!(doc.children(para).next(), Some(ppr));
    }
}
