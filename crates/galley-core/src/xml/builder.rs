use super::arena::XmlDocument;
use super::namespaces;
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{GalleyError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::io::Cursor;

pub fn serialize(doc: &XmlDocument) -> Result<String> {
    let bytes = serialize_bytes(doc)?;
    String::from_utf8(bytes).map_err(|e| GalleyError::XmlWrite(e.to_string()))
}

/// Serialize with the explicit UTF-8 standalone declaration. Word requires
/// the declaration line on every XML part, even where a serializer would
/// normally omit it.
pub fn serialize_bytes(doc: &XmlDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(|e| GalleyError::XmlWrite(e.to_string()))?;

    if let Some(root_id) = doc.root() {
        let namespace_map = NamespaceMap::new();
        write_node(doc, root_id, &mut writer, &namespace_map)?;
    }

    Ok(writer.into_inner().into_inner())
}

/// Maps namespace URI to the prefix declared for it in the current scope.
/// An empty prefix is the default namespace.
type NamespaceMap = HashMap<String, String>;

fn is_xmlns_attr(attr: &XAttribute) -> bool {
    (attr.name.namespace.is_none() && attr.name.local_name == "xmlns")
        || attr.name.namespace.as_deref() == Some(namespaces::XMLNS::NS)
}

fn extend_namespace_map(namespace_map: &mut NamespaceMap, attributes: &[XAttribute]) {
    for attr in attributes {
        let Some(ns) = &attr.name.namespace else {
            if attr.name.local_name == "xmlns" {
                namespace_map
                    .entry(attr.value.clone())
                    .or_insert_with(String::new);
            }
            continue;
        };

        if ns == namespaces::XMLNS::NS {
            namespace_map
                .entry(attr.value.clone())
                .or_insert_with(|| attr.name.local_name.clone());
        }
    }
}

fn fallback_prefix(namespace: &str) -> &'static str {
    namespaces::prefix_for_uri(namespace).unwrap_or("ns")
}

fn prefix_for_namespace<'a>(namespace: &str, namespace_map: &'a NamespaceMap) -> &'a str {
    if let Some(prefix) = namespace_map.get(namespace) {
        return prefix.as_str();
    }
    fallback_prefix(namespace)
}

fn prefix_for_attribute<'a>(namespace: &str, namespace_map: &'a NamespaceMap) -> &'a str {
    if namespace == namespaces::XMLNS::NS {
        return "xmlns";
    }

    if let Some(prefix) = namespace_map.get(namespace) {
        if !prefix.is_empty() {
            return prefix.as_str();
        }
    }
    fallback_prefix(namespace)
}

fn write_node<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            write_element_with_attrs(doc, node_id, name, attributes, writer, namespace_map)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| GalleyError::XmlWrite(e.to_string()))?;
        }
        XmlNodeData::CData(text) => {
            writer
                .write_event(Event::CData(quick_xml::events::BytesCData::new(text)))
                .map_err(|e| GalleyError::XmlWrite(e.to_string()))?;
        }
        XmlNodeData::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::new(text)))
                .map_err(|e| GalleyError::XmlWrite(e.to_string()))?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let pi_content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(quick_xml::events::BytesPI::new(&pi_content)))
                .map_err(|e| GalleyError::XmlWrite(e.to_string()))?;
        }
    }

    Ok(())
}

/// True when the namespace needs an explicit `xmlns:` declaration before it
/// can be used in this scope. The `xml:` and `xmlns:` namespaces are always
/// implicitly declared.
fn needs_declaration(namespace: &str, scoped_map: &NamespaceMap) -> bool {
    namespace != namespaces::XMLNS::NS
        && namespace != namespaces::XML::NS
        && !scoped_map.contains_key(namespace)
}

fn write_element_with_attrs<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let mut scoped_map = namespace_map.clone();
    extend_namespace_map(&mut scoped_map, attributes);

    // Generated subtrees (drawing markup) may use namespaces the source
    // document never declared; declare them here so the output stays
    // well-formed instead of leaking an unbound prefix.
    let mut attributes = attributes.to_vec();
    let declare = |ns: &str, scoped_map: &mut NamespaceMap, attrs: &mut Vec<XAttribute>| {
        if needs_declaration(ns, scoped_map) {
            let prefix = fallback_prefix(ns);
            attrs.push(XAttribute::new(
                XName::new(namespaces::XMLNS::NS, prefix),
                ns,
            ));
            scoped_map.insert(ns.to_string(), prefix.to_string());
        }
    };

    if let Some(ns) = &name.namespace {
        declare(ns, &mut scoped_map, &mut attributes);
    }
    for attr in attributes.clone() {
        if let Some(ns) = &attr.name.namespace {
            declare(ns, &mut scoped_map, &mut attributes);
        }
    }

    let tag_name = if let Some(ns) = &name.namespace {
        let prefix = prefix_for_namespace(ns, &scoped_map);
        if prefix.is_empty() {
            name.local_name.clone()
        } else {
            format!("{}:{}", prefix, &name.local_name)
        }
    } else {
        name.local_name.clone()
    };

    let mut elem = BytesStart::new(&tag_name);

    for attr in &attributes {
        let attr_name = if let Some(ns) = &attr.name.namespace {
            let prefix = prefix_for_attribute(ns, &scoped_map);
            if prefix.is_empty() {
                attr.name.local_name.clone()
            } else {
                format!("{}:{}", prefix, &attr.name.local_name)
            }
        } else {
            attr.name.local_name.clone()
        };
        elem.push_attribute((attr_name.as_str(), attr.value.as_str()));
    }

    let children: Vec<_> = doc.children(node_id).collect();

    if children.is_empty() {
        writer
            .write_event(Event::Empty(elem))
            .map_err(|e| GalleyError::XmlWrite(e.to_string()))?;
    } else {
        writer
            .write_event(Event::Start(elem))
            .map_err(|e| GalleyError::XmlWrite(e.to_string()))?;

        for child_id in children {
            write_node(doc, child_id, writer, &scoped_map)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(&tag_name)))
            .map_err(|e| GalleyError::XmlWrite(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::namespaces::{A, W};
    use crate::xml::parser::parse;

    #[test]
    fn serialize_simple_document() {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element(XName::local("root")));
        doc.add_child(root, XmlNodeData::text("content"));

        let xml = serialize(&doc).unwrap();
        assert!(xml.contains("<root>content</root>"));
    }

    #[test]
    fn serialize_emits_standalone_declaration() {
        let mut doc = XmlDocument::new();
        doc.add_root(XmlNodeData::element(XName::local("empty")));

        let xml = serialize(&doc).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains("<empty/>"));
    }

    #[test]
    fn declared_prefixes_survive_roundtrip() {
        let source = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#;
        let doc = parse(source).unwrap();
        let xml = serialize(&doc).unwrap();
        assert!(xml.contains("<w:document"));
        assert!(xml.contains("<w:p/>"));
    }

    #[test]
    fn undeclared_namespace_gets_declared_at_use_site() {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element(W::p()));
        doc.add_child(root, XmlNodeData::element(A::blip()));

        let xml = serialize(&doc).unwrap();
        assert!(xml.contains(r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#));
        assert!(xml.contains(r#"<a:blip xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"/>"#));
    }
}
