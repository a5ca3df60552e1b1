use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::xml::namespaces::RELS;
use crate::xml::{XAttribute, XmlDocument, XmlNodeData, XName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    #[serde(default)]
    pub target_mode: TargetMode,
}

impl Relationship {
    pub fn new(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::Internal,
        }
    }

    pub fn external(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::External,
        }
    }
}

pub mod relationship_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// The id -> (type, target) table from `word/_rels/document.xml.rels`.
/// Content XML references resources by relationship id; the table joins
/// those ids to media-store entries (three tables joined by key lookups,
/// no object graph).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipTable {
    relationships: Vec<Relationship>,
}

impl RelationshipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every `Relationship` element from a parsed `.rels` part.
    /// Matching is by local name so documents that qualify the elements
    /// differently still load.
    pub fn from_xml(doc: &XmlDocument) -> Self {
        let mut relationships = Vec::new();
        let Some(root) = doc.root() else {
            return Self { relationships };
        };

        for node in doc.descendants(root) {
            let Some(data) = doc.get(node) else { continue };
            let Some(name) = data.name() else { continue };
            if name.local_name != "Relationship" {
                continue;
            }

            let attr = |local: &str| {
                data.attributes()
                    .and_then(|attrs| {
                        attrs
                            .iter()
                            .find(|a| a.name.local_name == local)
                            .map(|a| a.value.clone())
                    })
            };

            let (Some(id), Some(rel_type), Some(target)) =
                (attr("Id"), attr("Type"), attr("Target"))
            else {
                warn!("relationship entry missing Id/Type/Target; skipping");
                continue;
            };

            let target_mode = match attr("TargetMode").as_deref() {
                Some("External") => TargetMode::External,
                _ => TargetMode::Internal,
            };

            relationships.push(Relationship {
                id,
                rel_type,
                target,
                target_mode,
            });
        }

        Self { relationships }
    }

    /// Serialize back to the `.rels` document, entries in table order.
    pub fn to_xml(&self) -> XmlDocument {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element_with_attrs(
            RELS::Relationships(),
            vec![XAttribute::new(XName::local("xmlns"), RELS::NS)],
        ));

        for rel in &self.relationships {
            let mut attrs = vec![
                XAttribute::new(XName::local("Id"), &rel.id),
                XAttribute::new(XName::local("Type"), &rel.rel_type),
                XAttribute::new(XName::local("Target"), &rel.target),
            ];
            if rel.target_mode == TargetMode::External {
                attrs.push(XAttribute::new(XName::local("TargetMode"), "External"));
            }
            doc.add_child(
                root,
                XmlNodeData::element_with_attrs(RELS::Relationship(), attrs),
            );
        }

        doc
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    pub fn add(&mut self, rel: Relationship) {
        self.relationships.push(rel);
    }

    /// Next free `rId{n}` identifier. Monotonic over the existing numeric
    /// suffixes, so rapid successive registrations cannot collide the way
    /// timestamp-derived ids can.
    pub fn next_id(&self) -> String {
        let max = self
            .relationships
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId"))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Mint an image relationship pointing at `media/{media_name}` and
    /// return its id. The media store itself is the caller's to update.
    pub fn register_image(&mut self, media_name: &str) -> String {
        let id = self.next_id();
        self.add(Relationship::new(
            &id,
            relationship_types::IMAGE,
            &format!("media/{media_name}"),
        ));
        id
    }

    /// Normalize a relationship target into a media-store key: strip a
    /// leading separator (a target not already under the media directory is
    /// document-relative) and keep the final path component.
    pub fn media_key(target: &str) -> &str {
        let target = target.trim_start_matches('/');
        target.rsplit('/').next().unwrap_or(target)
    }
}
