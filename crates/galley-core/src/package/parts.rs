use crate::xml::XmlDocument;

/// Content of a catch-all package part: XML entries are parsed so edits and
/// re-serialization stay uniform, anything else is carried byte-for-byte.
#[derive(Debug)]
pub enum PartContent {
    Xml(XmlDocument),
    Binary(Vec<u8>),
}

impl PartContent {
    pub fn is_xml(&self) -> bool {
        matches!(self, PartContent::Xml(_))
    }

    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match self {
            PartContent::Xml(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_xml_mut(&mut self) -> Option<&mut XmlDocument> {
        match self {
            PartContent::Xml(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            PartContent::Binary(data) => Some(data),
            _ => None,
        }
    }
}
