use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use indextree::{Arena, NodeId};

/// A mutable XML tree backed by an indextree arena. Node handles (`NodeId`)
/// stay valid across mutations elsewhere in the tree, which is what lets the
/// structural index hold views into the document body without copying nodes.
#[derive(Debug)]
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena.get(id).map(|node| node.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlNodeData> {
        self.arena.get_mut(id).map(|node| node.get_mut())
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    /// Prepend a child. Property containers (`w:pPr`, `w:rPr`) must be the
    /// first child of their parent element.
    pub fn add_first_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.prepend(child, &mut self.arena);
        child
    }

    pub fn add_before(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_before(new_node, &mut self.arena);
        new_node
    }

    pub fn add_after(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_after(new_node, &mut self.arena);
        new_node
    }

    pub fn remove(&mut self, node: NodeId) {
        node.remove(&mut self.arena);
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &XName, value: &str) {
        if let Some(node_data) = self.get_mut(node) {
            if let Some(attrs) = node_data.attributes_mut() {
                if let Some(attr) = attrs.iter_mut().find(|a| &a.name == name) {
                    attr.value = value.to_string();
                } else {
                    attrs.push(XAttribute::new(name.clone(), value));
                }
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &XName) {
        if let Some(node_data) = self.get_mut(node) {
            if let Some(attrs) = node_data.attributes_mut() {
                attrs.retain(|a| &a.name != name);
            }
        }
    }

    pub fn attribute(&self, node: NodeId, name: &XName) -> Option<&str> {
        self.get(node)?.attribute(name)
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.ancestors(&self.arena)
    }

    pub fn name(&self, node: NodeId) -> Option<&XName> {
        self.get(node)?.name()
    }

    /// Direct children with the given qualified name, in document order.
    pub fn elements_by_name<'a>(
        &'a self,
        parent: NodeId,
        name: &'a XName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent).filter(move |&child_id| {
            self.get(child_id)
                .and_then(|data| data.name())
                .map(|n| n == name)
                .unwrap_or(false)
        })
    }

    /// First direct child with the given qualified name.
    pub fn first_by_name(&self, parent: NodeId, name: &XName) -> Option<NodeId> {
        self.elements_by_name(parent, name).next()
    }

    /// All descendants (excluding `node` itself) with the given name.
    pub fn descendants_by_name<'a>(
        &'a self,
        node: NodeId,
        name: &'a XName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(node).skip(1).filter(move |&id| {
            self.get(id)
                .and_then(|data| data.name())
                .map(|n| n == name)
                .unwrap_or(false)
        })
    }

    pub fn descendant_by_name(&self, node: NodeId, name: &XName) -> Option<NodeId> {
        self.descendants_by_name(node, name).next()
    }

    /// Concatenated text of the element's direct text children.
    pub fn element_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            if let Some(text) = self.get(child).and_then(|d| d.text_content()) {
                out.push_str(text);
            }
        }
        out
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}
