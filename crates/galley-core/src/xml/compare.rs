use super::arena::XmlDocument;
use super::node::XmlNodeData;
use indextree::NodeId;

/// Recursive structural equality: same tag, same attributes, same (trimmed)
/// text, recursively equal children in order. Node identity cannot be
/// trusted after an index rebuild, so freshly inserted content is relocated
/// by matching on structure instead.
pub fn nodes_equal(doc: &XmlDocument, a: NodeId, b: NodeId) -> bool {
    if a == b {
        return true;
    }

    let (Some(da), Some(db)) = (doc.get(a), doc.get(b)) else {
        return false;
    };

    match (da, db) {
        (
            XmlNodeData::Element {
                name: name_a,
                attributes: attrs_a,
            },
            XmlNodeData::Element {
                name: name_b,
                attributes: attrs_b,
            },
        ) => {
            if name_a != name_b || attrs_a != attrs_b {
                return false;
            }
            let children_a: Vec<_> = doc.children(a).collect();
            let children_b: Vec<_> = doc.children(b).collect();
            if children_a.len() != children_b.len() {
                return false;
            }
            children_a
                .iter()
                .zip(children_b.iter())
                .all(|(&ca, &cb)| nodes_equal(doc, ca, cb))
        }
        (XmlNodeData::Text(ta), XmlNodeData::Text(tb))
        | (XmlNodeData::CData(ta), XmlNodeData::CData(tb)) => ta.trim() == tb.trim(),
        (XmlNodeData::Comment(ca), XmlNodeData::Comment(cb)) => ca == cb,
        (
            XmlNodeData::ProcessingInstruction {
                target: ta,
                data: da,
            },
            XmlNodeData::ProcessingInstruction {
                target: tb,
                data: db,
            },
        ) => ta == tb && da == db,
        _ => false,
    }
}
