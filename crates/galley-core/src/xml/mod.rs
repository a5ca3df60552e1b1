pub mod arena;
pub mod builder;
pub mod compare;
pub mod namespaces;
pub mod node;
pub mod parser;
pub mod xname;

pub use arena::XmlDocument;
pub use compare::nodes_equal;
pub use node::XmlNodeData;
pub use xname::{XAttribute, XName};
