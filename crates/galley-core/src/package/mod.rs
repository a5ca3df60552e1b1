pub mod docx;
pub mod parts;
pub mod relationships;

pub use docx::{part_paths, DocxPackage};
pub use parts::PartContent;
pub use relationships::{relationship_types, Relationship, RelationshipTable, TargetMode};
