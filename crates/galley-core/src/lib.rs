pub mod error;
pub mod package;
pub mod units;
pub mod wml;
pub mod xml;

pub use error::{GalleyError, Result};

pub use package::{DocxPackage, Relationship, RelationshipTable};
pub use wml::{FontProperties, ParagraphProperties, Position, WmlDocument};
