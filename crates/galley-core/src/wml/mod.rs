mod document;
mod image;
mod index;
mod insert;
mod paragraph;
mod properties;
mod run;
mod support;
mod table;
mod text;

pub use document::WmlDocument;
pub use index::{find_body, BodyElement, BodyIndex, ElementKind};
pub use insert::Position;
pub use paragraph::{
    AlignmentInfo, BorderEdgeInfo, IndentationInfo, NumberingInfo, ParagraphBordersInfo,
    ParagraphFontInfo, ParagraphStyleInfo, ShadingInfo, SpacingInfo,
};
pub use properties::{
    Apply, BorderEdgeProperties, FontProperties, IndentationProperties, NumberingProperties,
    ParagraphBorderProperties, ParagraphProperties, ShadingProperties, SpacingProperties,
    TableBorderProperties,
};
pub use run::{RunSizeInfo, RunStyleInfo};
pub use table::{CellMarginsInfo, MeasureInfo, TableBordersInfo, TableStyleInfo};
pub use text::RunContent;
