#![allow(non_snake_case)]

//! The fixed namespace table of the WordprocessingML vocabulary. Every
//! qualified-name query and every serialization prefix decision goes through
//! these constants; an unregistered namespace would surface as a failed
//! query or a corrupted prefix on save.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::xname::XName;

pub mod W {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    pub fn document() -> XName { XName::new(NS, "document") }
    pub fn body() -> XName { XName::new(NS, "body") }
    pub fn p() -> XName { XName::new(NS, "p") }
    pub fn r() -> XName { XName::new(NS, "r") }
    pub fn t() -> XName { XName::new(NS, "t") }
    pub fn pPr() -> XName { XName::new(NS, "pPr") }
    pub fn rPr() -> XName { XName::new(NS, "rPr") }
    pub fn pStyle() -> XName { XName::new(NS, "pStyle") }
    pub fn jc() -> XName { XName::new(NS, "jc") }
    pub fn ind() -> XName { XName::new(NS, "ind") }
    pub fn spacing() -> XName { XName::new(NS, "spacing") }
    pub fn pBdr() -> XName { XName::new(NS, "pBdr") }
    pub fn shd() -> XName { XName::new(NS, "shd") }
    pub fn numPr() -> XName { XName::new(NS, "numPr") }
    pub fn ilvl() -> XName { XName::new(NS, "ilvl") }
    pub fn numId() -> XName { XName::new(NS, "numId") }
    pub fn rFonts() -> XName { XName::new(NS, "rFonts") }
    pub fn sz() -> XName { XName::new(NS, "sz") }
    pub fn b() -> XName { XName::new(NS, "b") }
    pub fn i() -> XName { XName::new(NS, "i") }
    pub fn u() -> XName { XName::new(NS, "u") }
    pub fn strike() -> XName { XName::new(NS, "strike") }
    pub fn caps() -> XName { XName::new(NS, "caps") }
    pub fn smallCaps() -> XName { XName::new(NS, "smallCaps") }
    pub fn color() -> XName { XName::new(NS, "color") }
    pub fn highlight() -> XName { XName::new(NS, "highlight") }
    pub fn vertAlign() -> XName { XName::new(NS, "vertAlign") }
    pub fn tbl() -> XName { XName::new(NS, "tbl") }
    pub fn tr() -> XName { XName::new(NS, "tr") }
    pub fn tc() -> XName { XName::new(NS, "tc") }
    pub fn tblPr() -> XName { XName::new(NS, "tblPr") }
    pub fn tblStyle() -> XName { XName::new(NS, "tblStyle") }
    pub fn tblW() -> XName { XName::new(NS, "tblW") }
    pub fn tblInd() -> XName { XName::new(NS, "tblInd") }
    pub fn tblBorders() -> XName { XName::new(NS, "tblBorders") }
    pub fn tblLayout() -> XName { XName::new(NS, "tblLayout") }
    pub fn tblCellMar() -> XName { XName::new(NS, "tblCellMar") }
    pub fn tblGrid() -> XName { XName::new(NS, "tblGrid") }
    pub fn gridCol() -> XName { XName::new(NS, "gridCol") }
    pub fn top() -> XName { XName::new(NS, "top") }
    pub fn bottom() -> XName { XName::new(NS, "bottom") }
    pub fn left() -> XName { XName::new(NS, "left") }
    pub fn right() -> XName { XName::new(NS, "right") }
    pub fn insideH() -> XName { XName::new(NS, "insideH") }
    pub fn insideV() -> XName { XName::new(NS, "insideV") }
    pub fn sectPr() -> XName { XName::new(NS, "sectPr") }
    pub fn bookmarkStart() -> XName { XName::new(NS, "bookmarkStart") }
    pub fn bookmarkEnd() -> XName { XName::new(NS, "bookmarkEnd") }
    pub fn drawing() -> XName { XName::new(NS, "drawing") }
    pub fn sym() -> XName { XName::new(NS, "sym") }
    pub fn tab() -> XName { XName::new(NS, "tab") }
    pub fn br() -> XName { XName::new(NS, "br") }
    pub fn hyperlink() -> XName { XName::new(NS, "hyperlink") }

    // attribute names
    pub fn val() -> XName { XName::new(NS, "val") }
    pub fn w() -> XName { XName::new(NS, "w") }
    pub fn type_() -> XName { XName::new(NS, "type") }
    pub fn space() -> XName { XName::new(NS, "space") }
    pub fn fill() -> XName { XName::new(NS, "fill") }
    pub fn ascii() -> XName { XName::new(NS, "ascii") }
    pub fn hAnsi() -> XName { XName::new(NS, "hAnsi") }
    pub fn eastAsia() -> XName { XName::new(NS, "eastAsia") }
    pub fn cs() -> XName { XName::new(NS, "cs") }
    pub fn before() -> XName { XName::new(NS, "before") }
    pub fn after() -> XName { XName::new(NS, "after") }
    pub fn line() -> XName { XName::new(NS, "line") }
    pub fn lineRule() -> XName { XName::new(NS, "lineRule") }
    pub fn firstLine() -> XName { XName::new(NS, "firstLine") }
    pub fn hanging() -> XName { XName::new(NS, "hanging") }
    pub fn font() -> XName { XName::new(NS, "font") }
    pub fn char_() -> XName { XName::new(NS, "char") }
}

pub mod W14 {
    use super::XName;
    pub const NS: &str = "http://schemas.microsoft.com/office/word/2010/wordml";

    pub fn paraId() -> XName { XName::new(NS, "paraId") }
}

pub mod WP {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";

    pub fn inline() -> XName { XName::new(NS, "inline") }
    pub fn extent() -> XName { XName::new(NS, "extent") }
    pub fn effectExtent() -> XName { XName::new(NS, "effectExtent") }
    pub fn docPr() -> XName { XName::new(NS, "docPr") }
}

pub mod A {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    pub fn graphic() -> XName { XName::new(NS, "graphic") }
    pub fn graphicData() -> XName { XName::new(NS, "graphicData") }
    pub fn blip() -> XName { XName::new(NS, "blip") }
    pub fn srcRect() -> XName { XName::new(NS, "srcRect") }
    pub fn stretch() -> XName { XName::new(NS, "stretch") }
    pub fn fillRect() -> XName { XName::new(NS, "fillRect") }
    pub fn xfrm() -> XName { XName::new(NS, "xfrm") }
    pub fn off() -> XName { XName::new(NS, "off") }
    pub fn ext() -> XName { XName::new(NS, "ext") }
    pub fn prstGeom() -> XName { XName::new(NS, "prstGeom") }
    pub fn avLst() -> XName { XName::new(NS, "avLst") }
}

pub mod PIC {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

    pub fn pic() -> XName { XName::new(NS, "pic") }
    pub fn nvPicPr() -> XName { XName::new(NS, "nvPicPr") }
    pub fn cNvPr() -> XName { XName::new(NS, "cNvPr") }
    pub fn cNvPicPr() -> XName { XName::new(NS, "cNvPicPr") }
    pub fn blipFill() -> XName { XName::new(NS, "blipFill") }
    pub fn spPr() -> XName { XName::new(NS, "spPr") }
}

pub mod R {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    pub fn id() -> XName { XName::new(NS, "id") }
    pub fn embed() -> XName { XName::new(NS, "embed") }
}

pub mod M {
    pub const NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";
}

pub mod MC {
    pub const NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
}

pub mod V {
    pub const NS: &str = "urn:schemas-microsoft-com:vml";
}

pub mod O {
    pub const NS: &str = "urn:schemas-microsoft-com:office:office";
}

pub mod W10 {
    pub const NS: &str = "urn:schemas-microsoft-com:office:word";
}

pub mod W15 {
    pub const NS: &str = "http://schemas.microsoft.com/office/word/2012/wordml";
}

pub mod WPC {
    pub const NS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingCanvas";
}

pub mod WPG {
    pub const NS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingGroup";
}

pub mod WPI {
    pub const NS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingInk";
}

pub mod WNE {
    pub const NS: &str = "http://schemas.microsoft.com/office/word/2006/wordml";
}

pub mod WPS {
    pub const NS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingShape";
}

pub mod WP14 {
    pub const NS: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing";
}

pub mod XML {
    use super::XName;
    pub const NS: &str = "http://www.w3.org/XML/1998/namespace";

    pub fn space() -> XName { XName::new(NS, "space") }
}

pub mod XMLNS {
    pub const NS: &str = "http://www.w3.org/2000/xmlns/";
}

/// Package-relationships vocabulary used by `word/_rels/document.xml.rels`.
pub mod RELS {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

    pub fn Relationships() -> XName { XName::new(NS, "Relationships") }
    pub fn Relationship() -> XName { XName::new(NS, "Relationship") }
}

static PREFIX_TABLE: &[(&str, &str)] = &[
    ("w", W::NS),
    ("w14", W14::NS),
    ("w15", W15::NS),
    ("wp", WP::NS),
    ("wp14", WP14::NS),
    ("wpc", WPC::NS),
    ("wpg", WPG::NS),
    ("wpi", WPI::NS),
    ("wps", WPS::NS),
    ("wne", WNE::NS),
    ("a", A::NS),
    ("pic", PIC::NS),
    ("r", R::NS),
    ("m", M::NS),
    ("mc", MC::NS),
    ("o", O::NS),
    ("v", V::NS),
    ("w10", W10::NS),
    ("xml", XML::NS),
];

static URI_TO_PREFIX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| PREFIX_TABLE.iter().map(|&(p, uri)| (uri, p)).collect());

static PREFIX_TO_URI: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| PREFIX_TABLE.iter().copied().collect());

/// Fallback serialization prefix for a namespace with no in-scope
/// declaration. `None` for namespaces outside the registered table.
pub fn prefix_for_uri(uri: &str) -> Option<&'static str> {
    URI_TO_PREFIX.get(uri).copied()
}

/// Resolve a conventional prefix ("w", "wp", ...) to its namespace URI,
/// used by prefixed-tag queries like `find_by_tag("w:p")`.
pub fn uri_for_prefix(prefix: &str) -> Option<&'static str> {
    PREFIX_TO_URI.get(prefix).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_namespace_creates_valid_xnames() {
        let p = W::p();
        assert_eq!(p.namespace.as_deref(), Some(W::NS));
        assert_eq!(p.local_name, "p");
    }

    #[test]
    fn prefix_lookup_is_bidirectional() {
        assert_eq!(uri_for_prefix("w"), Some(W::NS));
        assert_eq!(prefix_for_uri(W::NS), Some("w"));
        assert_eq!(uri_for_prefix("pic"), Some(PIC::NS));
        assert_eq!(uri_for_prefix("nope"), None);
    }

    #[test]
    fn drawing_namespaces_are_distinct() {
        assert_ne!(WP::NS, WP14::NS);
        assert_ne!(A::NS, PIC::NS);
    }
}
