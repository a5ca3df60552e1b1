//! Relationship-linked image insertion. A successful insert coordinates
//! three stores: the drawing run in the content XML, a freshly minted
//! relationship entry, and the bytes in the media store. The returned
//! relationship id resolves back to exactly the inserted bytes.

use std::collections::BTreeMap;
use std::path::Path;

use indextree::NodeId;
use tracing::{debug, warn};

use super::document::WmlDocument;
use super::insert::Position;
use super::text::runs_of;
use crate::units::{cm_to_emu, pixels_to_emu};
use crate::xml::namespaces::{A, PIC, R, W, WP};
use crate::xml::{XmlDocument, XName, XmlNodeData};

/// Pick `image{n}.{ext}` with `n` one past the highest numeric suffix
/// already present, so inserted media never collides with existing entries.
fn next_media_name(media: &BTreeMap<String, Vec<u8>>, extension: &str) -> String {
    let max = media
        .keys()
        .filter_map(|name| {
            let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
            stem.strip_prefix("image")
                .and_then(|suffix| suffix.trim_start_matches('_').parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0);
    format!("image{}.{extension}", max + 1)
}

/// Next free numeric id for `wp:docPr`; Word requires drawing ids to be
/// unique within the document.
fn next_drawing_id(doc: &XmlDocument) -> u64 {
    let Some(root) = doc.root() else { return 1 };
    doc.descendants_by_name(root, &WP::docPr())
        .filter_map(|n| doc.attribute(n, &XName::local("id")))
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// Build the inline drawing subtree under a new `w:r`: extent, non-visual
/// properties, blip fill referencing the relationship id, and shape
/// geometry.
fn build_drawing_run(
    doc: &mut XmlDocument,
    new_run: NodeId,
    relationship_id: &str,
    media_name: &str,
    drawing_id: u64,
    width_emu: i64,
    height_emu: i64,
    description: Option<&str>,
) {
    let drawing = doc.add_child(new_run, XmlNodeData::element(W::drawing()));
    let inline = doc.add_child(drawing, XmlNodeData::element(WP::inline()));

    let extent = doc.add_child(inline, XmlNodeData::element(WP::extent()));
    doc.set_attribute(extent, &XName::local("cx"), &width_emu.to_string());
    doc.set_attribute(extent, &XName::local("cy"), &height_emu.to_string());

    let effect_extent = doc.add_child(inline, XmlNodeData::element(WP::effectExtent()));
    for edge in ["l", "t", "r", "b"] {
        doc.set_attribute(effect_extent, &XName::local(edge), "0");
    }

    let doc_pr = doc.add_child(inline, XmlNodeData::element(WP::docPr()));
    doc.set_attribute(doc_pr, &XName::local("id"), &drawing_id.to_string());
    doc.set_attribute(doc_pr, &XName::local("name"), media_name);
    if let Some(description) = description {
        doc.set_attribute(doc_pr, &XName::local("descr"), description);
    }

    let graphic = doc.add_child(inline, XmlNodeData::element(A::graphic()));
    let graphic_data = doc.add_child(graphic, XmlNodeData::element(A::graphicData()));
    doc.set_attribute(graphic_data, &XName::local("uri"), PIC::NS);

    let pic = doc.add_child(graphic_data, XmlNodeData::element(PIC::pic()));

    let nv_pic_pr = doc.add_child(pic, XmlNodeData::element(PIC::nvPicPr()));
    let c_nv_pr = doc.add_child(nv_pic_pr, XmlNodeData::element(PIC::cNvPr()));
    doc.set_attribute(c_nv_pr, &XName::local("id"), "0");
    doc.set_attribute(c_nv_pr, &XName::local("name"), media_name);
    if let Some(description) = description {
        doc.set_attribute(c_nv_pr, &XName::local("descr"), description);
    }
    doc.add_child(nv_pic_pr, XmlNodeData::element(PIC::cNvPicPr()));

    let blip_fill = doc.add_child(pic, XmlNodeData::element(PIC::blipFill()));
    let blip = doc.add_child(blip_fill, XmlNodeData::element(A::blip()));
    doc.set_attribute(blip, &R::embed(), relationship_id);
    doc.add_child(blip_fill, XmlNodeData::element(A::srcRect()));
    let stretch = doc.add_child(blip_fill, XmlNodeData::element(A::stretch()));
    doc.add_child(stretch, XmlNodeData::element(A::fillRect()));

    let sp_pr = doc.add_child(pic, XmlNodeData::element(PIC::spPr()));
    let xfrm = doc.add_child(sp_pr, XmlNodeData::element(A::xfrm()));
    let off = doc.add_child(xfrm, XmlNodeData::element(A::off()));
    doc.set_attribute(off, &XName::local("x"), "0");
    doc.set_attribute(off, &XName::local("y"), "0");
    let ext = doc.add_child(xfrm, XmlNodeData::element(A::ext()));
    doc.set_attribute(ext, &XName::local("cx"), &width_emu.to_string());
    doc.set_attribute(ext, &XName::local("cy"), &height_emu.to_string());
    let prst_geom = doc.add_child(sp_pr, XmlNodeData::element(A::prstGeom()));
    doc.set_attribute(prst_geom, &XName::local("prst"), "rect");
    doc.add_child(prst_geom, XmlNodeData::element(A::avLst()));
}

impl WmlDocument {
    /// Insert an image file as an inline drawing run.
    ///
    /// `paragraph_index` addresses the target paragraph (paragraph-index or
    /// element-index, negative end-relative), `run_index` the run to insert
    /// next to (negative end-relative, clamped). Explicit sizes are in
    /// centimeters; without them the image's pixel dimensions are taken at
    /// 96 DPI. Returns the minted relationship id, or `None` when the
    /// source file is unreadable or the target cannot be resolved.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image(
        &mut self,
        paragraph_index: isize,
        run_index: isize,
        position: Position,
        image_path: impl AsRef<Path>,
        width_cm: Option<f64>,
        height_cm: Option<f64>,
        description: Option<&str>,
    ) -> Option<String> {
        let image_path = image_path.as_ref();

        let (pixel_width, pixel_height) = match image::image_dimensions(image_path) {
            Ok(dimensions) => dimensions,
            Err(e) => {
                warn!(path = %image_path.display(), error = %e, "cannot read image dimensions");
                return None;
            }
        };
        let bytes = match std::fs::read(image_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %image_path.display(), error = %e, "cannot read image file");
                return None;
            }
        };

        let width_emu = width_cm.map(cm_to_emu).unwrap_or_else(|| pixels_to_emu(pixel_width));
        let height_emu = height_cm
            .map(cm_to_emu)
            .unwrap_or_else(|| pixels_to_emu(pixel_height));

        let paragraph = self.resolve_paragraph(paragraph_index)?;

        let extension = image_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "png".to_string());
        let media_name = next_media_name(&self.package.media, &extension);

        let relationship_id = {
            let Some(relationships) = self.package.relationships.as_mut() else {
                warn!("package has no relationship part; cannot register image");
                return None;
            };
            relationships.register_image(&media_name)
        };
        self.package.media.insert(media_name.clone(), bytes);

        let Some(doc) = self.package.document.as_mut() else {
            return None;
        };
        let drawing_id = next_drawing_id(doc);

        // resolve the target run; a run-less paragraph gets one created
        let runs = runs_of(doc, paragraph);
        let (target_run, position) = if runs.is_empty() {
            (doc.add_child(paragraph, XmlNodeData::element(W::r())), position)
        } else {
            let mut index = if run_index < 0 {
                (runs.len() as isize + run_index).max(0) as usize
            } else {
                run_index as usize
            };
            let mut position = position;
            if index >= runs.len() {
                index = runs.len() - 1;
                position = Position::After;
            }
            (runs[index], position)
        };

        let new_run = match position {
            Position::Before => doc.add_before(target_run, XmlNodeData::element(W::r())),
            Position::After => doc.add_after(target_run, XmlNodeData::element(W::r())),
        };
        build_drawing_run(
            doc,
            new_run,
            &relationship_id,
            &media_name,
            drawing_id,
            width_emu,
            height_emu,
            description,
        );

        debug!(
            relationship_id = %relationship_id,
            media_name = %media_name,
            width_emu,
            height_emu,
            "inserted inline image"
        );
        Some(relationship_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::relationship_types;
    use pretty_assertions::assert_eq;

    const MAIN: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>caption</w:t></w:r></w:p>
<w:p><w:r><w:t>tail</w:t></w:r></w:p>
</w:body>
</w:document>"#;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        image::RgbaImage::new(width, height).save(&path).unwrap();
        path
    }

    #[test]
    fn insert_image_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let png = write_png(tmp.path(), "photo.png", 200, 100);

        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let rel_id = doc
            .insert_image(-1, -1, Position::After, &png, None, None, Some("a photo"))
            .unwrap();

        // the relationship resolves to exactly the inserted bytes
        let expected = std::fs::read(&png).unwrap();
        let (name, bytes) = doc.package().resolve_image(&rel_id).unwrap();
        assert_eq!(name, "image1.png");
        assert_eq!(bytes, expected.as_slice());

        let rel = doc
            .package()
            .relationships
            .as_ref()
            .unwrap()
            .get(&rel_id)
            .unwrap();
        assert_eq!(rel.rel_type, relationship_types::IMAGE);
        assert_eq!(rel.target, "media/image1.png");

        // the drawing run lands after the target run with the blip
        // referencing the returned id
        let contents = doc.element_run_contents(1);
        assert_eq!(contents.len(), 2);
        assert!(contents[1].has_drawing);
        assert_eq!(contents[1].drawing_relationship.as_deref(), Some(rel_id.as_str()));
        assert_eq!(contents[1].drawing_description.as_deref(), Some("a photo"));
    }

    #[test]
    fn pixel_dimensions_convert_at_96_dpi() {
        let tmp = tempfile::tempdir().unwrap();
        let png = write_png(tmp.path(), "sized.png", 200, 100);

        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        doc.insert_image(0, -1, Position::After, &png, None, None, None)
            .unwrap();

        let xml = doc.doc().unwrap();
        let para = doc.paragraph_node(0).unwrap();
        let extent = xml.descendant_by_name(para, &WP::extent()).unwrap();
        // 200 px * 9525 EMU/px
        assert_eq!(xml.attribute(extent, &XName::local("cx")), Some("1905000"));
        assert_eq!(xml.attribute(extent, &XName::local("cy")), Some("952500"));
    }

    #[test]
    fn explicit_size_overrides_pixels() {
        let tmp = tempfile::tempdir().unwrap();
        let png = write_png(tmp.path(), "explicit.png", 16, 16);

        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        doc.insert_image(0, -1, Position::After, &png, Some(2.0), Some(1.5), None)
            .unwrap();

        let xml = doc.doc().unwrap();
        let para = doc.paragraph_node(0).unwrap();
        let extent = xml.descendant_by_name(para, &WP::extent()).unwrap();
        assert_eq!(xml.attribute(extent, &XName::local("cx")), Some("720000"));
        assert_eq!(xml.attribute(extent, &XName::local("cy")), Some("540000"));
    }

    #[test]
    fn generated_names_and_ids_do_not_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let png = write_png(tmp.path(), "dup.png", 8, 8);

        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        let first = doc
            .insert_image(0, -1, Position::After, &png, None, None, None)
            .unwrap();
        let second = doc
            .insert_image(0, -1, Position::After, &png, None, None, None)
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(doc.package().media_count(), 2);
        assert!(doc.package().media("image1.png").is_some());
        assert!(doc.package().media("image2.png").is_some());

        // distinct drawing ids
        let ids: Vec<String> = doc
            .find_by_tag("wp:docPr")
            .into_iter()
            .filter_map(|n| {
                doc.doc()
                    .unwrap()
                    .attribute(n, &XName::local("id"))
                    .map(String::from)
            })
            .collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn missing_image_file_is_reported_not_fatal() {
        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(doc
            .insert_image(0, -1, Position::After, "/no/such/file.png", None, None, None)
            .is_none());
        // nothing was registered
        assert_eq!(doc.package().media_count(), 0);
        assert!(doc.package().relationships.as_ref().unwrap().is_empty());
    }

    #[test]
    fn invalid_paragraph_target_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let png = write_png(tmp.path(), "img.png", 4, 4);

        let mut doc = WmlDocument::from_main_xml(MAIN).unwrap();
        assert!(doc
            .insert_image(42, -1, Position::After, &png, None, None, None)
            .is_none());
    }
}
