//! End-to-end scenarios across the package codec, the structural index and
//! the style engine, including full save/reopen cycles through the
//! filesystem.

use std::io::Write;

use galley_core::wml::{Apply, Position, SpacingProperties};
use galley_core::{DocxPackage, FontProperties, ParagraphProperties, WmlDocument};

const MAIN_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml">
<w:body>
<w:p w14:paraId="00000010"><w:r><w:t>Introduction</w:t></w:r></w:p>
<w:tbl>
  <w:tr><w:tc><w:p><w:r><w:t>name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>value</w:t></w:r></w:p></w:tc></w:tr>
  <w:tr><w:tc><w:p><w:r><w:t>alpha</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>1</w:t></w:r></w:p></w:tc></w:tr>
</w:tbl>
<w:p w14:paraId="00000020"><w:r><w:t>Conclusion</w:t></w:r></w:p>
<w:sectPr/>
</w:body>
</w:document>"#;

fn fixture_docx() -> Vec<u8> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options = zip::write::SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#).unwrap();

        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(MAIN_XML).unwrap();

        zip.start_file("word/_rels/document.xml.rels", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/existing.png"/>
</Relationships>"#).unwrap();

        zip.start_file("word/media/existing.png", options).unwrap();
        zip.write_all(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0xAA]).unwrap();

        zip.start_file("word/styles.xml", options).unwrap();
        zip.write_all(br#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#).unwrap();

        zip.finish().unwrap();
    }
    buffer.into_inner()
}

#[test]
fn round_trip_preserves_content_and_media() {
    let original = WmlDocument::from_bytes(&fixture_docx()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.docx");
    original.save(&path).unwrap();

    let reopened = WmlDocument::open(&path).unwrap();

    // binary parts byte-equivalent
    assert_eq!(
        reopened.package().media("existing.png"),
        original.package().media("existing.png")
    );
    // XML parts semantically equivalent: same structure, same text
    assert_eq!(reopened.element_count(), original.element_count());
    assert_eq!(reopened.paragraph_count(), original.paragraph_count());
    assert_eq!(reopened.table_count(), original.table_count());
    assert_eq!(reopened.all_paragraph_texts(), original.all_paragraph_texts());
    assert_eq!(reopened.table_cells(0), original.table_cells(0));
    assert_eq!(
        reopened.paragraph_by_id("00000010").map(|p| p.position),
        Some(0)
    );
}

#[test]
fn index_counts_match_body_children() {
    let doc = WmlDocument::from_bytes(&fixture_docx()).unwrap();

    assert_eq!(doc.element_count(), 4);
    assert_eq!(doc.paragraph_count(), 2);
    assert_eq!(doc.table_count(), 1);
    assert_eq!(doc.sections().len(), 1);
    // direct w:p body children equal the paragraph index size
    let body_paragraphs = doc
        .elements()
        .iter()
        .filter(|e| e.short_tag == "p")
        .count();
    assert_eq!(body_paragraphs, doc.paragraph_count());
}

#[test]
fn paragraph_style_round_trip_survives_save() {
    let mut doc = WmlDocument::from_bytes(&fixture_docx()).unwrap();

    assert!(doc.set_paragraph_alignment(0, "center"));
    assert!(doc.set_paragraph_spacing(
        0,
        &SpacingProperties {
            before: Some(400),
            after: Some(400),
            line: Some(600),
            line_rule: Some("auto".to_string()),
        }
    ));
    assert!(doc.set_runs_style(
        0,
        &FontProperties {
            size: Apply::Set(28),
            bold: Some(true),
            ..Default::default()
        }
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("styled.docx");
    doc.save(&path).unwrap();
    let reopened = WmlDocument::open(&path).unwrap();

    let alignment = reopened.paragraph_alignment(0).unwrap();
    assert_eq!(alignment.alignment.as_deref(), Some("center"));
    assert_eq!(alignment.description, "centered");

    let spacing = reopened.paragraph_spacing(0).unwrap();
    assert_eq!(spacing.before_points(), Some(20.0));
    assert_eq!(spacing.after_points(), Some(20.0));
    assert_eq!(spacing.line_percent(), Some(250.0));

    let run = reopened.run_style(0, 0).unwrap();
    assert_eq!(run.size_points(), Some(14.0));
    assert_eq!(run.bold, Some(true));
}

#[test]
fn out_of_range_access_returns_sentinels_and_keeps_state() {
    let mut doc = WmlDocument::from_bytes(&fixture_docx()).unwrap();
    let count = doc.paragraph_count();

    assert!(doc.paragraph_alignment(count).is_none());
    assert!(doc.paragraph_spacing(count).is_none());
    assert!(!doc.set_paragraph_alignment(count, "center"));
    assert!(!doc.set_runs_bold(count, true));
    assert!(doc.run_style(count, 0).is_none());
    assert!(doc.table_style(7).is_none());
    assert!(doc
        .insert_paragraph(99, Position::After, "x", &ParagraphProperties::default())
        .is_none());

    // the index is unchanged after every failed call
    assert_eq!(doc.paragraph_count(), count);
    assert_eq!(doc.element_count(), 4);
}

#[test]
fn inserted_paragraph_survives_save_and_rebuild() {
    let mut doc = WmlDocument::from_bytes(&fixture_docx()).unwrap();

    let index = doc
        .insert_paragraph(
            -1,
            Position::Before,
            "Appendix",
            &ParagraphProperties {
                alignment: Some("center".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(doc.paragraph_count(), 3);
    // fresh revision id minted past the existing ones
    assert_eq!(doc.paragraphs()[index].para_id.as_deref(), Some("00000021"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inserted.docx");
    doc.save(&path).unwrap();
    let reopened = WmlDocument::open(&path).unwrap();

    assert_eq!(reopened.paragraph_count(), 3);
    assert_eq!(reopened.paragraph_text(index), "Appendix");
    assert_eq!(
        reopened.paragraph_alignment(index).unwrap().alignment.as_deref(),
        Some("center")
    );
}

#[test]
fn image_insertion_coordinates_all_three_stores() {
    let dir = tempfile::tempdir().unwrap();
    let png_path = dir.path().join("figure.png");
    image::RgbaImage::new(200, 100).save(&png_path).unwrap();
    let png_bytes = std::fs::read(&png_path).unwrap();

    let mut doc = WmlDocument::from_bytes(&fixture_docx()).unwrap();
    let rel_id = doc
        .insert_image(-2, -1, Position::After, &png_path, None, None, Some("figure"))
        .unwrap();

    // relationship-media consistency
    let (media_name, media_bytes) = doc.package().resolve_image(&rel_id).unwrap();
    assert_eq!(media_bytes, png_bytes.as_slice());
    let media_name = media_name.to_string();

    // and it all survives a save/reopen cycle
    let path = dir.path().join("with-image.docx");
    doc.save(&path).unwrap();
    let reopened = WmlDocument::open(&path).unwrap();

    let (name, bytes) = reopened.package().resolve_image(&rel_id).unwrap();
    assert_eq!(name, media_name);
    assert_eq!(bytes, png_bytes.as_slice());

    // the drawing run references the minted id; extent is 200x100 px at 96 DPI
    let contents = reopened.element_run_contents(2);
    let drawing = contents.iter().find(|c| c.has_drawing).unwrap();
    assert_eq!(drawing.drawing_relationship.as_deref(), Some(rel_id.as_str()));

    let extents = reopened.find_by_tag("wp:extent");
    assert_eq!(extents.len(), 1);
}

#[test]
fn package_level_open_tolerates_broken_auxiliary_parts() {
    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(MAIN_XML).unwrap();
        zip.start_file("word/numbering.xml", options).unwrap();
        zip.write_all(b"<w:numbering xmlns:w='x'><unclosed>").unwrap();
        zip.finish().unwrap();
    }
    let bytes = buffer.into_inner();

    let package = DocxPackage::from_bytes(&bytes).unwrap();
    assert!(package.numbering.is_none());

    // the document itself still loads and indexes
    let doc = WmlDocument::from_package(package).unwrap();
    assert_eq!(doc.paragraph_count(), 2);
}
