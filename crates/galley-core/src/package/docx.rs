use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use super::parts::PartContent;
use super::relationships::RelationshipTable;
use crate::error::Result;
use crate::xml::{builder, parser, XmlDocument};

pub mod part_paths {
    pub const DOCUMENT: &str = "word/document.xml";
    pub const STYLES: &str = "word/styles.xml";
    pub const NUMBERING: &str = "word/numbering.xml";
    pub const FOOTNOTES: &str = "word/footnotes.xml";
    pub const ENDNOTES: &str = "word/endnotes.xml";
    pub const SETTINGS: &str = "word/settings.xml";
    pub const FONT_TABLE: &str = "word/fontTable.xml";
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    pub const HEADER_PREFIX: &str = "word/header";
    pub const FOOTER_PREFIX: &str = "word/footer";
    pub const MEDIA_PREFIX: &str = "word/media/";
    pub const EMBEDDINGS_PREFIX: &str = "word/embeddings/";
}

/// The decomposed in-memory package: every archive entry classified into a
/// named bucket. XML-bearing parts hold parsed trees, binary parts raw
/// bytes, and anything the classifier does not recognize lands in `other`
/// keyed by its original archive path so it round-trips untouched.
///
/// Once opened, the in-memory state is authoritative: `save` serializes
/// whatever the buckets currently hold and never consults the source bytes.
#[derive(Debug, Default)]
pub struct DocxPackage {
    pub document: Option<XmlDocument>,
    pub styles: Option<XmlDocument>,
    pub numbering: Option<XmlDocument>,
    pub footnotes: Option<XmlDocument>,
    pub endnotes: Option<XmlDocument>,
    pub settings: Option<XmlDocument>,
    pub fonts: Option<XmlDocument>,
    pub relationships: Option<RelationshipTable>,
    /// `header1` -> parsed `word/header1.xml`, and so on.
    pub headers: BTreeMap<String, XmlDocument>,
    pub footers: BTreeMap<String, XmlDocument>,
    /// File name under `word/media/` -> raw bytes.
    pub media: BTreeMap<String, Vec<u8>>,
    /// Full archive path -> raw bytes.
    pub embeddings: BTreeMap<String, Vec<u8>>,
    /// Catch-all, keyed by original archive path.
    pub other: BTreeMap<String, PartContent>,
}

impl DocxPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut package = Self::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            package.classify_entry(&name, content);
        }

        Ok(package)
    }

    /// Route one archive entry into its bucket. A part that fails to parse
    /// is dropped with a warning; one malformed part must not block access
    /// to the rest of the document.
    fn classify_entry(&mut self, name: &str, content: Vec<u8>) {
        use part_paths::*;

        match name {
            DOCUMENT => self.document = parse_xml_part(name, &content),
            STYLES => self.styles = parse_xml_part(name, &content),
            NUMBERING => self.numbering = parse_xml_part(name, &content),
            FOOTNOTES => self.footnotes = parse_xml_part(name, &content),
            ENDNOTES => self.endnotes = parse_xml_part(name, &content),
            SETTINGS => self.settings = parse_xml_part(name, &content),
            FONT_TABLE => self.fonts = parse_xml_part(name, &content),
            DOCUMENT_RELS => {
                self.relationships =
                    parse_xml_part(name, &content).map(|doc| RelationshipTable::from_xml(&doc));
            }
            _ if name.starts_with(HEADER_PREFIX) && name.ends_with(".xml") => {
                if let Some(doc) = parse_xml_part(name, &content) {
                    self.headers.insert(part_stem(name), doc);
                }
            }
            _ if name.starts_with(FOOTER_PREFIX) && name.ends_with(".xml") => {
                if let Some(doc) = parse_xml_part(name, &content) {
                    self.footers.insert(part_stem(name), doc);
                }
            }
            _ if name.starts_with(MEDIA_PREFIX) => {
                let media_name = name[MEDIA_PREFIX.len()..].to_string();
                self.media.insert(media_name, content);
            }
            _ if name.starts_with(EMBEDDINGS_PREFIX) => {
                self.embeddings.insert(name.to_string(), content);
            }
            _ if name.ends_with(".xml") || name.ends_with(".rels") => {
                if let Some(doc) = parse_xml_part(name, &content) {
                    self.other.insert(name.to_string(), PartContent::Xml(doc));
                }
            }
            _ => {
                self.other
                    .insert(name.to_string(), PartContent::Binary(content));
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Recompose the archive from the current buckets. Absent parts are
    /// omitted, never fabricated; every XML part starts with the UTF-8
    /// standalone declaration.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        use part_paths::*;

        let mut zip = ZipWriter::new(writer);

        write_xml_part(&mut zip, DOCUMENT, self.document.as_ref())?;
        write_xml_part(&mut zip, STYLES, self.styles.as_ref())?;
        if let Some(rels) = &self.relationships {
            write_xml_part(&mut zip, DOCUMENT_RELS, Some(&rels.to_xml()))?;
        }
        write_xml_part(&mut zip, NUMBERING, self.numbering.as_ref())?;
        write_xml_part(&mut zip, FOOTNOTES, self.footnotes.as_ref())?;
        write_xml_part(&mut zip, ENDNOTES, self.endnotes.as_ref())?;
        write_xml_part(&mut zip, SETTINGS, self.settings.as_ref())?;
        write_xml_part(&mut zip, FONT_TABLE, self.fonts.as_ref())?;

        for (stem, doc) in &self.headers {
            write_xml_part(&mut zip, &format!("word/{stem}.xml"), Some(doc))?;
        }
        for (stem, doc) in &self.footers {
            write_xml_part(&mut zip, &format!("word/{stem}.xml"), Some(doc))?;
        }

        for (name, bytes) in &self.media {
            write_binary_part(&mut zip, &format!("{MEDIA_PREFIX}{name}"), bytes)?;
        }
        for (path, bytes) in &self.embeddings {
            write_binary_part(&mut zip, path, bytes)?;
        }

        for (path, content) in &self.other {
            match content {
                PartContent::Xml(doc) => write_xml_part(&mut zip, path, Some(doc))?,
                PartContent::Binary(bytes) => write_binary_part(&mut zip, path, bytes)?,
            }
        }

        zip.finish()?;
        Ok(())
    }

    pub fn header(&self, number: usize) -> Option<&XmlDocument> {
        self.headers.get(&format!("header{number}"))
    }

    pub fn footer(&self, number: usize) -> Option<&XmlDocument> {
        self.footers.get(&format!("footer{number}"))
    }

    pub fn media(&self, name: &str) -> Option<&[u8]> {
        self.media.get(name).map(|v| v.as_slice())
    }

    pub fn add_media(&mut self, name: &str, content: Vec<u8>) {
        self.media.insert(name.to_string(), content);
    }

    pub fn media_names(&self) -> impl Iterator<Item = &str> {
        self.media.keys().map(|k| k.as_str())
    }

    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    /// Write every media entry to `dir` under its stored name; returns the
    /// written paths.
    pub fn export_media(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.media.len());
        for (name, bytes) in &self.media {
            let path = dir.join(name);
            std::fs::write(&path, bytes)?;
            debug!(path = %path.display(), "exported media entry");
            written.push(path);
        }
        Ok(written)
    }

    /// Follow a relationship id to its media entry. Any link in the chain
    /// missing (no table, unknown id, external target, no such media entry)
    /// is reported and yields `None` - callers treat it as "no image
    /// available".
    pub fn resolve_image(&self, relationship_id: &str) -> Option<(&str, &[u8])> {
        let Some(table) = &self.relationships else {
            warn!("package has no relationship table");
            return None;
        };
        let Some(rel) = table.get(relationship_id) else {
            warn!(relationship_id, "no relationship with this id");
            return None;
        };
        if rel.target_mode == super::relationships::TargetMode::External {
            warn!(relationship_id, target = %rel.target, "relationship targets an external resource");
            return None;
        }

        let key = RelationshipTable::media_key(&rel.target);
        match self.media.get_key_value(key) {
            Some((name, bytes)) => Some((name.as_str(), bytes.as_slice())),
            None => {
                warn!(relationship_id, target = %rel.target, "relationship target not in media store");
                None
            }
        }
    }

    /// Resolve a relationship id and write the bytes to disk. Non-fatal:
    /// failures are logged and reported as `false`.
    pub fn save_image(&self, relationship_id: &str, path: impl AsRef<Path>) -> bool {
        let Some((name, bytes)) = self.resolve_image(relationship_id) else {
            return false;
        };
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    warn!(error = %e, "could not create output directory");
                    return false;
                }
            }
        }
        match std::fs::write(path.as_ref(), bytes) {
            Ok(()) => {
                debug!(name, path = %path.as_ref().display(), "saved image");
                true
            }
            Err(e) => {
                warn!(error = %e, "could not write image file");
                false
            }
        }
    }
}

/// `word/header1.xml` -> `header1`
fn part_stem(name: &str) -> String {
    let file = name.rsplit('/').next().unwrap_or(name);
    file.trim_end_matches(".xml").to_string()
}

fn parse_xml_part(name: &str, content: &[u8]) -> Option<XmlDocument> {
    match parser::parse_bytes(content) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(part = name, error = %e, "XML part failed to parse; treating as absent");
            None
        }
    }
}

fn write_xml_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    doc: Option<&XmlDocument>,
) -> Result<()> {
    let Some(doc) = doc else {
        return Ok(());
    };
    let bytes = builder::serialize_bytes(doc)?;
    write_binary_part(zip, path, &bytes)
}

fn write_binary_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    bytes: &[u8],
) -> Result<()> {
    let options: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(path, options)?;
    zip.write_all(bytes)?;
    Ok(())
}
