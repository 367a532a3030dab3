#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Page text carrying a web address and a Telegram handle
pub const LINK_TEXT: &[u8] = b"BT /F1 12 Tf 72 720 Td (Visit https://example.org/docs today) Tj ET\nBT 72 700 Td (Join t.me/channel) Tj ET";

/// What [`LINK_TEXT`] becomes once scrubbed
pub const SCRUBBED_TEXT: &[u8] = b"BT /F1 12 Tf 72 720 Td (Visit  today) Tj ET\nBT 72 700 Td (Join  Tj ET";

pub const PLAIN_TEXT: &[u8] = b"BT /F1 12 Tf 72 720 Td (Nothing to see here) Tj ET";

pub struct TestFixtures;

impl TestFixtures {
    /// Pages with link annotations, page actions and link text, under a
    /// catalog carrying an open action, names and outlines
    pub fn linked_pdf(pages: usize) -> Vec<u8> {
        let mut builder = Builder::new();
        for _ in 0..pages {
            let contents = builder.plain_stream(LINK_TEXT);
            builder.page(Object::from(contents), true);
        }
        builder.finish(true)
    }

    /// One page, no links anywhere
    pub fn minimal_pdf() -> Vec<u8> {
        let mut builder = Builder::new();
        let contents = builder.plain_stream(PLAIN_TEXT);
        builder.page(Object::from(contents), false);
        builder.finish(false)
    }

    /// Link text inside a FlateDecode stream
    pub fn compressed_content_pdf() -> Vec<u8> {
        let mut builder = Builder::new();
        let contents = builder.flate_stream(LINK_TEXT);
        builder.page(Object::from(contents), true);
        builder.finish(false)
    }

    /// A page whose `/Contents` is an array of two streams
    pub fn split_content_pdf() -> Vec<u8> {
        let mut builder = Builder::new();
        let first = builder.plain_stream(b"BT (see http://a.example) Tj ET");
        let second = builder.plain_stream(b"BT (or /URI (b.example)) Tj ET");
        builder.page(Object::Array(vec![first.into(), second.into()]), false);
        builder.finish(false)
    }

    /// A page whose `/Contents` references an array object of two streams
    pub fn indirect_array_content_pdf() -> Vec<u8> {
        let mut builder = Builder::new();
        let first = builder.plain_stream(b"BT (see http://a.example) Tj ET");
        let second = builder.plain_stream(b"BT (or /URI (b.example)) Tj ET");
        let array = builder.doc.add_object(Object::Array(vec![first.into(), second.into()]));
        builder.page(Object::from(array), false);
        builder.finish(false)
    }

    /// Page 1 draws a shared linked stream plus a reference to a non-stream
    /// object; page 2 draws only the shared stream
    pub fn shared_stream_with_broken_page_pdf() -> Vec<u8> {
        let mut builder = Builder::new();
        let shared = builder.plain_stream(LINK_TEXT);
        let not_a_stream = builder.doc.add_object(Object::Integer(7));
        builder.page(Object::Array(vec![shared.into(), not_a_stream.into()]), false);
        builder.page(Object::from(shared), false);
        builder.finish(false)
    }

    /// Two pages drawing the same content stream
    pub fn shared_stream_pdf() -> Vec<u8> {
        let mut builder = Builder::new();
        let shared = builder.plain_stream(LINK_TEXT);
        builder.page(Object::from(shared), true);
        builder.page(Object::from(shared), true);
        builder.finish(false)
    }

    /// Three linked pages; the second has `/Contents` that is not a stream
    pub fn broken_contents_pdf() -> Vec<u8> {
        let mut builder = Builder::new();
        let first = builder.plain_stream(LINK_TEXT);
        builder.page(Object::from(first), true);
        builder.page(Object::Integer(42), true);
        let third = builder.plain_stream(LINK_TEXT);
        builder.page(Object::from(third), true);
        builder.finish(true)
    }

    pub fn malformed_pdf() -> Vec<u8> {
        b"This is not a valid PDF file".to_vec()
    }
}

struct Builder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl Builder {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    fn plain_stream(&mut self, content: &[u8]) -> ObjectId {
        self.doc.add_object(Stream::new(Dictionary::new(), content.to_vec()))
    }

    fn flate_stream(&mut self, content: &[u8]) -> ObjectId {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        let compressed = encoder.finish().unwrap();
        self.doc
            .add_object(Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed))
    }

    fn page(&mut self, contents: Object, linked: bool) -> ObjectId {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => contents,
        };
        if linked {
            let annot = self.doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => vec![72.into(), 700.into(), 300.into(), 730.into()],
                "A" => dictionary! {
                    "S" => "URI",
                    "URI" => Object::string_literal("https://example.org/docs"),
                },
            });
            page.set("Annots", vec![Object::from(annot)]);
            page.set(
                "AA",
                dictionary! { "O" => dictionary! { "S" => "URI", "URI" => Object::string_literal("https://example.org/open") } },
            );
        }
        let page_id = self.doc.add_object(page);
        self.kids.push(page_id.into());
        page_id
    }

    fn finish(mut self, linked_catalog: bool) -> Vec<u8> {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        };
        if linked_catalog {
            let outlines = self.doc.add_object(dictionary! { "Type" => "Outlines", "Count" => 0 });
            catalog.set("Outlines", outlines);
            catalog.set(
                "OpenAction",
                dictionary! { "S" => "URI", "URI" => Object::string_literal("https://example.org/start") },
            );
            catalog.set("AA", dictionary! { "WC" => dictionary! { "S" => "JavaScript" } });
            catalog.set("Names", Dictionary::new());
        }
        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes).unwrap();
        bytes
    }
}

/// Scratch directory removed on drop
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("pdf-unlink-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Decoded bytes of every page's content streams, concatenated in `/Contents`
/// order; entries that are not streams are ignored
pub fn page_contents(path: &Path) -> Vec<Vec<u8>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let mut refs = Vec::new();
            match page.get(b"Contents") {
                Ok(Object::Reference(id)) => match doc.get_object(*id) {
                    Ok(Object::Array(items)) => refs.extend(items.iter().filter_map(|o| o.as_reference().ok())),
                    _ => refs.push(*id),
                },
                Ok(Object::Array(items)) => refs.extend(items.iter().filter_map(|o| o.as_reference().ok())),
                _ => {}
            }

            let mut content = Vec::new();
            for id in refs {
                if let Ok(stream) = doc.get_object(id).and_then(Object::as_stream) {
                    content.extend(stream.decompressed_content().unwrap_or_else(|_| stream.content.clone()));
                }
            }
            content
        })
        .collect()
}
