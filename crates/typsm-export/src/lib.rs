//! PDF output for typsm
//!
//! [`PdfCanvas`] implements the [`Canvas`] sections draw on. Every page
//! keeps its own operator list until [`Canvas::save`], so sections that
//! appear on all pages can go back to earlier pages after the rest of the
//! document is laid out.
//!
//! Interface text is set in the PDF base font Helvetica. Specimen glyphs
//! are drawn as filled outlines read with `skrifa`, so no font is embedded.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::DrawSettings;
use skrifa::MetadataProvider;

use typsm_core::error::{Result, SettingsError};
use typsm_core::traits::{Canvas, FontFace, GlyphId, Point};

mod pen;

use pen::PdfPathPen;

/// A4 portrait, in points
pub const A4: (f32, f32) = (595.0, 842.0);

/// Average Helvetica advance, in ems. Good enough to lay out labels.
const HELVETICA_AVERAGE_ADVANCE: f32 = 0.52;

const RULE_WIDTH: f32 = 0.25;

/// Pages of PDF operators, written out as a document on save
pub struct PdfCanvas {
    page_size: (f32, f32),
    pages: Vec<Content>,
    current: Option<usize>,
    title: Option<String>,
}

impl PdfCanvas {
    pub fn new(page_size: (f32, f32)) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: None,
            title: None,
        }
    }

    /// Set the document title recorded in the PDF info dictionary
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn page(&mut self) -> Result<&mut Content> {
        let index = self
            .current
            .ok_or_else(|| SettingsError::Render("no page to draw on".to_string()))?;
        self.pages
            .get_mut(index)
            .ok_or_else(|| SettingsError::Render(format!("page {index} does not exist")))
    }

    /// Convert a top-left based y to PDF's bottom-left space
    fn flip(&self, y: f32) -> f32 {
        self.page_size.1 - y
    }

    /// Build the PDF document from the pages drawn so far
    pub fn to_document(&self) -> Result<Document> {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();

        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = document.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let (width, height) = self.page_size;
        let mut kids = Vec::with_capacity(self.pages.len());
        for content in &self.pages {
            let encoded = content.encode().map_err(render_error)?;
            let content_id = document.add_object(Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                deflate(&encoded)?,
            ));
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::from(page_id));
        }

        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let info_id = info_dictionary(&mut document, self.title.as_deref());
        document.trailer.set("Info", info_id);
        Ok(document)
    }

    /// The finished PDF file contents
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_document()?
            .save_to(&mut bytes)
            .map_err(|e| SettingsError::Render(e.to_string()))?;
        Ok(bytes)
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new(A4)
    }
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self) {
        self.pages.push(Content { operations: vec![] });
        self.current = Some(self.pages.len() - 1);
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> Option<usize> {
        self.current
    }

    fn select_page(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(SettingsError::Render(format!(
                "page {index} does not exist, the document has {}",
                self.pages.len()
            )));
        }
        self.current = Some(index);
        Ok(())
    }

    fn page_size(&self) -> (f32, f32) {
        self.page_size
    }

    fn text(&mut self, text: &str, origin: Point, size: f32) -> Result<f32> {
        let width = self.text_width(text, size);
        if text.trim().is_empty() {
            return Ok(width);
        }
        let y = self.flip(origin.y);
        let page = self.page()?;
        page.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), size.into()]),
            Operation::new("Td", vec![origin.x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
        Ok(width)
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * HELVETICA_AVERAGE_ADVANCE
    }

    fn glyph_run(
        &mut self,
        font: &dyn FontFace,
        glyphs: &[GlyphId],
        origin: Point,
        size: f32,
    ) -> Result<f32> {
        let font_ref = skrifa::FontRef::new(font.data())
            .map_err(|_| SettingsError::Render(format!("{} is not drawable", font.path().display())))?;
        let outlines = font_ref.outline_glyphs();
        let scale = size / f32::from(font.units_per_em().max(1));
        let baseline = self.flip(origin.y);

        let mut x = origin.x;
        let mut operations = Vec::new();
        for &glyph_id in glyphs {
            if let Some(glyph) = outlines.get(skrifa::GlyphId::new(glyph_id)) {
                let mut pen = PdfPathPen::new(x, baseline, scale);
                let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
                glyph.draw(settings, &mut pen).map_err(|e| {
                    SettingsError::Render(format!("glyph {glyph_id} could not be drawn: {e}"))
                })?;
                operations.extend(pen.finish());
            } else {
                log::debug!("{} has no outline for glyph {}", font.full_name(), glyph_id);
            }
            x += font.advance_width(glyph_id) * scale;
        }

        self.page()?.operations.extend(operations);
        Ok(x - origin.x)
    }

    fn rule(&mut self, from: Point, width: f32) -> Result<()> {
        let y = self.flip(from.y);
        let page = self.page()?;
        page.operations.extend([
            Operation::new("w", vec![RULE_WIDTH.into()]),
            Operation::new("m", vec![from.x.into(), y.into()]),
            Operation::new("l", vec![(from.x + width).into(), y.into()]),
            Operation::new("S", vec![]),
        ]);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let mut document = self.to_document()?;
        let mut writer = BufWriter::new(File::create(path)?);
        document
            .save_to(&mut writer)
            .map_err(|e| SettingsError::Render(e.to_string()))?;
        writer.flush()?;
        log::info!("wrote {} page(s) to {}", self.pages.len(), path.display());
        Ok(())
    }
}

fn info_dictionary(document: &mut Document, title: Option<&str>) -> ObjectId {
    let mut info = dictionary! {
        "Producer" => Object::string_literal(format!("typsm {}", env!("CARGO_PKG_VERSION"))),
    };
    if let Some(title) = title {
        info.set("Title", Object::String(win_ansi(title), StringFormat::Literal));
    }
    document.add_object(info)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Characters WinAnsiEncoding places in 0x80..=0x9F, where Latin-1 has
/// control codes
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('€', 0x80), ('‚', 0x82), ('ƒ', 0x83), ('„', 0x84), ('…', 0x85), ('†', 0x86),
    ('‡', 0x87), ('ˆ', 0x88), ('‰', 0x89), ('Š', 0x8A), ('‹', 0x8B), ('Œ', 0x8C),
    ('Ž', 0x8E), ('\u{2018}', 0x91), ('\u{2019}', 0x92), ('\u{201C}', 0x93),
    ('\u{201D}', 0x94), ('•', 0x95), ('–', 0x96), ('\u{2014}', 0x97), ('˜', 0x98),
    ('™', 0x99), ('š', 0x9A), ('›', 0x9B), ('œ', 0x9C), ('ž', 0x9E), ('Ÿ', 0x9F),
];

/// Text for the Helvetica base font in WinAnsiEncoding; anything it cannot
/// encode becomes `?`
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => WIN_ANSI_HIGH
                .iter()
                .find(|(high, _)| *high == c)
                .map_or(b'?', |(_, byte)| *byte),
        })
        .collect()
}

fn render_error(error: lopdf::Error) -> SettingsError {
    SettingsError::Render(error.to_string())
}
