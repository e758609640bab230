// this_file: crates/typsm-fontdb/tests/support/mod.rs

//! Tiny TrueType fonts built in memory, so tests need no font files in the
//! repository. Every glyph but `.notdef` is the same square outline.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use typsm_fontdb::{SfntBuilder, TRUETYPE_FLAVOR};

/// `head.created` of every test font, a day in 2021
pub const CREATED: i64 = 3_700_000_000;

pub const ADVANCE: u16 = 600;

/// What goes into a test font
#[derive(Debug, Clone)]
pub struct TestFont {
    pub family: String,
    pub style: String,
    /// Written as name IDs 16/17 when set, with `family style`/`Regular`
    /// as the legacy names
    pub typographic: bool,
    pub weight: u16,
    pub width: u16,
    pub italic: bool,
    pub copyright: Option<String>,
    pub designer: Option<String>,
    /// Glyph names after `.notdef`, with the character each one maps
    pub glyphs: Vec<(String, Option<char>)>,
}

impl TestFont {
    pub fn new(family: &str, style: &str, weight: u16) -> Self {
        Self {
            family: family.to_string(),
            style: style.to_string(),
            typographic: false,
            weight,
            width: 5,
            italic: style.contains("Italic"),
            copyright: Some(format!("Copyright 2021 The {family} Authors")),
            designer: Some("Jane Roe".to_string()),
            glyphs: [
                ("space", Some(' ')),
                ("A", Some('A')),
                ("B", Some('B')),
                ("a", Some('a')),
                ("one", Some('1')),
                ("one.tosf", None),
                ("uni0416", Some('\u{0416}')),
            ]
            .iter()
            .map(|(name, ch)| (name.to_string(), *ch))
            .collect(),
        }
    }

    pub fn typographic(mut self) -> Self {
        self.typographic = true;
        self
    }

    pub fn num_glyphs(&self) -> u16 {
        self.glyphs.len() as u16 + 1
    }

    /// The finished TrueType binary
    pub fn build(&self) -> Vec<u8> {
        let mut builder = SfntBuilder::new(TRUETYPE_FLAVOR);
        let (loca, glyf) = self.loca_glyf();
        builder
            .push(*b"head", self.head())
            .push(*b"hhea", self.hhea())
            .push(*b"maxp", self.maxp())
            .push(*b"hmtx", self.hmtx())
            .push(*b"OS/2", self.os2())
            .push(*b"cmap", self.cmap())
            .push(*b"post", self.post())
            .push(*b"name", self.name())
            .push(*b"loca", loca)
            .push(*b"glyf", glyf);
        builder.build()
    }

    /// Write the font into `dir` as `file_name`
    pub fn write(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }

    fn head(&self) -> Vec<u8> {
        let mut t = Vec::new();
        t.extend(1u16.to_be_bytes());
        t.extend(0u16.to_be_bytes());
        t.extend(0x0001_8000u32.to_be_bytes()); // revision 1.5
        t.extend(0u32.to_be_bytes());
        t.extend(0x5F0F_3CF5u32.to_be_bytes());
        t.extend(0u16.to_be_bytes());
        t.extend(1000u16.to_be_bytes());
        t.extend(CREATED.to_be_bytes());
        t.extend(CREATED.to_be_bytes());
        for v in [0i16, 0, 600, 700] {
            t.extend(v.to_be_bytes());
        }
        t.extend(0u16.to_be_bytes());
        t.extend(8u16.to_be_bytes());
        t.extend(2i16.to_be_bytes());
        t.extend(0i16.to_be_bytes()); // short loca
        t.extend(0i16.to_be_bytes());
        t
    }

    fn hhea(&self) -> Vec<u8> {
        let mut t = Vec::new();
        t.extend(1u16.to_be_bytes());
        t.extend(0u16.to_be_bytes());
        for v in [800i16, -200, 0] {
            t.extend(v.to_be_bytes());
        }
        t.extend(ADVANCE.to_be_bytes());
        for v in [0i16, 0, 600, 1, 0, 0, 0, 0, 0, 0, 0] {
            t.extend(v.to_be_bytes());
        }
        t.extend(self.num_glyphs().to_be_bytes());
        t
    }

    fn maxp(&self) -> Vec<u8> {
        let mut t = Vec::new();
        t.extend(0x0001_0000u32.to_be_bytes());
        t.extend(self.num_glyphs().to_be_bytes());
        for v in [4u16, 1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0] {
            t.extend(v.to_be_bytes());
        }
        t
    }

    fn hmtx(&self) -> Vec<u8> {
        let mut t = Vec::new();
        for _ in 0..self.num_glyphs() {
            t.extend(ADVANCE.to_be_bytes());
            t.extend(0i16.to_be_bytes());
        }
        t
    }

    fn os2(&self) -> Vec<u8> {
        let mut t = vec![0u8; 96];
        t[0..2].copy_from_slice(&4u16.to_be_bytes());
        t[4..6].copy_from_slice(&self.weight.to_be_bytes());
        t[6..8].copy_from_slice(&self.width.to_be_bytes());
        let selection: u16 = if self.italic { 0x01 } else { 0x40 };
        t[62..64].copy_from_slice(&selection.to_be_bytes());
        t
    }

    fn cmap(&self) -> Vec<u8> {
        let mut mappings: Vec<(u32, u32)> = self
            .glyphs
            .iter()
            .enumerate()
            .filter_map(|(i, (_, ch))| ch.map(|c| (c as u32, i as u32 + 1)))
            .collect();
        mappings.sort_unstable();

        let mut t = Vec::new();
        t.extend(0u16.to_be_bytes());
        t.extend(1u16.to_be_bytes());
        t.extend(3u16.to_be_bytes());
        t.extend(10u16.to_be_bytes());
        t.extend(12u32.to_be_bytes());

        t.extend(12u16.to_be_bytes());
        t.extend(0u16.to_be_bytes());
        t.extend((16 + 12 * mappings.len() as u32).to_be_bytes());
        t.extend(0u32.to_be_bytes());
        t.extend((mappings.len() as u32).to_be_bytes());
        for (cp, gid) in mappings {
            t.extend(cp.to_be_bytes());
            t.extend(cp.to_be_bytes());
            t.extend(gid.to_be_bytes());
        }
        t
    }

    fn post(&self) -> Vec<u8> {
        let mut t = Vec::new();
        t.extend(0x0002_0000u32.to_be_bytes());
        t.extend(0u32.to_be_bytes());
        t.extend((-100i16).to_be_bytes());
        t.extend(50i16.to_be_bytes());
        t.extend([0u8; 20]);
        t.extend(self.num_glyphs().to_be_bytes());
        t.extend(0u16.to_be_bytes()); // .notdef, a standard name
        for index in 0..self.glyphs.len() {
            t.extend((258 + index as u16).to_be_bytes());
        }
        for (name, _) in &self.glyphs {
            t.push(name.len() as u8);
            t.extend(name.as_bytes());
        }
        t
    }

    fn name(&self) -> Vec<u8> {
        let mut entries: Vec<(u16, String)> = Vec::new();
        if let Some(copyright) = &self.copyright {
            entries.push((0, copyright.clone()));
        }
        if self.typographic {
            entries.push((1, format!("{} {}", self.family, self.style)));
            entries.push((2, "Regular".to_string()));
        } else {
            entries.push((1, self.family.clone()));
            entries.push((2, self.style.clone()));
        }
        if let Some(designer) = &self.designer {
            entries.push((9, designer.clone()));
        }
        if self.typographic {
            entries.push((16, self.family.clone()));
            entries.push((17, self.style.clone()));
        }

        let strings: Vec<Vec<u8>> = entries
            .iter()
            .map(|(_, s)| s.encode_utf16().flat_map(u16::to_be_bytes).collect())
            .collect();

        let mut t = Vec::new();
        t.extend(0u16.to_be_bytes());
        t.extend((entries.len() as u16).to_be_bytes());
        t.extend((6 + 12 * entries.len() as u16).to_be_bytes());
        let mut offset = 0u16;
        for ((id, _), bytes) in entries.iter().zip(&strings) {
            for v in [3u16, 1, 0x0409, *id, bytes.len() as u16, offset] {
                t.extend(v.to_be_bytes());
            }
            offset += bytes.len() as u16;
        }
        for bytes in strings {
            t.extend(bytes);
        }
        t
    }

    fn loca_glyf(&self) -> (Vec<u8>, Vec<u8>) {
        let mut square = Vec::new();
        for v in [1i16, 100, 0, 600, 700] {
            square.extend(v.to_be_bytes());
        }
        square.extend(3u16.to_be_bytes());
        square.extend(0u16.to_be_bytes());
        square.extend([0x01u8; 4]);
        for v in [100i16, 0, 500, 0, 0, 700, 0, -700] {
            square.extend(v.to_be_bytes());
        }
        square.resize(36, 0);

        let mut loca = Vec::new();
        let mut glyf = Vec::new();
        loca.extend(0u16.to_be_bytes());
        loca.extend(0u16.to_be_bytes()); // empty .notdef
        for _ in &self.glyphs {
            glyf.extend(&square);
            loca.extend(((glyf.len() / 2) as u16).to_be_bytes());
        }
        (loca, glyf)
    }
}

/// Wrap an sfnt binary as WOFF 1.0, compressing tables where it helps
pub fn to_woff(sfnt: &[u8]) -> Vec<u8> {
    let read_u16 = |at: usize| u16::from_be_bytes([sfnt[at], sfnt[at + 1]]);
    let read_u32 =
        |at: usize| u32::from_be_bytes([sfnt[at], sfnt[at + 1], sfnt[at + 2], sfnt[at + 3]]);

    let num_tables = read_u16(4) as usize;
    let mut directory = Vec::new();
    let mut body = Vec::new();
    let body_start = 44 + 20 * num_tables;

    for index in 0..num_tables {
        let record = 12 + 16 * index;
        let checksum = read_u32(record + 4);
        let offset = read_u32(record + 8) as usize;
        let length = read_u32(record + 12) as usize;
        let table = &sfnt[offset..offset + length];

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(table).unwrap();
        let compressed = encoder.finish().unwrap();
        let stored = if compressed.len() < table.len() {
            compressed
        } else {
            table.to_vec()
        };

        directory.extend(&sfnt[record..record + 4]);
        directory.extend(((body_start + body.len()) as u32).to_be_bytes());
        directory.extend((stored.len() as u32).to_be_bytes());
        directory.extend((length as u32).to_be_bytes());
        directory.extend(checksum.to_be_bytes());
        body.extend(&stored);
        body.resize((body.len() + 3) & !3, 0);
    }

    let mut woff = Vec::new();
    woff.extend(b"wOFF");
    woff.extend(&sfnt[0..4]);
    woff.extend(((body_start + body.len()) as u32).to_be_bytes());
    woff.extend((num_tables as u16).to_be_bytes());
    woff.extend(0u16.to_be_bytes());
    woff.extend((sfnt.len() as u32).to_be_bytes());
    woff.extend(1u16.to_be_bytes());
    woff.extend(0u16.to_be_bytes());
    woff.extend([0u8; 20]);
    woff.extend(directory);
    woff.extend(body);
    woff
}

/// Light, Regular and Bold of "Acme Sans", written in shuffled file order
pub fn acme_family(dir: &Path) -> Vec<PathBuf> {
    vec![
        TestFont::new("Acme Sans", "Bold", 700).write(dir, "a-bold.ttf"),
        TestFont::new("Acme Sans", "Light", 300).write(dir, "b-light.ttf"),
        TestFont::new("Acme Sans", "Regular", 400).write(dir, "c-regular.ttf"),
    ]
}
