// this_file: crates/typsm-fontdb/src/sfnt.rs

//! Assembling an OpenType (sfnt) binary from its tables

/// `sfntVersion` of fonts with TrueType outlines
pub const TRUETYPE_FLAVOR: u32 = 0x0001_0000;

/// `sfntVersion` of fonts with CFF outlines (`OTTO`)
pub const CFF_FLAVOR: u32 = u32::from_be_bytes(*b"OTTO");

/// Most tables a font can list before `searchRange` and `rangeShift` no
/// longer fit their 16-bit header fields
pub const MAX_TABLES: usize = 4095;

/// Collects tables and writes them out as one font file
#[derive(Debug, Clone)]
pub struct SfntBuilder {
    flavor: u32,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl SfntBuilder {
    pub fn new(flavor: u32) -> Self {
        Self {
            flavor,
            tables: Vec::new(),
        }
    }

    /// Add a table. A second table with the same tag replaces the first.
    pub fn push(&mut self, tag: [u8; 4], data: Vec<u8>) -> &mut Self {
        self.tables.retain(|(existing, _)| *existing != tag);
        self.tables.push((tag, data));
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// The font binary: offset table, table records sorted by tag, then
    /// each table padded to four bytes
    ///
    /// Callers keep the table count within [`MAX_TABLES`].
    pub fn build(mut self) -> Vec<u8> {
        self.tables.sort_by(|a, b| a.0.cmp(&b.0));

        let num_tables = self.tables.len() as u32;
        let entry_selector = num_tables.checked_ilog2().unwrap_or(0);
        let search_range = (1u32 << entry_selector) * 16;
        let range_shift = (num_tables * 16).saturating_sub(search_range);

        let header_len = 12 + 16 * self.tables.len();
        let mut out = Vec::with_capacity(
            header_len + self.tables.iter().map(|(_, t)| padded_len(t.len())).sum::<usize>(),
        );
        out.extend_from_slice(&self.flavor.to_be_bytes());
        for field in [num_tables, search_range, entry_selector, range_shift] {
            out.extend_from_slice(&(field as u16).to_be_bytes());
        }

        let mut offset = header_len;
        for (tag, data) in &self.tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&checksum(data).to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += padded_len(data.len());
        }

        for (_, data) in &self.tables {
            out.extend_from_slice(data);
            out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
        }
        out
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// Table checksum: the sum of the table's big-endian words, zero padded
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}
