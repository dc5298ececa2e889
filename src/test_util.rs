// Builds BMP files in memory for tests.
use std::io::Write;

use byteorder::{WriteBytesExt, LE};

pub const PINK: (u8, u8, u8) = (255, 192, 203);
pub const DARK_RED: (u8, u8, u8) = (139, 0, 0);

pub struct BmpBuilder {
    width: i32,
    height: i32,
    bit_count: u16,
    compression: u32,
    info_len: u32,
    colors_used: Option<u32>,
    palette: Vec<[u8; 4]>,
    // In the order they are stored in the file.
    rows: Vec<Vec<u8>>,
    gap: Vec<u8>,
    trailer: Vec<u8>,
    padding_byte: u8,
}

impl BmpBuilder {
    pub fn new(palette: &[(u8, u8, u8)], stored_rows: &[Vec<u8>]) -> Self {
        BmpBuilder {
            width: stored_rows.first().map_or(0, |r| r.len()) as i32,
            height: stored_rows.len() as i32,
            bit_count: 8,
            compression: 0,
            info_len: 40,
            colors_used: None,
            palette: palette.iter().map(|&(r, g, b)| [b, g, r, 0]).collect(),
            rows: stored_rows.to_vec(),
            gap: vec![],
            trailer: vec![],
            padding_byte: 0,
        }
    }

    pub fn top_down(mut self) -> Self {
        self.height = -self.height;
        self
    }

    pub fn bit_count(mut self, bit_count: u16) -> Self {
        self.bit_count = bit_count;
        self
    }

    pub fn compression(mut self, compression: u32) -> Self {
        self.compression = compression;
        self
    }

    pub fn info_len(mut self, info_len: u32) -> Self {
        self.info_len = info_len;
        self
    }

    pub fn colors_used(mut self, colors_used: u32) -> Self {
        self.colors_used = Some(colors_used);
        self
    }

    pub fn gap(mut self, gap: &[u8]) -> Self {
        self.gap = gap.to_vec();
        self
    }

    pub fn trailer(mut self, trailer: &[u8]) -> Self {
        self.trailer = trailer.to_vec();
        self
    }

    pub fn padding_byte(mut self, byte: u8) -> Self {
        self.padding_byte = byte;
        self
    }

    pub fn reserved_byte(mut self, byte: u8) -> Self {
        for entry in &mut self.palette {
            entry[3] = byte;
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let stride = (self.width as usize + 3) / 4 * 4;
        let pixel_len = stride * self.rows.len();
        let pixel_offset = 14 + self.info_len as usize + self.palette.len() * 4 + self.gap.len();
        let file_size = pixel_offset + pixel_len + self.trailer.len();

        let mut out: Vec<u8> = vec![];
        out.write_all(b"BM").unwrap();
        out.write_u32::<LE>(file_size as u32).unwrap();
        out.write_u32::<LE>(0).unwrap();
        out.write_u32::<LE>(pixel_offset as u32).unwrap();
        out.write_u32::<LE>(self.info_len).unwrap();
        out.write_i32::<LE>(self.width).unwrap();
        out.write_i32::<LE>(self.height).unwrap();
        out.write_u16::<LE>(1).unwrap();
        out.write_u16::<LE>(self.bit_count).unwrap();
        out.write_u32::<LE>(self.compression).unwrap();
        out.write_u32::<LE>(pixel_len as u32).unwrap();
        out.write_i32::<LE>(2835).unwrap();
        out.write_i32::<LE>(2835).unwrap();
        out.write_u32::<LE>(self.colors_used.unwrap_or(self.palette.len() as u32))
            .unwrap();
        out.write_u32::<LE>(0).unwrap();
        if self.info_len as usize > 40 {
            out.resize(14 + self.info_len as usize, 0);
        }
        for entry in &self.palette {
            out.extend_from_slice(entry);
        }
        out.extend_from_slice(&self.gap);
        for row in &self.rows {
            out.extend_from_slice(row);
            out.resize(out.len() + stride - row.len(), self.padding_byte);
        }
        out.extend_from_slice(&self.trailer);
        out
    }
}
