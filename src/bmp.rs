// Reading and writing 8-bit uncompressed palette-indexed BMP files.
//
// Everything that is not pixel data (headers, color table, any gap before the
// pixel array and anything after it) is carried through verbatim, so saving a
// file only ever changes pixel bytes.
use std::{
    fs,
    io::{self, Cursor, Read},
    path::{Path, PathBuf},
};

use byteorder::{ByteOrder, ReadBytesExt, LE};
use log::{debug, info};

use crate::{
    common::{ColorIdx, Palette, PaletteEntry, PixelCoord, PixelGrid},
    error::{corrupt, EditorError, Result},
};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_MIN_LEN: usize = 40;
const BI_RGB: u32 = 0;
const MAX_PALETTE_ENTRIES: usize = 256;

/// Bytes per stored row: rows are padded to a 4-byte boundary.
pub fn row_stride(width: usize) -> usize {
    (width + 3) / 4 * 4
}

struct RawHeader {
    signature: [u8; 2],
    pixel_offset: u32,
    info_len: u32,
    width: i32,
    height: i32,
    bit_count: u16,
    compression: u32,
    colors_used: u32,
}

fn read_header(data: &[u8]) -> io::Result<RawHeader> {
    let mut cursor = Cursor::new(data);
    let mut signature = [0u8; 2];
    cursor.read_exact(&mut signature)?;
    let _file_size = cursor.read_u32::<LE>()?;
    let _reserved = cursor.read_u32::<LE>()?;
    let pixel_offset = cursor.read_u32::<LE>()?;
    let info_len = cursor.read_u32::<LE>()?;
    let width = cursor.read_i32::<LE>()?;
    let height = cursor.read_i32::<LE>()?;
    let _planes = cursor.read_u16::<LE>()?;
    let bit_count = cursor.read_u16::<LE>()?;
    let compression = cursor.read_u32::<LE>()?;
    let _image_size = cursor.read_u32::<LE>()?;
    let _x_pixels_per_meter = cursor.read_i32::<LE>()?;
    let _y_pixels_per_meter = cursor.read_i32::<LE>()?;
    let colors_used = cursor.read_u32::<LE>()?;
    Ok(RawHeader {
        signature,
        pixel_offset,
        info_len,
        width,
        height,
        bit_count,
        compression,
        colors_used,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RowLayout {
    // File header + info header, up to the start of the color table.
    header: Vec<u8>,
    // Anything between the end of the color table and the pixel array.
    gap: Vec<u8>,
    // Anything after the pixel array.
    trailer: Vec<u8>,
    stride: usize,
    top_down: bool,
}

impl RowLayout {
    // Maps the n-th stored row to its on-screen row.
    fn logical_row(&self, stored: usize, height: usize) -> PixelCoord {
        if self.top_down {
            stored
        } else {
            height - 1 - stored
        }
    }
}

/// A decoded bitmap: palette, pixel grid, and the byte layout needed to
/// write it back out unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedBitmap {
    palette: Palette,
    grid: PixelGrid,
    layout: RowLayout,
}

impl IndexedBitmap {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = read_header(data).map_err(|_| corrupt("truncated header"))?;
        if &header.signature != b"BM" {
            return Err(corrupt(format!(
                "bad signature {:02X?}",
                header.signature
            )));
        }
        let info_len = header.info_len as usize;
        if info_len < INFO_HEADER_MIN_LEN {
            return Err(corrupt(format!(
                "unsupported info header size {}",
                info_len
            )));
        }
        if header.bit_count != 8 {
            return Err(corrupt(format!(
                "bit depth is {}, expected 8",
                header.bit_count
            )));
        }
        if header.compression != BI_RGB {
            return Err(corrupt(format!(
                "compression type {} is not supported",
                header.compression
            )));
        }
        if header.width <= 0 || header.height == 0 {
            return Err(corrupt(format!(
                "invalid dimensions {}x{}",
                header.width, header.height
            )));
        }

        let width = header.width as usize;
        let height = header.height.unsigned_abs() as usize;
        let top_down = header.height < 0;
        let pixel_offset = header.pixel_offset as usize;
        let palette_start = FILE_HEADER_LEN + info_len;
        if palette_start > pixel_offset || pixel_offset > data.len() {
            return Err(corrupt(format!(
                "pixel data offset {} out of range",
                pixel_offset
            )));
        }

        let available = (pixel_offset - palette_start) / 4;
        let palette_len = if header.colors_used == 0 {
            available.min(MAX_PALETTE_ENTRIES)
        } else {
            header.colors_used as usize
        };
        if palette_len == 0 || palette_len > MAX_PALETTE_ENTRIES {
            return Err(corrupt(format!(
                "invalid color table size {}",
                palette_len
            )));
        }
        if palette_len > available {
            return Err(corrupt(format!(
                "color table with {} entries does not fit before pixel data",
                palette_len
            )));
        }
        let palette_end = palette_start + palette_len * 4;

        let stride = row_stride(width);
        let pixel_end = stride
            .checked_mul(height)
            .and_then(|len| len.checked_add(pixel_offset))
            .filter(|&end| end <= data.len())
            .ok_or_else(|| corrupt("truncated pixel data"))?;

        let palette = Palette::new(
            data[palette_start..palette_end]
                .chunks_exact(4)
                .map(|c| PaletteEntry::from_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        );

        let layout = RowLayout {
            header: data[..palette_start].to_vec(),
            gap: data[palette_end..pixel_offset].to_vec(),
            trailer: data[pixel_end..].to_vec(),
            stride,
            top_down,
        };

        let mut grid = PixelGrid::new(width, height);
        for stored in 0..height {
            let start = pixel_offset + stored * stride;
            let src = &data[start..start + width];
            if let Some(&bad) = src.iter().find(|&&idx| !palette.contains(idx)) {
                return Err(EditorError::InvalidIndex {
                    index: bad,
                    palette_len,
                });
            }
            grid.row_mut(layout.logical_row(stored, height))
                .copy_from_slice(src);
        }

        debug!(
            "Parsed {}x{} bitmap, {} palette entries, stride {}, {}",
            width,
            height,
            palette_len,
            stride,
            if top_down { "top-down" } else { "bottom-up" }
        );
        Ok(IndexedBitmap {
            palette,
            grid,
            layout,
        })
    }

    /// Builds a bottom-up bitmap with a plain 40-byte info header around an
    /// existing palette and grid.
    pub fn new(palette: Palette, grid: PixelGrid) -> Result<Self> {
        if palette.is_empty() || palette.len() > MAX_PALETTE_ENTRIES {
            return Err(corrupt(format!(
                "invalid color table size {}",
                palette.len()
            )));
        }
        if grid.width() == 0 || grid.height() == 0 {
            return Err(corrupt(format!(
                "invalid dimensions {}x{}",
                grid.width(),
                grid.height()
            )));
        }
        if let Some(&bad) = grid.pixels().iter().find(|&&idx| !palette.contains(idx)) {
            return Err(EditorError::InvalidIndex {
                index: bad,
                palette_len: palette.len(),
            });
        }

        let stride = row_stride(grid.width());
        let palette_start = FILE_HEADER_LEN + INFO_HEADER_MIN_LEN;
        let pixel_offset = palette_start + palette.len() * 4;
        let image_size = stride * grid.height();
        let mut header = vec![0u8; palette_start];
        header[..2].copy_from_slice(b"BM");
        LE::write_u32(&mut header[2..6], (pixel_offset + image_size) as u32);
        LE::write_u32(&mut header[10..14], pixel_offset as u32);
        LE::write_u32(&mut header[14..18], INFO_HEADER_MIN_LEN as u32);
        LE::write_i32(&mut header[18..22], grid.width() as i32);
        LE::write_i32(&mut header[22..26], grid.height() as i32);
        LE::write_u16(&mut header[26..28], 1);
        LE::write_u16(&mut header[28..30], 8);
        LE::write_u32(&mut header[30..34], BI_RGB);
        LE::write_u32(&mut header[34..38], image_size as u32);
        LE::write_u32(&mut header[46..50], palette.len() as u32);

        Ok(IndexedBitmap {
            palette,
            grid,
            layout: RowLayout {
                header,
                gap: vec![],
                trailer: vec![],
                stride,
                top_down: false,
            },
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let layout = &self.layout;
        let width = self.grid.width();
        let height = self.grid.height();
        let mut out = Vec::with_capacity(
            layout.header.len()
                + self.palette.len() * 4
                + layout.gap.len()
                + layout.stride * height
                + layout.trailer.len(),
        );
        out.extend_from_slice(&layout.header);
        for entry in self.palette.entries() {
            out.extend_from_slice(&entry.to_bytes());
        }
        out.extend_from_slice(&layout.gap);
        for stored in 0..height {
            out.extend_from_slice(self.grid.row(layout.logical_row(stored, height)));
            out.resize(out.len() + layout.stride - width, 0);
        }
        out.extend_from_slice(&layout.trailer);
        out
    }

    /// Expands the grid through the palette into RGBA bytes, top row first.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.grid.pixels().len() * 4);
        for &idx in self.grid.pixels() {
            let (r, g, b) = self.palette.get(idx).unwrap_or_default().rgb();
            out.extend([r, g, b, 255]);
        }
        out
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn is_top_down(&self) -> bool {
        self.layout.top_down
    }

    pub fn stride(&self) -> usize {
        self.layout.stride
    }

    /// Sets one pixel. Returns the previous index, or `None` when the
    /// coordinates fall outside the image (nothing is changed).
    pub fn set_pixel(
        &mut self,
        x: PixelCoord,
        y: PixelCoord,
        idx: ColorIdx,
    ) -> Result<Option<ColorIdx>> {
        if !self.palette.contains(idx) {
            return Err(EditorError::InvalidIndex {
                index: idx,
                palette_len: self.palette.len(),
            });
        }
        Ok(self.grid.set(x, y, idx))
    }
}

/// A character file loaded for editing.
#[derive(Clone, Debug)]
pub struct CharacterAsset {
    path: PathBuf,
    bitmap: IndexedBitmap,
}

impl CharacterAsset {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bitmap(&self) -> &IndexedBitmap {
        &self.bitmap
    }

    pub fn palette(&self) -> &Palette {
        self.bitmap.palette()
    }

    pub fn grid(&self) -> &PixelGrid {
        self.bitmap.grid()
    }

    pub fn set_pixel(
        &mut self,
        x: PixelCoord,
        y: PixelCoord,
        idx: ColorIdx,
    ) -> Result<Option<ColorIdx>> {
        self.bitmap.set_pixel(x, y, idx)
    }
}

pub fn decode(path: &Path) -> Result<CharacterAsset> {
    info!("Loading {}", path.display());
    let data = fs::read(path).map_err(|source| EditorError::NotFound {
        path: path.to_owned(),
        source,
    })?;
    let bitmap = IndexedBitmap::parse(&data)?;
    Ok(CharacterAsset {
        path: path.to_owned(),
        bitmap,
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

// Follows symlinks so the file they point at is the one replaced. A path
// that does not exist yet is used as given.
fn resolve_target(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_owned())
}

fn write_replace(target: &Path, temp_path: &Path, data: &[u8]) -> io::Result<()> {
    fs::write(temp_path, data)?;
    if let Ok(metadata) = fs::metadata(target) {
        fs::set_permissions(temp_path, metadata.permissions())?;
    }
    fs::rename(temp_path, target)
}

/// Writes the asset to `path` by way of a temporary sibling file, so the
/// destination is either fully replaced or left as it was. When `path` is a
/// symlink the file it points at is replaced and the link is kept.
pub fn encode(path: &Path, asset: &CharacterAsset) -> Result<()> {
    info!("Saving {}", path.display());
    let data = asset.bitmap.to_bytes();
    let target = resolve_target(path);
    let temp_path = temp_path_for(&target);
    write_replace(&target, &temp_path, &data).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        EditorError::IoError {
            path: path.to_owned(),
            source,
        }
    })
}
