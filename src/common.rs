pub type ColorIdx = u8; // Index into the bitmap's palette
pub type PixelCoord = usize;

// One color table entry, in the byte order it is stored on disk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteEntry {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl PaletteEntry {
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        PaletteEntry {
            blue: bytes[0],
            green: bytes[1],
            red: bytes[2],
            reserved: bytes[3],
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.blue, self.green, self.red, self.reserved]
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

/// Color table of an indexed bitmap. Entries are kept exactly as read and
/// there is no way to change them after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Palette { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: ColorIdx) -> Option<PaletteEntry> {
        self.entries.get(idx as usize).copied()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn contains(&self, idx: ColorIdx) -> bool {
        (idx as usize) < self.entries.len()
    }
}

/// Palette indices in row-major order, top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<ColorIdx>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        PixelGrid {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn from_rows(rows: &[Vec<ColorIdx>]) -> Option<Self> {
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(PixelGrid {
            width,
            height: rows.len(),
            pixels: rows.concat(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: PixelCoord, y: PixelCoord) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: PixelCoord, y: PixelCoord) -> Option<ColorIdx> {
        if self.in_bounds(x, y) {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    // Caller is responsible for checking the index against the palette.
    pub(crate) fn set(&mut self, x: PixelCoord, y: PixelCoord, idx: ColorIdx) -> Option<ColorIdx> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let old = std::mem::replace(&mut self.pixels[y * self.width + x], idx);
        Some(old)
    }

    pub fn row(&self, y: PixelCoord) -> &[ColorIdx] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub(crate) fn row_mut(&mut self, y: PixelCoord) -> &mut [ColorIdx] {
        &mut self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> Vec<Vec<ColorIdx>> {
        (0..self.height).map(|y| self.row(y).to_vec()).collect()
    }

    pub fn pixels(&self) -> &[ColorIdx] {
        &self.pixels
    }
}
