// Geometry of a font strip: 256 glyphs stacked vertically in one bitmap.
use crate::common::PixelCoord;

pub const GLYPHS_PER_STRIP: usize = 256;
const FALLBACK_GLYPH_HEIGHT: usize = 8;

// Strip heights seen in the game's font files.
const KNOWN_HEIGHTS: [(usize, usize); 4] = [(2048, 8), (2259, 9), (3390, 15), (3584, 14)];

pub fn detect_glyph_height(image_height: usize) -> usize {
    if let Some(&(_, glyph_height)) = KNOWN_HEIGHTS.iter().find(|(h, _)| *h == image_height) {
        return glyph_height;
    }
    match image_height / GLYPHS_PER_STRIP {
        0 => FALLBACK_GLYPH_HEIGHT,
        h => h,
    }
}

pub fn glyph_count(image_height: usize, glyph_height: usize) -> usize {
    if glyph_height == 0 {
        return 0;
    }
    image_height / glyph_height
}

pub fn glyph_at_row(y: PixelCoord, glyph_height: usize) -> usize {
    y / glyph_height.max(1)
}

pub fn glyph_label(idx: usize) -> String {
    let c = match u8::try_from(idx) {
        Ok(b) if (32..127).contains(&b) => b as char,
        _ => '·',
    };
    format!("#{} (ASCII {}: '{}')", idx, idx, c)
}
