pub mod bmp;
pub mod common;
pub mod error;
pub mod glyph;
pub mod session;
pub mod workspace;

#[cfg(test)]
mod test_util;
