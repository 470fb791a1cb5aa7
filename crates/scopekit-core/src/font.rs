//! Embedded 5x7 bitmap glyphs for graticule labels.
//!
//! Only the characters scope overlays actually print are included:
//! digits, `%`, and the letters used by channel and color-target labels.

/// Glyph width in pixels.
pub const GLYPH_W: u32 = 5;
/// Glyph height in pixels.
pub const GLYPH_H: u32 = 7;
/// Horizontal advance per character (glyph plus one column of spacing).
pub const ADVANCE: u32 = 6;

/// Each glyph: 7 rows, each row's lower 5 bits = pixels (MSB = left).
#[rustfmt::skip]
const GLYPHS: &[(char, [u8; 7])] = &[
    (' ', [0x00,0x00,0x00,0x00,0x00,0x00,0x00]),
    ('%', [0x18,0x19,0x02,0x04,0x08,0x13,0x03]),
    ('0', [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E]),
    ('1', [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E]),
    ('2', [0x0E,0x11,0x01,0x02,0x04,0x08,0x1F]),
    ('3', [0x1F,0x02,0x04,0x02,0x01,0x11,0x0E]),
    ('4', [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02]),
    ('5', [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E]),
    ('6', [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E]),
    ('7', [0x1F,0x01,0x02,0x04,0x08,0x08,0x08]),
    ('8', [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E]),
    ('9', [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C]),
    ('B', [0x1E,0x11,0x11,0x1E,0x11,0x11,0x1E]),
    ('C', [0x0E,0x11,0x10,0x10,0x10,0x11,0x0E]),
    ('G', [0x0E,0x11,0x10,0x17,0x11,0x11,0x0F]),
    ('M', [0x11,0x1B,0x15,0x15,0x11,0x11,0x11]),
    ('R', [0x1E,0x11,0x11,0x1E,0x14,0x12,0x11]),
    ('Y', [0x11,0x11,0x0A,0x04,0x04,0x04,0x04]),
    ('g', [0x00,0x00,0x0F,0x11,0x0F,0x01,0x0E]),
    ('i', [0x04,0x00,0x0C,0x04,0x04,0x04,0x0E]),
    ('k', [0x10,0x10,0x12,0x14,0x18,0x14,0x12]),
    ('l', [0x0C,0x04,0x04,0x04,0x04,0x04,0x0E]),
    ('n', [0x00,0x00,0x16,0x19,0x11,0x11,0x11]),
    ('s', [0x00,0x00,0x0E,0x10,0x0E,0x01,0x1E]),
    ('y', [0x00,0x00,0x11,0x11,0x0F,0x01,0x0E]),
];

/// Bitmap rows for `ch`, or `None` if the glyph isn't embedded.
pub fn glyph(ch: char) -> Option<&'static [u8; 7]> {
    GLYPHS.iter().find(|(c, _)| *c == ch).map(|(_, rows)| rows)
}

/// Rendered width of `text` in pixels.
pub fn text_width(text: &str) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 { 0 } else { n * ADVANCE - 1 }
}

/// Whether the glyph pixel at `(col, row)` is set.
#[inline]
pub fn is_set(rows: &[u8; 7], col: u32, row: u32) -> bool {
    col < GLYPH_W && (row as usize) < rows.len() && rows[row as usize] & (0x10 >> col) != 0
}
