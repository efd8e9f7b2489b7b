//! Switch matrix state decoding.
//!
//! The firmware reports the live scan matrix as a row-major bit-packed
//! bitmap: one bit per key, eight keys per byte, least-significant bit
//! first, so a key's column is `byte_in_row * 8 + bit`. The protocol
//! never negotiates matrix dimensions, so the column count is a
//! configuration input; 16 columns is the de-facto default used by
//! existing hosts but is wrong for wider matrices.

use std::collections::BTreeSet;

use serde::Serialize;

/// Scan matrix dimensions, required for bitmap decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatrixDims {
    pub rows: u8,
    pub cols: u8,
}

impl MatrixDims {
    pub const fn new(rows: u8, cols: u8) -> Self {
        Self { rows, cols }
    }

    /// Bitmap bytes occupied by one row.
    pub const fn bytes_per_row(&self) -> usize {
        (self.cols as usize).div_ceil(8)
    }

    /// Total bitmap length for the full matrix.
    pub const fn bitmap_len(&self) -> usize {
        self.rows as usize * self.bytes_per_row()
    }

    /// Keymap bytes for one layer (one big-endian u16 keycode per
    /// matrix position).
    pub const fn layer_size(&self) -> usize {
        self.rows as usize * self.cols as usize * 2
    }
}

impl Default for MatrixDims {
    /// The conventional compact-keyboard matrix shape.
    fn default() -> Self {
        Self { rows: 6, cols: 16 }
    }
}

/// The set of physically pressed key coordinates.
///
/// An empty set is the normal "no keys pressed" state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatrixState {
    pub pressed: BTreeSet<(u8, u8)>,
}

impl MatrixState {
    /// Decode a row-major bitmap into pressed (row, col) coordinates.
    ///
    /// Bytes beyond the matrix size are ignored; a short bitmap decodes
    /// whatever rows it covers.
    pub fn decode(bitmap: &[u8], dims: MatrixDims) -> Self {
        let bytes_per_row = dims.bytes_per_row();
        let mut pressed = BTreeSet::new();
        for (index, &byte) in bitmap.iter().take(dims.bitmap_len()).enumerate() {
            if byte == 0 {
                continue;
            }
            let row = (index / bytes_per_row) as u8;
            let byte_in_row = index % bytes_per_row;
            for bit in 0..8 {
                let col = (byte_in_row * 8 + bit) as u8;
                if byte & (1 << bit) != 0 && col < dims.cols {
                    pressed.insert((row, col));
                }
            }
        }
        Self { pressed }
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    pub fn contains(&self, row: u8, col: u8) -> bool {
        self.pressed.contains(&(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_byte_bit_zero_is_column_eight() {
        let mut bitmap = [0u8; 12];
        bitmap[1] = 0x01;
        let state = MatrixState::decode(&bitmap, MatrixDims::default());
        assert_eq!(state.pressed.into_iter().collect::<Vec<_>>(), [(0, 8)]);
    }

    #[test]
    fn all_zero_bitmap_is_empty() {
        let state = MatrixState::decode(&[0u8; 12], MatrixDims::default());
        assert!(state.is_empty());
    }

    #[test]
    fn rows_advance_every_bytes_per_row() {
        // 16 columns = 2 bytes per row; byte 2 starts row 1.
        let mut bitmap = [0u8; 12];
        bitmap[2] = 0b0000_0101;
        let state = MatrixState::decode(&bitmap, MatrixDims::new(6, 16));
        assert!(state.contains(1, 0));
        assert!(state.contains(1, 2));
        assert_eq!(state.pressed.len(), 2);
    }

    #[test]
    fn narrow_matrix_ignores_padding_bits() {
        // 14 columns still packs 2 bytes per row; bits 14-15 are padding.
        let dims = MatrixDims::new(5, 14);
        assert_eq!(dims.bytes_per_row(), 2);
        let bitmap = [0x00, 0xC0, 0x00, 0x00];
        let state = MatrixState::decode(&bitmap, dims);
        assert!(state.is_empty());
    }

    #[test]
    fn layer_size_counts_two_bytes_per_position() {
        assert_eq!(MatrixDims::new(6, 16).layer_size(), 192);
    }
}
