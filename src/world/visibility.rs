//! Torchlight on dark boards.

/// Bitmap of the lit circle around the player, one row per line, the player
/// at the center cell. Bit 14 is the leftmost column.
const CIRCLE_MASK: [u16; 9] = [
    0b000111111111000,
    0b001111111111100,
    0b011111111111110,
    0b011111111111110,
    0b111111111111111,
    0b011111111111110,
    0b011111111111110,
    0b001111111111100,
    0b000111111111000,
];

const CIRCLE_WIDTH: i16 = 15;
const CIRCLE_HEIGHT: i16 = 9;

/// Whether a cell offset `(dx, dy)` from the torch bearer is lit.
pub fn lit(dx: i16, dy: i16) -> bool {
    let x = dx + (CIRCLE_WIDTH - 1) / 2;
    let y = dy + (CIRCLE_HEIGHT - 1) / 2;
    if x < 0 || x >= CIRCLE_WIDTH || y < 0 || y >= CIRCLE_HEIGHT {
        return false;
    }
    (CIRCLE_MASK[y as usize] >> (CIRCLE_WIDTH - 1 - x)) & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_center_is_lit() {
        assert!(lit(0, 0));
    }

    #[test]
    fn the_circle_is_symmetric() {
        for dy in -5..=5 {
            for dx in -8..=8 {
                assert_eq!(lit(dx, dy), lit(-dx, dy));
                assert_eq!(lit(dx, dy), lit(dx, -dy));
            }
        }
    }

    #[test]
    fn corners_and_beyond_are_dark() {
        assert!(!lit(-7, -4));
        assert!(!lit(7, 4));
        assert!(!lit(8, 0));
        assert!(!lit(0, 5));
        assert!(lit(7, 0));
        assert!(lit(0, 4));
    }
}
