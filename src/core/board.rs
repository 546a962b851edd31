//! Board geometry.
//!
//! Every token walks 58 steps: 52 cells of the shared ring followed by a
//! private 6-cell lane. Steps are counted from the owner's start cell, so
//! step `s` means the same cell for every color (the ring is treated as
//! color-agnostic).
//!
//! ```text
//!  0 ............................ 51 | 52 ... 56 | 57
//!  shared open path (capturable)      private lane  finish
//! ```

/// Cells on the shared ring.
pub const TRACK_LENGTH: u8 = 52;

/// Cells in the private lane, including the finish cell.
pub const LANE_LENGTH: u8 = 6;

/// Step index of the finish cell.
pub const FINISH_STEP: u8 = TRACK_LENGTH + LANE_LENGTH - 1;

/// Dice value needed to bring a token out of home.
pub const ENTRY_ROLL: u8 = 6;

/// Ring cells where no capture can happen.
pub const SAFE_CELLS: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

/// Cells one step before a safe cell. Favoured by the bot.
pub const STRATEGIC_CELLS: [u8; 8] = [7, 12, 20, 25, 33, 38, 46, 51];

/// Whether `step` is a safe ring cell.
#[must_use]
pub fn is_safe_cell(step: u8) -> bool {
    SAFE_CELLS.contains(&step)
}

/// Whether `step` lies on the shared ring.
#[must_use]
pub const fn is_open_path(step: u8) -> bool {
    step < TRACK_LENGTH
}

/// Whether a token landing on `step` can capture (or be captured).
#[must_use]
pub fn is_capturable(step: u8) -> bool {
    is_open_path(step) && !is_safe_cell(step)
}

/// Whether `step` is one of the bot's strategic cells.
#[must_use]
pub fn is_strategic_cell(step: u8) -> bool {
    STRATEGIC_CELLS.contains(&step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_constants() {
        assert_eq!(FINISH_STEP, 57);
        assert_eq!(TRACK_LENGTH + LANE_LENGTH, 58);
    }

    #[test]
    fn test_safe_cells_never_capturable() {
        for step in SAFE_CELLS {
            assert!(!is_capturable(step));
        }
    }

    #[test]
    fn test_lane_never_capturable() {
        for step in TRACK_LENGTH..=FINISH_STEP {
            assert!(!is_open_path(step));
            assert!(!is_capturable(step));
        }
    }

    #[test]
    fn test_strategic_cells_precede_safe_cells() {
        for (strategic, safe) in STRATEGIC_CELLS.iter().zip(SAFE_CELLS.iter().skip(1)) {
            assert_eq!(strategic + 1, *safe);
        }
        assert_eq!(STRATEGIC_CELLS[7], TRACK_LENGTH - 1);
        assert!(is_capturable(10));
    }
}
