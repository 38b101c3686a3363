//! Cursor and selection.
//!
//! The cursor is a board coordinate that is always on the board. The active
//! machine may narrow it further to its own legal cells. While the hand is
//! open, horizontal input moves the hand highlight instead of the cursor.

use serde::Serialize;

use super::board::{Board, Coord, Direction};
use super::piece::{CardId, PieceKey};

/// What the details panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DetailsView {
    Piece(PieceKey),
    HandCard(CardId),
}

/// Hand overlay state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HandView {
    pub open: bool,
    pub selected_index: Option<usize>,
}

impl HandView {
    /// Open with the first card highlighted.
    pub fn open(&mut self) {
        self.open = true;
        self.selected_index = Some(0);
    }

    /// Open again, keeping the previous highlight.
    pub fn reopen(&mut self) {
        self.open = true;
        self.selected_index.get_or_insert(0);
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Move the highlight left or right, clamped to the hand.
    pub fn step(&mut self, dir: Direction, hand_len: usize) -> bool {
        if !dir.is_horizontal() || hand_len == 0 {
            return false;
        }
        let current = self.selected_index.unwrap_or(0).min(hand_len - 1);
        let next = match dir {
            Direction::Left => current.saturating_sub(1),
            _ => (current + 1).min(hand_len - 1),
        };
        self.selected_index = Some(next);
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CursorController {
    pub cursor: Coord,
    pub selected_piece: Option<PieceKey>,
    pub selected_tile: Option<Coord>,
    pub hand: HandView,
    pub details: Option<DetailsView>,
}

impl CursorController {
    pub fn new(cursor: Coord) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    /// Put the cursor on `coord`, clamped onto the board.
    pub fn place(&mut self, board: &Board, coord: Coord) {
        self.cursor = board.clamp(coord);
    }

    /// Step the cursor one cell. With `allowed`, the step only happens if it
    /// lands on one of those cells. Returns the new position when it moved.
    pub fn step(&mut self, board: &Board, dir: Direction, allowed: Option<&[Coord]>) -> Option<Coord> {
        let next = board.clamp(self.cursor.step(dir));
        if next == self.cursor {
            return None;
        }
        if allowed.is_some_and(|cells| !cells.contains(&next)) {
            return None;
        }
        self.cursor = next;
        Some(next)
    }

    pub fn select_piece(&mut self, key: PieceKey) {
        self.selected_piece = Some(key);
    }

    /// Drop the piece selection and anything showing it.
    pub fn clear_selection(&mut self) {
        self.selected_piece = None;
        self.details = None;
    }
}
