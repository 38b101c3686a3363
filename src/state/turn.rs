//! Turn tracking.
//!
//! Holds whose turn it is and which pieces already acted during it. Advancing
//! the turn belongs to the round controller embedding this crate; see
//! [`TurnState::begin_turn`].

use serde::{Deserialize, Serialize};

use super::piece::{Leader, Owner, PieceKey};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Seat index of the player whose turn it is.
    pub turn_owner_index: usize,

    /// Pieces that committed an action this turn, without duplicates.
    acted_piece_ids: Vec<PieceKey>,
}

impl TurnState {
    pub fn new(turn_owner_index: usize) -> Self {
        Self {
            turn_owner_index,
            acted_piece_ids: Vec::new(),
        }
    }

    pub fn has_acted(&self, key: PieceKey) -> bool {
        self.acted_piece_ids.contains(&key)
    }

    /// Record that a piece acted. Returns false if it was already recorded.
    pub fn mark_acted(&mut self, key: PieceKey) -> bool {
        if self.has_acted(key) {
            return false;
        }
        self.acted_piece_ids.push(key);
        true
    }

    pub fn acted(&self) -> &[PieceKey] {
        &self.acted_piece_ids
    }

    /// The leader whose turn it is.
    pub fn turn_owner<'a>(&self, players: &'a [Leader]) -> Option<&'a Leader> {
        players.get(self.turn_owner_index)
    }

    /// Whether pieces owned by `owner` belong to the turn owner.
    pub fn is_turn_owner(&self, owner: Owner, players: &[Leader]) -> bool {
        self.turn_owner(players).is_some_and(|l| l.owner == owner)
    }

    /// Hand the turn to `index` and forget who acted.
    pub fn begin_turn(&mut self, index: usize) {
        self.turn_owner_index = index;
        self.acted_piece_ids.clear();
    }
}
