//! Staging machine.
//!
//! Staging is a single-piece transaction. Selecting a piece snapshots it;
//! moves, flips and stance changes then write straight to the store so the
//! view can show them, and the session ends with either a commit (the piece
//! is marked as acted) or a cancel (the snapshot is written back).
//!
//! # State Diagram
//!
//! ```text
//!            begin                     commit / cancel
//! ┌──────┐ ─────────▶ ┌──────────┐ ─────────────────────▶ ┌──────┐
//! │ Idle │            │  Active  │                        │ Idle │
//! └──────┘            └──────────┘                        └──────┘
//!                       │  ▲
//!                       └──┘ record_move / flip / reorient
//! ```
//!
//! The change flags track divergence from the snapshot rather than "was
//! touched": flipping a card twice leaves `has_flipped == false`.

use serde::Serialize;

use super::board::{Board, Coord, Position};
use super::error::Rejection;
use super::piece::{Card, Leader, PieceKey, PieceKind, PieceRef};
use super::store::EntityStore;
use super::turn::TurnState;

/// Snapshot and change flags for the staged piece.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagingState {
    #[serde(rename = "piece_id")]
    pub piece: PieceKey,
    pub original_position: Position,
    pub original_is_face_down: Option<bool>,
    pub original_is_defense_mode: Option<bool>,
    pub has_moved: bool,
    pub has_flipped: bool,
    pub has_changed_position: bool,
    /// Set on the first move away from the origin; never cleared.
    #[serde(skip)]
    left_origin: bool,
}

/// Result of committing a staging session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing diverged from the snapshot; the turn is not spent.
    Unchanged,
    /// The piece is now marked as acted.
    Committed {
        moved: bool,
        flipped: bool,
        changed_position: bool,
    },
}

impl StagingState {
    /// Open a session on `piece`.
    ///
    /// The piece must belong to the turn owner and must not have acted. The
    /// caller guarantees no other session is live.
    pub fn begin(
        piece: PieceRef<'_>,
        turn: &TurnState,
        players: &[Leader],
    ) -> Result<Self, Rejection> {
        let key = piece.key();
        if !turn.is_turn_owner(piece.owner(), players) {
            return Err(Rejection::NotTurnOwner(key));
        }
        if turn.has_acted(key) {
            return Err(Rejection::AlreadyActed(key));
        }

        let card = piece.as_card();
        Ok(Self {
            piece: key,
            original_position: piece.position(),
            original_is_face_down: card.map(|c| c.is_face_down),
            original_is_defense_mode: card.map(|c| c.is_defense_mode),
            has_moved: false,
            has_flipped: false,
            has_changed_position: false,
            left_origin: false,
        })
    }

    pub fn original_coord(&self) -> Coord {
        self.original_position.coord()
    }

    /// Cardinal neighbours of the original cell that lie on the board, plus
    /// the original cell itself. Moves never chain from the live position.
    pub fn legal_destinations(&self, board: &Board) -> Vec<Coord> {
        let origin = self.original_coord();
        origin
            .cardinal_neighbors()
            .into_iter()
            .filter(|c| board.is_in_bounds(*c))
            .chain(std::iter::once(origin))
            .collect()
    }

    pub fn is_legal_destination(&self, board: &Board, coord: Coord) -> bool {
        board.is_in_bounds(coord) && self.legal_destinations(board).contains(&coord)
    }

    /// Whether `reorient` is still allowed.
    pub fn can_reorient(&self) -> bool {
        self.piece.is_card() && !self.left_origin
    }

    /// Whether `flip` is allowed. A card that started face up stays face up.
    pub fn can_flip(&self) -> bool {
        self.piece.is_card() && self.original_is_face_down != Some(false)
    }

    pub fn has_changes(&self) -> bool {
        self.has_moved || self.has_flipped || self.has_changed_position
    }

    /// Move the staged piece to `dest`.
    ///
    /// Cards are forced into attack stance by any move.
    pub fn record_move(
        &mut self,
        store: &mut EntityStore,
        board: &Board,
        dest: Coord,
    ) -> Result<(), Rejection> {
        if !board.is_in_bounds(dest) {
            return Err(Rejection::OutOfBounds(dest));
        }
        if !self.is_legal_destination(board, dest) {
            return Err(Rejection::IllegalDestination(dest));
        }

        match self.piece.kind {
            PieceKind::Card => {
                let mut card = self.live_card(store)?.clone();
                card.position = card.position.moved_to(dest);
                card.is_defense_mode = false;
                self.has_changed_position = self.stance_diverges(&card);
                store.update_card(card);
            }
            PieceKind::Player => {
                let leader = store
                    .leader_mut(self.piece.id)
                    .ok_or(Rejection::PieceNotFound(self.piece))?;
                leader.position = leader.position.moved_to(dest);
            }
        }

        self.has_moved = dest != self.original_coord();
        if self.has_moved {
            self.left_origin = true;
        }
        Ok(())
    }

    /// Toggle the staged card face down / face up.
    pub fn flip(&mut self, store: &mut EntityStore) -> Result<(), Rejection> {
        if !self.piece.is_card() {
            return Err(Rejection::NotACard(self.piece));
        }
        if !self.can_flip() {
            return Err(Rejection::RevealedCard);
        }

        let mut card = self.live_card(store)?.clone();
        card.is_face_down = !card.is_face_down;
        self.has_flipped = self.original_is_face_down.is_some_and(|o| o != card.is_face_down);
        store.update_card(card);
        Ok(())
    }

    /// Toggle the staged card between attack and defense stance.
    pub fn reorient(&mut self, store: &mut EntityStore) -> Result<(), Rejection> {
        if !self.piece.is_card() {
            return Err(Rejection::NotACard(self.piece));
        }
        if !self.can_reorient() {
            return Err(Rejection::AlreadyMoved);
        }

        let mut card = self.live_card(store)?.clone();
        if card.position.coord() != self.original_coord() {
            return Err(Rejection::AlreadyMoved);
        }
        card.is_defense_mode = !card.is_defense_mode;
        self.has_changed_position = self.stance_diverges(&card);
        store.update_card(card);
        Ok(())
    }

    /// Close the session, spending the piece's action if anything changed.
    pub fn commit(self, turn: &mut TurnState) -> CommitOutcome {
        if !self.has_changes() {
            return CommitOutcome::Unchanged;
        }
        turn.mark_acted(self.piece);
        CommitOutcome::Committed {
            moved: self.has_moved,
            flipped: self.has_flipped,
            changed_position: self.has_changed_position,
        }
    }

    /// Write the snapshot back and close the session.
    ///
    /// A piece that vanished from the store is left alone.
    pub fn cancel(self, store: &mut EntityStore) {
        match self.piece.kind {
            PieceKind::Card => {
                if let Some(card) = store.card_mut(self.piece.id) {
                    card.position = self.original_position;
                    if let Some(face_down) = self.original_is_face_down {
                        card.is_face_down = face_down;
                    }
                    if let Some(defense) = self.original_is_defense_mode {
                        card.is_defense_mode = defense;
                    }
                }
            }
            PieceKind::Player => {
                if let Some(leader) = store.leader_mut(self.piece.id) {
                    leader.position = self.original_position;
                }
            }
        }
    }

    fn live_card<'s>(&self, store: &'s EntityStore) -> Result<&'s Card, Rejection> {
        store
            .card(self.piece.id)
            .ok_or(Rejection::PieceNotFound(self.piece))
    }

    fn stance_diverges(&self, card: &Card) -> bool {
        self.original_is_defense_mode
            .is_some_and(|o| o != card.is_defense_mode)
    }
}
