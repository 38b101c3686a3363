//! Entity store.
//!
//! Owns the authoritative card and leader collections. Updates replace a
//! piece by its full key and leave everything else untouched; an update for a
//! key that is no longer present is a silent no-op.

use std::collections::HashSet;

use super::board::Coord;
use super::error::{Rejection, SetupError};
use super::piece::{Card, CardId, Leader, Piece, PieceId, PieceKey, PieceKind, PieceRef};

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    cards: Vec<Card>,
    players: Vec<Leader>,
}

impl EntityStore {
    /// Seed the store. Keys must be unique within each kind.
    pub fn new(cards: Vec<Card>, players: Vec<Leader>) -> Result<Self, SetupError> {
        let mut seen = HashSet::new();
        let keys = cards
            .iter()
            .map(Card::key)
            .chain(players.iter().map(Leader::key));
        for key in keys {
            if !seen.insert(key) {
                return Err(SetupError::DuplicatePiece(key));
            }
        }
        Ok(Self { cards, players })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn players(&self) -> &[Leader] {
        &self.players
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn leader(&self, id: PieceId) -> Option<&Leader> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn leader_mut(&mut self, id: PieceId) -> Option<&mut Leader> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Leader by seat index.
    pub fn leader_at(&self, index: usize) -> Option<&Leader> {
        self.players.get(index)
    }

    pub fn leader_at_mut(&mut self, index: usize) -> Option<&mut Leader> {
        self.players.get_mut(index)
    }

    /// Kind-qualified lookup.
    pub fn find(&self, key: PieceKey) -> Option<PieceRef<'_>> {
        match key.kind {
            PieceKind::Card => self.card(key.id).map(PieceRef::Card),
            PieceKind::Player => self.leader(key.id).map(PieceRef::Player),
        }
    }

    /// Every piece carrying `id`, in either namespace.
    ///
    /// A bare id is ambiguous: card 1 and leader 1 both match. Callers get all
    /// matches and must pick by kind.
    pub fn find_by_id(&self, id: PieceId) -> impl Iterator<Item = PieceRef<'_>> {
        self.cards
            .iter()
            .filter(move |c| c.id == id)
            .map(PieceRef::Card)
            .chain(
                self.players
                    .iter()
                    .filter(move |p| p.id == id)
                    .map(PieceRef::Player),
            )
    }

    /// Pieces standing on `coord`, cards first. Stacking is allowed, so there
    /// may be several.
    pub fn pieces_at(&self, coord: Coord) -> impl Iterator<Item = PieceRef<'_>> {
        self.cards
            .iter()
            .map(PieceRef::Card)
            .chain(self.players.iter().map(PieceRef::Player))
            .filter(move |p| p.coord() == coord)
    }

    /// Replace the piece with the same key. Returns whether anything changed.
    pub fn update_piece(&mut self, piece: Piece) -> bool {
        match piece {
            Piece::Card(card) => self.update_card(card),
            Piece::Player(leader) => self.update_leader(leader),
        }
    }

    pub fn update_card(&mut self, card: Card) -> bool {
        match self.card_mut(card.id) {
            Some(slot) => {
                *slot = card;
                true
            }
            None => false,
        }
    }

    pub fn update_leader(&mut self, leader: Leader) -> bool {
        match self.leader_mut(leader.id) {
            Some(slot) => {
                *slot = leader;
                true
            }
            None => false,
        }
    }

    /// Put a new card on the board.
    pub fn insert_card(&mut self, card: Card) -> Result<(), Rejection> {
        if self.card(card.id).is_some() {
            return Err(Rejection::DuplicatePiece(card.key()));
        }
        self.cards.push(card);
        Ok(())
    }
}
