//! Summoning machine.
//!
//! Deploys a card from the leader's hand onto the board in three decisions.
//! Each forward command takes exactly one step; cancel undoes exactly one.
//!
//! # State Diagram
//!
//! ```text
//!           start            confirm_target        select_card        resolve
//! ┌──────┐ ──────▶ ┌────────┐ ──────────▶ ┌──────┐ ──────────▶ ┌─────────┐ ──────▶ (cleared)
//! │ Idle │         │ Target │             │ Card │             │ Confirm │
//! └──────┘ ◀────── └────────┘ ◀────────── └──────┘ ◀────────── └─────────┘
//!           cancel               cancel               cancel
//! ```
//!
//! Target cells are the Chebyshev ring around the leader clipped to the
//! board. Occupancy is not checked; summoning onto an occupied cell stacks.

use serde::Serialize;

use super::board::{Board, Coord, Position, TILE_Z};
use super::error::Rejection;
use super::piece::{Card, CardId, PieceKey};
use super::store::EntityStore;

/// Default radius of legal summon targets around the leader.
pub const DEFAULT_SUMMON_RADIUS: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummonPhase {
    /// Choosing the board cell.
    Target,
    /// Choosing the card from the open hand.
    Card,
    /// Reviewing the choice.
    Confirm,
}

impl SummonPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Card => "card",
            Self::Confirm => "confirm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummoningState {
    pub phase: SummonPhase,
    pub target_tile: Option<Position>,
    pub selected_card_id: Option<CardId>,
    pub player_index: usize,
}

impl SummoningState {
    /// Enter the target phase for the leader at `player_index`.
    pub fn start(player_index: usize) -> Self {
        Self {
            phase: SummonPhase::Target,
            target_tile: None,
            selected_card_id: None,
            player_index,
        }
    }

    /// Fix the target cell and open the hand.
    pub fn confirm_target(&mut self, coord: Coord, legal: &[Coord]) -> Result<(), Rejection> {
        if self.phase != SummonPhase::Target {
            return Err(Rejection::WrongPhase);
        }
        if !legal.contains(&coord) {
            return Err(Rejection::IllegalSummonTarget(coord));
        }
        self.target_tile = Some(Position::at(coord, TILE_Z));
        self.phase = SummonPhase::Card;
        Ok(())
    }

    /// Pick the card at `index` in `hand` and close the hand.
    pub fn select_card(&mut self, hand: &[CardId], index: usize) -> Result<CardId, Rejection> {
        if self.phase != SummonPhase::Card {
            return Err(Rejection::WrongPhase);
        }
        let card_id = *hand.get(index).ok_or(Rejection::HandIndexOutOfRange {
            index,
            len: hand.len(),
        })?;
        self.selected_card_id = Some(card_id);
        self.phase = SummonPhase::Confirm;
        Ok(card_id)
    }

    /// Undo the most recent decision. Returns `None` when backing out of the
    /// target phase, which ends the summoning.
    pub fn step_back(mut self) -> Option<Self> {
        match self.phase {
            SummonPhase::Confirm => {
                self.phase = SummonPhase::Card;
                self.selected_card_id = None;
                Some(self)
            }
            SummonPhase::Card => {
                self.phase = SummonPhase::Target;
                self.selected_card_id = None;
                Some(self)
            }
            SummonPhase::Target => None,
        }
    }

    /// Place the selected card on the target cell.
    ///
    /// The card leaves the hand, joins `cards_in_play`, and enters the board
    /// face down in attack stance. Nothing is written unless every check
    /// passes.
    pub fn resolve(&self, store: &mut EntityStore) -> Result<PieceKey, Rejection> {
        if self.phase != SummonPhase::Confirm {
            return Err(Rejection::WrongPhase);
        }
        let (Some(card_id), Some(target)) = (self.selected_card_id, self.target_tile) else {
            return Err(Rejection::WrongPhase);
        };

        let leader = store
            .leader_at(self.player_index)
            .ok_or(Rejection::LeaderNotFound(self.player_index))?;
        let hand_index = leader
            .hand
            .iter()
            .position(|&id| id == card_id)
            .ok_or(Rejection::CardNotInHand(card_id))?;
        let summoned = Card {
            owner: leader.owner,
            position: target,
            is_face_down: true,
            is_defense_mode: false,
            ..leader
                .card_data(card_id)
                .ok_or(Rejection::CardNotInHand(card_id))?
                .clone()
        };
        let key = summoned.key();

        store.insert_card(summoned)?;
        if let Some(leader) = store.leader_at_mut(self.player_index) {
            leader.hand.remove(hand_index);
            leader.cards_in_play.push(card_id);
        }
        Ok(key)
    }
}

/// Legal summon targets for a leader standing on `leader`.
pub fn summon_targets(board: &Board, leader: Coord, radius: i32) -> Vec<Coord> {
    leader
        .chebyshev_ring(radius)
        .filter(|c| board.is_in_bounds(*c))
        .collect()
}
