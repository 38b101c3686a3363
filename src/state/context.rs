//! Game context.
//!
//! One owning object for every piece of session state: the board, the entity
//! store, the turn tracker, the active interaction mode and the cursor. The
//! dispatcher is its only writer; the view layer reads [`Snapshot`]s.
//!
//! Staging and summoning share a single [`Mode`] slot, so a staged piece and
//! a summoning in progress can never coexist.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::board::{Board, Coord, Terrain, Tile};
use super::config::GameConfig;
use super::cursor::{CursorController, DetailsView};
use super::error::SetupError;
use super::piece::{Card, CardId, Leader, Piece, PieceKey, PieceRef};
use super::staging::StagingState;
use super::store::EntityStore;
use super::summoning::{summon_targets, SummonPhase, SummoningState};
use super::turn::TurnState;

/// Which machine, if any, currently owns input.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Mode {
    #[default]
    Idle,
    Staging(StagingState),
    Summoning(SummoningState),
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Staging(_) => "staging",
            Self::Summoning(_) => "summoning",
        }
    }
}

/// Initial pieces and tiles of a session.
#[derive(Debug, Clone, Default)]
pub struct GameSetup {
    pub players: Vec<Leader>,
    pub cards: Vec<Card>,
    /// Generated tiles. Left empty, the board is filled with normal terrain.
    pub tiles: Vec<Tile>,
}

impl GameSetup {
    pub fn new(players: Vec<Leader>, cards: Vec<Card>) -> Self {
        Self {
            players,
            cards,
            tiles: Vec::new(),
        }
    }

    pub fn with_tiles(mut self, tiles: Vec<Tile>) -> Self {
        self.tiles = tiles;
        self
    }
}

/// A committed entry in the session history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRecord {
    pub turn_owner_index: usize,
    pub action: RecordedAction,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordedAction {
    Committed {
        piece: PieceKey,
        moved: bool,
        flipped: bool,
        changed_position: bool,
    },
    Summoned {
        card: PieceKey,
        leader: PieceKey,
        target: Coord,
    },
}

#[derive(Debug, Clone)]
pub struct GameContext {
    pub(super) config: GameConfig,
    pub(super) board: Board,
    pub(super) store: EntityStore,
    pub(super) turn: TurnState,
    pub(super) mode: Mode,
    pub(super) ui: CursorController,
    /// Seat of the local player.
    pub(super) player_index: usize,
    pub(super) history: Vec<ActionRecord>,
    pub(super) created_at: DateTime<Utc>,
}

impl GameContext {
    /// Seed a session.
    ///
    /// The leader flagged `first_move` becomes the local seat and the first
    /// turn owner, and draws the opening hand from the top of its deck.
    pub fn new(config: GameConfig, setup: GameSetup) -> Result<Self, SetupError> {
        config.validate()?;

        let board = if setup.tiles.is_empty() {
            Board::uniform(config.board_size, Terrain::Normal)?
        } else {
            Board::new(config.board_size, setup.tiles)?
        };

        check_card_ids(&setup.cards, &setup.players)?;

        let mut players = setup.players;
        let player_index = players
            .iter()
            .position(|p| p.first_move)
            .ok_or(SetupError::NoFirstPlayer)?;
        players[player_index].draw(config.opening_hand_size);

        let store = EntityStore::new(setup.cards, players)?;
        let out_of_bounds = store
            .cards()
            .iter()
            .map(PieceRef::Card)
            .chain(store.players().iter().map(PieceRef::Player))
            .find(|p| !board.is_in_bounds(p.coord()));
        if let Some(piece) = out_of_bounds {
            return Err(SetupError::PieceOutOfBounds(piece.key()));
        }

        let cursor = store.players()[player_index].position.coord();

        info!(
            target: "duelist::context",
            board_size = config.board_size,
            players = store.players().len(),
            cards = store.cards().len(),
            player_index,
            "game session created"
        );

        Ok(Self {
            config,
            board,
            store,
            turn: TurnState::new(player_index),
            mode: Mode::Idle,
            ui: CursorController::new(cursor),
            player_index,
            history: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn staging(&self) -> Option<&StagingState> {
        match &self.mode {
            Mode::Staging(s) => Some(s),
            _ => None,
        }
    }

    pub fn summoning(&self) -> Option<&SummoningState> {
        match &self.mode {
            Mode::Summoning(s) => Some(s),
            _ => None,
        }
    }

    pub fn cursor(&self) -> Coord {
        self.ui.cursor
    }

    pub fn ui(&self) -> &CursorController {
        &self.ui
    }

    pub fn player_index(&self) -> usize {
        self.player_index
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The local player's leader.
    pub fn local_leader(&self) -> Option<&Leader> {
        self.store.leader_at(self.player_index)
    }

    pub fn is_users_turn(&self) -> bool {
        self.turn.turn_owner_index == self.player_index && self.local_leader().is_some()
    }

    /// Whether a summoning could start right now.
    pub fn can_summon(&self) -> bool {
        self.is_users_turn() && matches!(self.mode, Mode::Idle)
    }

    pub fn selected_piece(&self) -> Option<PieceRef<'_>> {
        self.ui.selected_piece.and_then(|key| self.store.find(key))
    }

    pub fn selected_tile(&self) -> Option<&Tile> {
        self.ui.selected_tile.and_then(|c| self.board.tile_at(c))
    }

    /// Ids in the local leader's hand.
    pub fn hand_ids(&self) -> &[CardId] {
        self.local_leader().map(|l| l.hand.as_slice()).unwrap_or(&[])
    }

    /// Card data for the local leader's hand, in hand order.
    pub fn hand_cards(&self) -> Vec<&Card> {
        self.local_leader()
            .map(|l| l.hand.iter().filter_map(|&id| l.card_data(id)).collect())
            .unwrap_or_default()
    }

    pub fn show_hand(&self) -> bool {
        self.ui.hand.open
    }

    /// Cells the staged piece may move to, empty when nothing is staged.
    pub fn legal_move_targets(&self) -> Vec<Coord> {
        self.staging()
            .map(|s| s.legal_destinations(&self.board))
            .unwrap_or_default()
    }

    /// Cells a summon may target, empty outside the target phase.
    pub fn legal_summon_targets(&self) -> Vec<Coord> {
        self.summoning()
            .filter(|s| s.phase == SummonPhase::Target)
            .map(|s| self.summon_targets_for(s.player_index))
            .unwrap_or_default()
    }

    pub(super) fn summon_targets_for(&self, player_index: usize) -> Vec<Coord> {
        self.store
            .leader_at(player_index)
            .map(|l| summon_targets(&self.board, l.position.coord(), self.config.summon_radius))
            .unwrap_or_default()
    }

    /// Hand the turn to seat `index`.
    ///
    /// Entry point for the round controller. Any live staging is reverted and
    /// any summoning abandoned before the acted set is cleared.
    pub fn begin_turn(&mut self, index: usize) {
        self.reset_interaction();
        self.turn.begin_turn(index);
        info!(target: "duelist::context", turn_owner_index = index, "turn started");
    }

    /// Drop whatever machine is live, reverting staged edits.
    pub(super) fn reset_interaction(&mut self) {
        match std::mem::take(&mut self.mode) {
            Mode::Staging(staging) => staging.cancel(&mut self.store),
            Mode::Summoning(_) | Mode::Idle => {}
        }
        self.ui.hand.close();
        self.ui.hand.selected_index = None;
        self.ui.clear_selection();
    }

    pub(super) fn record(&mut self, action: RecordedAction) {
        self.history.push(ActionRecord {
            turn_owner_index: self.turn.turn_owner_index,
            action,
            at: Utc::now(),
        });
    }

    /// Owned read model for the view layer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            turn_state: self.turn.clone(),
            staging_state: self.staging().cloned(),
            summoning_state: self.summoning().cloned(),
            selected_tile_piece: self.selected_piece().map(|p| p.to_owned()),
            selected_tile: self.selected_tile().cloned(),
            cursor_position: self.ui.cursor,
            cards: self.store.cards().to_vec(),
            players: self.store.players().to_vec(),
            tiles: self.board.tiles().to_vec(),
            hand_cards: self.hand_cards().into_iter().cloned().collect(),
            show_hand: self.ui.hand.open,
            hand_selected_index: self.ui.hand.selected_index,
            details: self.ui.details,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.snapshot().to_json()
    }
}

/// Summons insert catalogue cards by id, so every id a leader could still
/// play must be free on the board and unique across leaders.
fn check_card_ids(cards: &[Card], players: &[Leader]) -> Result<(), SetupError> {
    let mut seen: HashSet<CardId> = cards.iter().map(|c| c.id).collect();
    let playable = players
        .iter()
        .flat_map(|l| l.deck.iter().chain(l.hand.iter()));
    for &id in playable {
        if !seen.insert(id) {
            return Err(SetupError::CardIdCollision(id));
        }
    }
    Ok(())
}

/// Everything the view layer reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub turn_state: TurnState,
    pub staging_state: Option<StagingState>,
    pub summoning_state: Option<SummoningState>,
    pub selected_tile_piece: Option<Piece>,
    pub selected_tile: Option<Tile>,
    pub cursor_position: Coord,
    pub cards: Vec<Card>,
    pub players: Vec<Leader>,
    pub tiles: Vec<Tile>,
    pub hand_cards: Vec<Card>,
    pub show_hand: bool,
    pub hand_selected_index: Option<usize>,
    pub details: Option<DetailsView>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
