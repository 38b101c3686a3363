//! Command dispatcher.
//!
//! [`GameContext::dispatch`] is the single entry point for player input. Each
//! command is routed by the active [`Mode`] and either applied atomically or
//! declined without touching any state. Declines are logged and reported as
//! [`Dispatch::Ignored`]; they are never errors for the caller.
//!
//! Select is resolved in a fixed order, first match wins:
//!
//! 1. A summoning in progress takes the command for its current phase.
//! 2. Targeting the staged piece's live cell commits the staging.
//! 3. Targeting a legal staging destination moves the staged piece there.
//! 4. Outside the local player's turn, pieces can only be inspected.
//! 5. Otherwise a piece that has not acted starts staging.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::board::{Coord, Direction, Tile};
use super::context::{GameContext, Mode, RecordedAction};
use super::cursor::DetailsView;
use super::error::Rejection;
use super::piece::{CardId, Leader, PieceKey};
use super::staging::{CommitOutcome, StagingState};
use super::summoning::{SummonPhase, SummoningState};

/// Optional targets carried by a select.
///
/// `coord` is a pointer on a board cell, `tile` a click on the bare board
/// surface, `hand_card` a click on a card in the open hand. With nothing set,
/// the select applies to the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectArgs {
    pub piece: Option<PieceKey>,
    pub coord: Option<Coord>,
    pub tile: Option<Coord>,
    pub hand_card: Option<CardId>,
}

impl SelectArgs {
    pub fn piece(key: PieceKey) -> Self {
        Self {
            piece: Some(key),
            ..Self::default()
        }
    }

    pub fn coord(coord: Coord) -> Self {
        Self {
            coord: Some(coord),
            ..Self::default()
        }
    }

    pub fn tile(coord: Coord) -> Self {
        Self {
            tile: Some(coord),
            ..Self::default()
        }
    }

    pub fn hand_card(id: CardId) -> Self {
        Self {
            hand_card: Some(id),
            ..Self::default()
        }
    }
}

/// A discrete player intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum Command {
    Select(SelectArgs),
    Cancel,
    MoveCursor(Direction),
    MoveStaged(Direction),
    Flip,
    Reorient,
    StartSummon,
    ToggleDetails,
    ToggleHand,
}

impl Command {
    /// Select at the cursor.
    pub fn select() -> Self {
        Self::Select(SelectArgs::default())
    }
}

/// What happened to a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    Ignored(Rejection),
}

impl Dispatch {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied => None,
            Self::Ignored(reason) => Some(reason),
        }
    }
}

impl GameContext {
    /// Apply one command.
    pub fn dispatch(&mut self, command: Command) -> Dispatch {
        let result = match command {
            Command::Select(args) => self.select(args),
            Command::Cancel => self.cancel(),
            Command::MoveCursor(dir) => self.move_cursor(dir),
            Command::MoveStaged(dir) => self.move_staged(dir),
            Command::Flip => self.flip(),
            Command::Reorient => self.reorient(),
            Command::StartSummon => self.start_summon(),
            Command::ToggleDetails => self.toggle_details(),
            Command::ToggleHand => self.toggle_hand(),
        };

        match result {
            Ok(()) => {
                trace!(
                    target: "duelist::dispatch",
                    ?command,
                    mode = self.mode.as_str(),
                    "command applied"
                );
                Dispatch::Applied
            }
            Err(reason) => {
                debug!(target: "duelist::dispatch", ?command, %reason, "command ignored");
                Dispatch::Ignored(reason)
            }
        }
    }

    fn select(&mut self, args: SelectArgs) -> Result<(), Rejection> {
        if matches!(self.mode, Mode::Summoning(_)) {
            return self.select_while_summoning(args);
        }

        let pointed = args.coord.or(args.tile);
        let target = match (pointed, args.piece) {
            (Some(coord), _) => coord,
            (None, Some(key)) => self
                .store
                .find(key)
                .ok_or(Rejection::PieceNotFound(key))?
                .coord(),
            (None, None) => self.ui.cursor,
        };
        if !self.board.is_in_bounds(target) {
            return Err(Rejection::OutOfBounds(target));
        }

        // The cursor follows the target only once the select applies.
        let staged = self.staging().map(|s| {
            let on_piece = self
                .store
                .find(s.piece)
                .is_some_and(|p| p.coord() == target);
            (on_piece, s.is_legal_destination(&self.board, target))
        });
        if let Some((on_piece, legal)) = staged {
            if on_piece {
                self.commit_staging()?;
                self.ui.cursor = target;
                return Ok(());
            }
            if legal {
                return self.move_staged_to(target);
            }
            if args.tile.is_none() {
                return Err(Rejection::StagingActive);
            }
            // Clicking away on the bare board abandons the staged edits.
            self.cancel_staging();
        }

        if let Some(tile) = args.tile {
            self.ui.cursor = target;
            self.ui.selected_tile = Some(tile);
            self.ui.clear_selection();
            return Ok(());
        }

        let key = match args.piece {
            Some(key) => key,
            None => self
                .store
                .pieces_at(target)
                .next()
                .map(|p| p.key())
                .ok_or(Rejection::NothingSelected)?,
        };
        if self.ui.selected_piece == Some(key) {
            return Err(Rejection::AlreadySelected(key));
        }
        let piece = self.store.find(key).ok_or(Rejection::PieceNotFound(key))?;

        if !self.is_users_turn() {
            debug!(target: "duelist::dispatch", piece = %key, "view-only selection");
            self.ui.cursor = target;
            self.ui.select_piece(key);
            return Ok(());
        }

        match StagingState::begin(piece, &self.turn, self.store.players()) {
            Ok(staging) => {
                info!(target: "duelist::staging", piece = %key, "staging started");
                self.mode = Mode::Staging(staging);
            }
            Err(reason) => {
                debug!(target: "duelist::dispatch", piece = %key, %reason, "view-only selection");
            }
        }
        self.ui.cursor = target;
        self.ui.select_piece(key);
        Ok(())
    }

    fn select_while_summoning(&mut self, args: SelectArgs) -> Result<(), Rejection> {
        let summoning = self.summoning().ok_or(Rejection::NoSummoning)?;
        let phase = summoning.phase;
        let player_index = summoning.player_index;
        let pointed = args.coord.or(args.tile);

        match phase {
            SummonPhase::Target => {
                let coord = match (pointed, args.piece) {
                    (Some(coord), _) => coord,
                    (None, Some(key)) => self
                        .store
                        .find(key)
                        .ok_or(Rejection::PieceNotFound(key))?
                        .coord(),
                    (None, None) => self.ui.cursor,
                };
                let legal = self.summon_targets_for(player_index);
                self.summoning_mut()?.confirm_target(coord, &legal)?;
                self.ui.cursor = coord;
                self.ui.hand.open();
                debug!(target: "duelist::summoning", cell = %coord, "summon target fixed");
                Ok(())
            }
            // Board clicks are ignored once the hand is involved.
            _ if pointed.is_some() => Err(Rejection::WrongPhase),
            SummonPhase::Confirm if args.piece.is_some() => Err(Rejection::WrongPhase),
            SummonPhase::Card => {
                let hand = self
                    .store
                    .leader_at(player_index)
                    .ok_or(Rejection::LeaderNotFound(player_index))?
                    .hand
                    .clone();
                let picked = match (args.hand_card, args.piece) {
                    (Some(id), _) => Some(id),
                    (None, Some(key)) if key.is_card() => Some(key.id),
                    // Leaders never sit in a hand.
                    (None, Some(_)) => return Err(Rejection::WrongPhase),
                    (None, None) => None,
                };
                let index = match picked {
                    Some(id) => hand
                        .iter()
                        .position(|&h| h == id)
                        .ok_or(Rejection::CardNotInHand(id))?,
                    None => self.ui.hand.selected_index.ok_or(Rejection::NothingSelected)?,
                };
                let card = self.summoning_mut()?.select_card(&hand, index)?;
                self.ui.hand.selected_index = Some(index);
                self.ui.hand.close();
                debug!(target: "duelist::summoning", card, "summon card chosen");
                Ok(())
            }
            SummonPhase::Confirm => self.confirm_summon(),
        }
    }

    fn confirm_summon(&mut self) -> Result<(), Rejection> {
        if !self.is_users_turn() {
            return Err(Rejection::NotYourTurn);
        }
        let Mode::Summoning(summoning) = &self.mode else {
            return Err(Rejection::NoSummoning);
        };

        let leader = self
            .store
            .leader_at(summoning.player_index)
            .map(Leader::key)
            .ok_or(Rejection::LeaderNotFound(summoning.player_index))?;
        let target = summoning
            .target_tile
            .map(|p| p.coord())
            .unwrap_or(self.ui.cursor);
        let card = summoning.resolve(&mut self.store)?;

        self.mode = Mode::Idle;
        self.ui.cursor = target;
        self.ui.clear_selection();
        self.ui.hand.close();
        self.ui.hand.selected_index = None;

        info!(target: "duelist::summoning", card = %card, at = %target, "card summoned");
        self.record(RecordedAction::Summoned {
            card,
            leader,
            target,
        });
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Rejection> {
        match std::mem::take(&mut self.mode) {
            Mode::Summoning(summoning) => {
                match summoning.step_back() {
                    Some(previous) => {
                        if previous.phase == SummonPhase::Card {
                            self.ui.hand.reopen();
                        } else {
                            self.ui.hand.close();
                        }
                        debug!(
                            target: "duelist::summoning",
                            phase = previous.phase.as_str(),
                            "summoning stepped back"
                        );
                        self.mode = Mode::Summoning(previous);
                    }
                    None => {
                        info!(target: "duelist::summoning", "summoning abandoned");
                        self.ui.hand.close();
                        self.ui.hand.selected_index = None;
                    }
                }
                Ok(())
            }
            Mode::Staging(staging) => {
                self.mode = Mode::Staging(staging);
                self.cancel_staging();
                Ok(())
            }
            Mode::Idle => {
                if self.ui.hand.open {
                    self.ui.hand.close();
                    return Ok(());
                }
                if self.ui.selected_piece.is_none() && self.ui.details.is_none() {
                    return Err(Rejection::NothingSelected);
                }
                self.ui.clear_selection();
                Ok(())
            }
        }
    }

    fn move_cursor(&mut self, dir: Direction) -> Result<(), Rejection> {
        if self.ui.hand.open {
            let len = self.hand_ids().len();
            return if self.ui.hand.step(dir, len) {
                Ok(())
            } else {
                Err(Rejection::CursorBlocked(dir))
            };
        }

        let allowed = match &self.mode {
            Mode::Summoning(s) if s.phase == SummonPhase::Target => {
                Some(self.summon_targets_for(s.player_index))
            }
            Mode::Summoning(_) => return Err(Rejection::WrongPhase),
            Mode::Staging(s) => Some(s.legal_destinations(&self.board)),
            Mode::Idle => None,
        };

        let moved = self
            .ui
            .step(&self.board, dir, allowed.as_deref())
            .ok_or(Rejection::CursorBlocked(dir))?;
        if !matches!(self.mode, Mode::Summoning(_)) {
            self.ui.selected_tile = self.board.tile_at(moved).map(Tile::coord);
        }
        Ok(())
    }

    fn move_staged(&mut self, dir: Direction) -> Result<(), Rejection> {
        if !self.is_users_turn() {
            return Err(Rejection::NotYourTurn);
        }
        let staging = self.staging().ok_or(Rejection::NoStaging)?;
        let live = self
            .store
            .find(staging.piece)
            .ok_or(Rejection::PieceNotFound(staging.piece))?
            .coord();
        let next = live.step(dir);
        if !self.board.is_in_bounds(next) {
            return Err(Rejection::OutOfBounds(next));
        }
        self.move_staged_to(next)
    }

    fn move_staged_to(&mut self, dest: Coord) -> Result<(), Rejection> {
        let Mode::Staging(staging) = &mut self.mode else {
            return Err(Rejection::NoStaging);
        };
        staging.record_move(&mut self.store, &self.board, dest)?;
        self.ui.cursor = dest;
        Ok(())
    }

    fn flip(&mut self) -> Result<(), Rejection> {
        if !self.is_users_turn() {
            return Err(Rejection::NotYourTurn);
        }
        let Mode::Staging(staging) = &mut self.mode else {
            return Err(Rejection::NoStaging);
        };
        staging.flip(&mut self.store)
    }

    fn reorient(&mut self) -> Result<(), Rejection> {
        if !self.is_users_turn() {
            return Err(Rejection::NotYourTurn);
        }
        let Mode::Staging(staging) = &mut self.mode else {
            return Err(Rejection::NoStaging);
        };
        staging.reorient(&mut self.store)
    }

    fn start_summon(&mut self) -> Result<(), Rejection> {
        if !self.is_users_turn() {
            return Err(Rejection::NotYourTurn);
        }
        let leader = self
            .local_leader()
            .ok_or(Rejection::LeaderNotFound(self.player_index))?;
        let leader_key = leader.key();
        let leader = leader.position.coord();

        // An untouched staged leader hands over to the summon.
        let hand_over = matches!(
            &self.mode,
            Mode::Staging(s) if s.piece == leader_key && !s.has_changes()
        );
        if hand_over {
            self.cancel_staging();
        }
        match &self.mode {
            Mode::Staging(_) => return Err(Rejection::StagingActive),
            Mode::Summoning(_) => return Err(Rejection::SummoningActive),
            Mode::Idle => {}
        }

        self.mode = Mode::Summoning(SummoningState::start(self.player_index));
        self.ui.clear_selection();
        self.ui.hand.close();
        self.ui.cursor = leader;
        info!(
            target: "duelist::summoning",
            player_index = self.player_index,
            "summoning started"
        );
        Ok(())
    }

    fn toggle_details(&mut self) -> Result<(), Rejection> {
        if self.ui.details.take().is_some() {
            return Ok(());
        }

        let hand_card = self
            .ui
            .hand
            .selected_index
            .filter(|_| self.ui.hand.open)
            .and_then(|i| self.hand_ids().get(i).copied());
        let view = match (hand_card, self.ui.selected_piece) {
            (Some(id), _) => DetailsView::HandCard(id),
            (None, Some(key)) => DetailsView::Piece(key),
            (None, None) => return Err(Rejection::NothingSelected),
        };
        self.ui.details = Some(view);
        Ok(())
    }

    fn toggle_hand(&mut self) -> Result<(), Rejection> {
        if matches!(self.mode, Mode::Summoning(_)) {
            return Err(Rejection::SummoningActive);
        }
        if self.ui.hand.open {
            self.ui.hand.close();
        } else {
            self.ui.hand.open();
        }
        Ok(())
    }

    fn commit_staging(&mut self) -> Result<(), Rejection> {
        let staging = self.take_staging().ok_or(Rejection::NoStaging)?;
        let key = staging.piece;

        match staging.commit(&mut self.turn) {
            CommitOutcome::Unchanged => {
                debug!(target: "duelist::staging", piece = %key, "staging closed without changes");
            }
            CommitOutcome::Committed {
                moved,
                flipped,
                changed_position,
            } => {
                info!(
                    target: "duelist::staging",
                    piece = %key,
                    moved,
                    flipped,
                    changed_position,
                    "action committed"
                );
                self.record(RecordedAction::Committed {
                    piece: key,
                    moved,
                    flipped,
                    changed_position,
                });
            }
        }
        self.ui.clear_selection();
        Ok(())
    }

    /// Revert and close any live staging. Returns whether one was live.
    fn cancel_staging(&mut self) -> bool {
        let Some(staging) = self.take_staging() else {
            return false;
        };
        info!(target: "duelist::staging", piece = %staging.piece, "staging cancelled");
        staging.cancel(&mut self.store);
        self.ui.clear_selection();
        true
    }

    fn take_staging(&mut self) -> Option<StagingState> {
        match std::mem::take(&mut self.mode) {
            Mode::Staging(staging) => Some(staging),
            other => {
                self.mode = other;
                None
            }
        }
    }

    fn summoning_mut(&mut self) -> Result<&mut SummoningState, Rejection> {
        match &mut self.mode {
            Mode::Summoning(s) => Ok(s),
            _ => Err(Rejection::NoSummoning),
        }
    }
}
