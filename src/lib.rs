//! Duelist State Library
//!
//! This crate provides the interaction state for the Duelist board game: a
//! square tile board where two leaders take turns moving, flipping and
//! re-stancing their cards and summoning new ones from hand.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Board Geometry** - A centred square board with per-tile terrain.
//!
//! - **Entity Store** - Cards and leaders, looked up by a typed [`PieceKey`].
//!
//! - **Turn Tracker** - The turn owner and the set of pieces that already acted.
//!
//! - **Staging Machine** - Provisional move, flip and stance edits to one piece
//!   that either commit as a single action or revert completely.
//!
//! - **Summoning Machine** - Target, card, confirm. Cancel steps back one phase.
//!
//! - **Command Dispatcher** - Routes [`Command`]s by mode; declined commands
//!   are silent no-ops.
//!
//! # Design Principles
//!
//! 1. **One owner** - [`GameContext`] holds every piece of session state and
//!    is mutated only through [`GameContext::dispatch`].
//!
//! 2. **Illegal states are unrepresentable** - Staging and summoning share one
//!    [`Mode`] slot.
//!
//! 3. **No rendering, no networking** - This crate is pure state.
//!
//! 4. **Serialization-ready** - [`Snapshot`] renders to JSON for the view layer.
//!
//! # Example
//!
//! ```rust
//! use duelist_state::state::{
//!     BoardSide, Card, Command, Coord, GameConfig, GameContext, GameSetup, Leader, Owner,
//!     Position, SelectArgs, SummonPhase, LEADER_BASE_Z,
//! };
//!
//! let yugi = Leader::new(1, "Yugi", Owner::Player, BoardSide::S)
//!     .at(Position::new(0, -5, LEADER_BASE_Z))
//!     .moving_first()
//!     .with_deck((1..=6).map(|id| Card::new(id, format!("Card {id}"), 1000, 1000)));
//! let kaiba = Leader::new(2, "Kaiba", Owner::Opponent, BoardSide::N)
//!     .at(Position::new(0, 5, LEADER_BASE_Z));
//!
//! let mut ctx = GameContext::new(GameConfig::default(), GameSetup::new(vec![yugi, kaiba], vec![]))
//!     .unwrap();
//!
//! // Summon the first card in hand next to the leader.
//! ctx.dispatch(Command::StartSummon);
//! ctx.dispatch(Command::Select(SelectArgs::coord(Coord::new(1, -4))));
//! assert_eq!(ctx.summoning().unwrap().phase, SummonPhase::Card);
//! ctx.dispatch(Command::select());
//! ctx.dispatch(Command::select());
//!
//! let card = ctx.store().card(1).unwrap();
//! assert!(card.is_face_down);
//! assert_eq!(card.position.coord(), Coord::new(1, -4));
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
