//! State management for a Duelist session.
//!
//! This module provides the core state types and machines:
//!
//! - `board` - Board geometry, coordinates and tiles
//! - `piece` - Cards, leaders and piece keys
//! - `store` - Indexed access to every piece on the board
//! - `turn` - Whose turn it is and which pieces have acted
//! - `staging` - Provisional move/flip/stance edits for one piece
//! - `summoning` - Target, card, confirm flow for playing a card
//! - `cursor` - Cursor, selection, hand and details overlays
//! - `context` - The owning [`GameContext`] and its [`Snapshot`] read model
//! - `dispatcher` - [`Command`] routing
//! - `input` - Keyboard mapping
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           GameContext                                    │
//! │                                                                          │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐          │
//! │  │      Board      │  │   EntityStore   │  │    TurnState    │          │
//! │  │                 │  │                 │  │                 │          │
//! │  │ coord →         │  │ card id →       │  │ turn owner      │          │
//! │  │   Tile          │  │   Card          │  │   index         │          │
//! │  │                 │  │                 │  │                 │          │
//! │  │                 │  │ seat →          │  │ acted pieces    │          │
//! │  │                 │  │   Leader        │  │                 │          │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘          │
//! │                                                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                          Mode                                    │    │
//! │  │                                                                  │    │
//! │  │  Idle ──select──▶ Staging ──commit/cancel──▶ Idle                │    │
//! │  │  Idle ──summon──▶ Summoning(Target ▶ Card ▶ Confirm) ──▶ Idle    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                                                                          │
//! │  CursorController: cursor, selection, hand overlay, details panel        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use duelist_state::state::{Command, GameConfig, GameContext, GameSetup, KeyBindings, map_key};
//!
//! let mut ctx = GameContext::new(GameConfig::default(), setup)?;
//! let keys = KeyBindings::default();
//!
//! if let Some(command) = map_key("k", &keys, &ctx) {
//!     ctx.dispatch(command);
//! }
//! let view = ctx.snapshot();
//! ```

pub mod board;
pub mod config;
pub mod context;
pub mod cursor;
pub mod dispatcher;
pub mod error;
pub mod input;
pub mod piece;
pub mod staging;
pub mod store;
pub mod summoning;
pub mod turn;

// Re-export commonly used types
pub use board::{
    Board, Coord, Direction, Position, Terrain, Tile, DEFAULT_BOARD_SIZE, LEADER_BASE_Z,
    MAX_BOARD_SIZE, TILE_Z,
};
pub use config::{GameConfig, DEFAULT_OPENING_HAND_SIZE};
pub use context::{ActionRecord, GameContext, GameSetup, Mode, RecordedAction, Snapshot};
pub use cursor::{CursorController, DetailsView, HandView};
pub use dispatcher::{Command, Dispatch, SelectArgs};
pub use error::{ConfigError, ParseKeyError, Rejection, SetupError};
pub use input::{map_key, KeyBindings};
pub use piece::{
    BoardSide, Card, CardId, Leader, Owner, Piece, PieceId, PieceKey, PieceKind, PieceRef, Rarity,
};
pub use staging::{CommitOutcome, StagingState};
pub use store::EntityStore;
pub use summoning::{summon_targets, SummonPhase, SummoningState, DEFAULT_SUMMON_RADIUS};
pub use turn::TurnState;
