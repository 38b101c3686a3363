//! Keyboard mapping.
//!
//! Translates raw key names (`"k"`, `"Escape"`, `"ArrowUp"`, ...) into
//! [`Command`]s. Which command a key produces depends on whether a piece is
//! staged, so the mapping reads the context but never mutates it.

use serde::{Deserialize, Serialize};

use super::board::Direction;
use super::context::GameContext;
use super::dispatcher::Command;
use super::error::ConfigError;

/// User-configurable key bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub select: String,
    pub cancel: Vec<String>,
    pub play_card: String,
    pub view_details: String,
    pub flip_card: String,
    pub change_position: String,
    pub cursor_up: String,
    pub cursor_down: String,
    pub cursor_left: String,
    pub cursor_right: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            select: "k".into(),
            cancel: vec!["l".into(), "Escape".into()],
            play_card: "j".into(),
            view_details: "i".into(),
            flip_card: "o".into(),
            change_position: "u".into(),
            cursor_up: "w".into(),
            cursor_down: "s".into(),
            cursor_left: "a".into(),
            cursor_right: "d".into(),
        }
    }
}

impl KeyBindings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    fn direction(&self, key: &str) -> Option<Direction> {
        let table = [
            (Direction::Up, "w", "ArrowUp", &self.cursor_up),
            (Direction::Down, "s", "ArrowDown", &self.cursor_down),
            (Direction::Left, "a", "ArrowLeft", &self.cursor_left),
            (Direction::Right, "d", "ArrowRight", &self.cursor_right),
        ];
        table
            .into_iter()
            .find(|(_, wasd, arrow, bound)| key == *wasd || key == *arrow || key == bound.as_str())
            .map(|(dir, ..)| dir)
    }
}

/// Single-character bindings compare case-insensitively, named keys exactly.
fn key_eq(key: &str, binding: &str) -> bool {
    let single = |s: &str| s.chars().count() == 1;
    if single(key) && single(binding) {
        key.to_lowercase() == binding.to_lowercase()
    } else {
        key == binding
    }
}

/// Map a key press to a command, if it means anything right now.
pub fn map_key(key: &str, bindings: &KeyBindings, ctx: &GameContext) -> Option<Command> {
    if bindings.cancel.iter().any(|c| c == key) {
        return Some(Command::Cancel);
    }

    let staged = ctx.staging().map(|s| s.piece);
    if let Some(piece) = staged {
        if key == "Enter" {
            return Some(Command::select());
        }
        if piece.is_card() {
            if key_eq(key, &bindings.flip_card) {
                return Some(Command::Flip);
            }
            if key_eq(key, &bindings.change_position) {
                return Some(Command::Reorient);
            }
        } else if key_eq(key, &bindings.play_card) {
            return Some(Command::StartSummon);
        }
    }

    if let Some(dir) = bindings.direction(key) {
        return Some(match staged {
            Some(_) => Command::MoveStaged(dir),
            None => Command::MoveCursor(dir),
        });
    }

    if key_eq(key, &bindings.select) {
        Some(Command::select())
    } else if key_eq(key, &bindings.view_details) {
        Some(Command::ToggleDetails)
    } else if key_eq(key, &bindings.play_card) {
        Some(Command::StartSummon)
    } else {
        None
    }
}
