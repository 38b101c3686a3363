//! Board pieces: cards and leaders.
//!
//! A piece's identity is the pair `(kind, id)`. Card ids and leader ids live
//! in separate namespaces, so card 1 and leader 1 are different pieces. Every
//! lookup in this crate goes through a [`PieceKey`] for that reason.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::board::{Coord, Position};
use super::error::ParseKeyError;

/// Numeric piece id, unique within its kind.
pub type PieceId = u32;

/// Card ids share the piece id space of the card kind.
pub type CardId = PieceId;

/// Which side of the table a piece belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    Player,
    Opponent,
}

/// Piece namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Card,
    Player,
}

impl PieceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Player => "player",
        }
    }
}

/// Fully qualified piece identity. Renders as `"card-7"` / `"player-1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PieceKey {
    pub kind: PieceKind,
    pub id: PieceId,
}

impl PieceKey {
    pub const fn card(id: CardId) -> Self {
        Self {
            kind: PieceKind::Card,
            id,
        }
    }

    pub const fn leader(id: PieceId) -> Self {
        Self {
            kind: PieceKind::Player,
            id,
        }
    }

    pub fn is_card(&self) -> bool {
        self.kind == PieceKind::Card
    }
}

impl fmt::Display for PieceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.as_str(), self.id)
    }
}

impl FromStr for PieceKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());
        let (kind, id) = s.split_once('-').ok_or_else(err)?;
        let id = id.parse().map_err(|_| err())?;
        match kind {
            "card" => Ok(Self::card(id)),
            "player" => Ok(Self::leader(id)),
            _ => Err(err()),
        }
    }
}

impl From<PieceKey> for String {
    fn from(key: PieceKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PieceKey {
    type Error = ParseKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Card rarity. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Secret,
    Ghost,
    Super,
    Ultra,
    Ultimate,
    Starlight,
    Gold,
}

/// Edge of the board a leader starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardSide {
    N,
    S,
    E,
    W,
}

/// A card, either on the board or as catalogue data in a leader's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub owner: Owner,
    pub position: Position,
    pub attack: u32,
    pub defense: u32,
    pub level: u8,
    pub rarity: Rarity,
    pub is_face_down: bool,
    pub is_defense_mode: bool,
}

impl Card {
    /// A face-up, attack-stance card at the origin.
    pub fn new(id: CardId, name: impl Into<String>, attack: u32, defense: u32) -> Self {
        Self {
            id,
            name: name.into(),
            owner: Owner::Player,
            position: Position::default(),
            attack,
            defense,
            level: 4,
            rarity: Rarity::default(),
            is_face_down: false,
            is_defense_mode: false,
        }
    }

    pub fn owned_by(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn face_down(mut self) -> Self {
        self.is_face_down = true;
        self
    }

    pub fn in_defense(mut self) -> Self {
        self.is_defense_mode = true;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn key(&self) -> PieceKey {
        PieceKey::card(self.id)
    }
}

/// A player's leader piece, with the card zones it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub id: PieceId,
    pub name: String,
    pub owner: Owner,
    pub position: Position,
    pub board_side: BoardSide,
    pub first_move: bool,
    /// Every card this leader owns; hand/deck/graveyard hold ids into it.
    pub all_cards: Vec<Card>,
    pub deck: Vec<CardId>,
    pub hand: Vec<CardId>,
    pub graveyard: Vec<CardId>,
    pub cards_in_play: Vec<CardId>,
}

impl Leader {
    pub fn new(id: PieceId, name: impl Into<String>, owner: Owner, board_side: BoardSide) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            position: Position::default(),
            board_side,
            first_move: false,
            all_cards: Vec::new(),
            deck: Vec::new(),
            hand: Vec::new(),
            graveyard: Vec::new(),
            cards_in_play: Vec::new(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn moving_first(mut self) -> Self {
        self.first_move = true;
        self
    }

    /// Add cards to the collection and to the bottom of the deck.
    pub fn with_deck(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        for card in cards {
            self.deck.push(card.id);
            self.all_cards.push(card);
        }
        self
    }

    pub fn key(&self) -> PieceKey {
        PieceKey::leader(self.id)
    }

    /// Catalogue entry for a card id.
    pub fn card_data(&self, id: CardId) -> Option<&Card> {
        self.all_cards.iter().find(|c| c.id == id)
    }

    /// Move up to `n` ids from the top of the deck into the hand.
    pub fn draw(&mut self, n: usize) -> usize {
        let n = n.min(self.deck.len());
        self.hand.extend(self.deck.drain(..n));
        n
    }
}

/// Owned piece, used for whole-piece replacement in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Piece {
    Card(Card),
    Player(Leader),
}

impl Piece {
    pub fn key(&self) -> PieceKey {
        match self {
            Self::Card(c) => c.key(),
            Self::Player(l) => l.key(),
        }
    }
}

/// Borrowed view of a piece in the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PieceRef<'a> {
    Card(&'a Card),
    Player(&'a Leader),
}

impl<'a> PieceRef<'a> {
    pub fn key(&self) -> PieceKey {
        match self {
            Self::Card(c) => c.key(),
            Self::Player(l) => l.key(),
        }
    }

    pub fn owner(&self) -> Owner {
        match self {
            Self::Card(c) => c.owner,
            Self::Player(l) => l.owner,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Card(c) => c.position,
            Self::Player(l) => l.position,
        }
    }

    pub fn coord(&self) -> Coord {
        self.position().coord()
    }

    pub fn as_card(&self) -> Option<&'a Card> {
        match self {
            Self::Card(c) => Some(c),
            Self::Player(_) => None,
        }
    }

    pub fn to_owned(&self) -> Piece {
        match self {
            Self::Card(c) => Piece::Card((*c).clone()),
            Self::Player(l) => Piece::Player((*l).clone()),
        }
    }
}
