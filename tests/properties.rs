//! Property tests for the staging and summoning machines.

use duelist_state::state::{
    BoardSide, Card, Command, Coord, Direction, GameConfig, GameContext, GameSetup, Leader, Owner,
    PieceKey, Position, Rejection, SelectArgs, SummonPhase, LEADER_BASE_Z, TILE_Z,
};
use proptest::prelude::*;

const CARD: PieceKey = PieceKey::card(50);

#[derive(Debug, Clone, Copy)]
enum Edit {
    Move(Direction),
    Flip,
    Reorient,
}

impl Edit {
    fn command(self) -> Command {
        match self {
            Self::Move(dir) => Command::MoveStaged(dir),
            Self::Flip => Command::Flip,
            Self::Reorient => Command::Reorient,
        }
    }
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        2 => direction().prop_map(Edit::Move),
        1 => Just(Edit::Flip),
        1 => Just(Edit::Reorient),
    ]
}

fn summon_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::StartSummon),
        Just(Command::select()),
        Just(Command::Cancel),
        direction().prop_map(Command::MoveCursor),
        (-2i32..=2, -5i32..=-3)
            .prop_map(|(x, y)| Command::Select(SelectArgs::coord(Coord::new(x, y)))),
        (3u32..=9).prop_map(|id| Command::Select(SelectArgs::hand_card(id))),
    ]
}

fn session(x: i32, y: i32, face_down: bool, defense: bool) -> GameContext {
    let yugi = Leader::new(1, "Yugi", Owner::Player, BoardSide::S)
        .at(Position::new(0, -5, LEADER_BASE_Z))
        .moving_first()
        .with_deck((3..=9).map(|id| Card::new(id, format!("Card {}", id), 1000, 1000)));
    let kaiba = Leader::new(2, "Kaiba", Owner::Opponent, BoardSide::N)
        .at(Position::new(0, 5, LEADER_BASE_Z));

    let mut card = Card::new(CARD.id, "Summoned Skull", 2500, 1200).at(Position::new(x, y, TILE_Z));
    card.is_face_down = face_down;
    card.is_defense_mode = defense;

    GameContext::new(GameConfig::default(), GameSetup::new(vec![yugi, kaiba], vec![card])).unwrap()
}

fn phase_rank(phase: SummonPhase) -> i32 {
    match phase {
        SummonPhase::Target => 0,
        SummonPhase::Card => 1,
        SummonPhase::Confirm => 2,
    }
}

proptest! {
    #[test]
    fn begin_snapshots_the_piece(
        x in -5i32..=5, y in -5i32..=5, face_down: bool, defense: bool,
    ) {
        let mut ctx = session(x, y, face_down, defense);
        ctx.dispatch(Command::Select(SelectArgs::piece(CARD)));

        let staging = ctx.staging().unwrap();
        prop_assert_eq!(staging.piece, CARD);
        prop_assert_eq!(staging.original_position, Position::new(x, y, TILE_Z));
        prop_assert_eq!(staging.original_is_face_down, Some(face_down));
        prop_assert_eq!(staging.original_is_defense_mode, Some(defense));
        prop_assert!(!staging.has_changes());
    }

    #[test]
    fn cancel_restores_the_snapshot(
        x in -5i32..=5, y in -5i32..=5, face_down: bool, defense: bool,
        edits in prop::collection::vec(edit(), 0..24),
    ) {
        let mut ctx = session(x, y, face_down, defense);
        let before = ctx.store().card(CARD.id).unwrap().clone();

        ctx.dispatch(Command::Select(SelectArgs::piece(CARD)));
        for e in edits {
            ctx.dispatch(e.command());
        }
        ctx.dispatch(Command::Cancel);

        prop_assert!(ctx.staging().is_none());
        prop_assert_eq!(ctx.store().card(CARD.id).unwrap(), &before);
        prop_assert!(ctx.turn().acted().is_empty());
    }

    #[test]
    fn commit_spends_the_turn_only_on_net_change(
        x in -5i32..=5, y in -5i32..=5, face_down: bool, defense: bool,
        edits in prop::collection::vec(edit(), 0..24),
    ) {
        let mut ctx = session(x, y, face_down, defense);
        ctx.dispatch(Command::Select(SelectArgs::piece(CARD)));
        for e in edits {
            ctx.dispatch(e.command());
        }
        let changed = ctx.staging().unwrap().has_changes();

        ctx.dispatch(Command::select());
        prop_assert!(ctx.staging().is_none());
        prop_assert_eq!(ctx.turn().has_acted(CARD), changed);
        prop_assert_eq!(ctx.history().len(), usize::from(changed));
    }

    #[test]
    fn revealed_card_never_hides(
        x in -5i32..=5, y in -5i32..=5, defense: bool,
        edits in prop::collection::vec(edit(), 0..24),
    ) {
        let mut ctx = session(x, y, false, defense);
        ctx.dispatch(Command::Select(SelectArgs::piece(CARD)));
        for e in edits {
            ctx.dispatch(e.command());
            prop_assert!(!ctx.store().card(CARD.id).unwrap().is_face_down);
        }
    }

    #[test]
    fn reorient_locked_after_first_move(
        x in -5i32..=5, y in -5i32..=5, face_down: bool, defense: bool,
        edits in prop::collection::vec(edit(), 0..24),
    ) {
        let mut ctx = session(x, y, face_down, defense);
        ctx.dispatch(Command::Select(SelectArgs::piece(CARD)));

        let mut moved_once = false;
        for e in edits {
            let stance = ctx.store().card(CARD.id).unwrap().is_defense_mode;
            let result = ctx.dispatch(e.command());
            if let Edit::Reorient = e {
                if moved_once {
                    prop_assert_eq!(result.rejection(), Some(&Rejection::AlreadyMoved));
                    prop_assert_eq!(ctx.store().card(CARD.id).unwrap().is_defense_mode, stance);
                }
            }
            moved_once |= ctx.staging().unwrap().has_moved;
        }
    }

    #[test]
    fn summoning_steps_one_phase_at_a_time(
        commands in prop::collection::vec(summon_command(), 0..32),
    ) {
        let mut ctx = session(4, 4, false, false);
        for command in commands {
            let before = ctx.summoning().map(|s| phase_rank(s.phase));
            ctx.dispatch(command);
            let after = ctx.summoning().map(|s| phase_rank(s.phase));

            if let (Some(b), Some(a)) = (before, after) {
                prop_assert!((a - b).abs() <= 1, "jumped from {} to {}", b, a);
            }
            if before.is_none() {
                prop_assert!(after.is_none() || after == Some(0));
            }
            if let Some(s) = ctx.summoning() {
                if s.phase == SummonPhase::Confirm {
                    prop_assert!(s.target_tile.is_some());
                    prop_assert!(s.selected_card_id.is_some());
                }
            }
        }
    }
}
