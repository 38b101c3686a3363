//! End-to-end command sequences against a seeded session.

use duelist_state::state::{
    BoardSide, Card, Command, Coord, Direction, Dispatch, GameConfig, GameContext, GameSetup,
    Leader, Mode, Owner, PieceKey, Position, RecordedAction, Rejection, SelectArgs, SummonPhase,
    LEADER_BASE_Z, TILE_Z,
};
use pretty_assertions::assert_eq;

fn session() -> GameContext {
    let yugi = Leader::new(1, "Yugi", Owner::Player, BoardSide::S)
        .at(Position::new(0, -5, LEADER_BASE_Z))
        .moving_first()
        .with_deck((3..=9).map(|id| Card::new(id, format!("Card {}", id), 1000, 1000)));
    let kaiba = Leader::new(2, "Kaiba", Owner::Opponent, BoardSide::N)
        .at(Position::new(0, 5, LEADER_BASE_Z));
    let cards = vec![
        Card::new(20, "Dark Magician", 2500, 2100).at(Position::new(1, -5, TILE_Z)),
        Card::new(21, "Feral Imp", 1300, 1400)
            .at(Position::new(-2, -3, TILE_Z))
            .face_down()
            .in_defense(),
        Card::new(30, "Blue-Eyes", 3000, 2500)
            .owned_by(Owner::Opponent)
            .at(Position::new(0, 4, TILE_Z)),
    ];
    GameContext::new(GameConfig::default(), GameSetup::new(vec![yugi, kaiba], cards)).unwrap()
}

fn select_at(ctx: &mut GameContext, x: i32, y: i32) -> Dispatch {
    ctx.dispatch(Command::Select(SelectArgs::coord(Coord::new(x, y))))
}

#[test]
fn summon_card_next_to_leader() {
    let mut ctx = session();
    assert_eq!(ctx.hand_ids(), &[3, 4, 5, 6, 7]);

    ctx.dispatch(Command::StartSummon);
    let summoning = ctx.summoning().unwrap();
    assert_eq!(summoning.phase, SummonPhase::Target);
    assert_eq!(ctx.cursor(), Coord::new(0, -5));

    select_at(&mut ctx, 1, -4);
    let summoning = ctx.summoning().unwrap();
    assert_eq!(summoning.phase, SummonPhase::Card);
    assert_eq!(summoning.target_tile, Some(Position::new(1, -4, TILE_Z)));
    assert!(ctx.show_hand());

    ctx.dispatch(Command::Select(SelectArgs::hand_card(7)));
    let summoning = ctx.summoning().unwrap();
    assert_eq!(summoning.phase, SummonPhase::Confirm);
    assert_eq!(summoning.selected_card_id, Some(7));
    assert!(!ctx.show_hand());

    ctx.dispatch(Command::select());
    assert_eq!(ctx.mode(), &Mode::Idle);
    assert_eq!(ctx.hand_ids(), &[3, 4, 5, 6]);

    let card = ctx.store().card(7).unwrap();
    assert_eq!(card.position, Position::new(1, -4, TILE_Z));
    assert_eq!(card.owner, Owner::Player);
    assert!(card.is_face_down);
    assert!(!card.is_defense_mode);
    assert_eq!(ctx.local_leader().unwrap().cards_in_play, vec![7]);

    let record = ctx.history().last().unwrap();
    assert_eq!(
        record.action,
        RecordedAction::Summoned {
            card: PieceKey::card(7),
            leader: PieceKey::leader(1),
            target: Coord::new(1, -4),
        }
    );
    // Summoning does not spend any piece's action.
    assert!(ctx.turn().acted().is_empty());
}

#[test]
fn summon_target_outside_ring_is_ignored() {
    let mut ctx = session();
    ctx.dispatch(Command::StartSummon);
    assert_eq!(
        select_at(&mut ctx, 0, -3),
        Dispatch::Ignored(Rejection::IllegalSummonTarget(Coord::new(0, -3)))
    );
    assert_eq!(ctx.summoning().unwrap().phase, SummonPhase::Target);
    assert!(!ctx.show_hand());
}

#[test]
fn summon_onto_occupied_cell_stacks() {
    let mut ctx = session();
    ctx.dispatch(Command::StartSummon);
    select_at(&mut ctx, 1, -5);
    ctx.dispatch(Command::select());
    ctx.dispatch(Command::select());

    let stacked: Vec<_> = ctx.store().pieces_at(Coord::new(1, -5)).map(|p| p.key()).collect();
    assert_eq!(stacked, vec![PieceKey::card(20), PieceKey::card(3)]);
}

#[test]
fn summon_with_keyboard_cursor() {
    let mut ctx = session();
    ctx.dispatch(Command::StartSummon);

    // The leader cell itself is not a target, so the cursor may not linger on it.
    ctx.dispatch(Command::MoveCursor(Direction::Up));
    assert_eq!(ctx.cursor(), Coord::new(0, -4));
    assert_eq!(
        ctx.dispatch(Command::MoveCursor(Direction::Up)),
        Dispatch::Ignored(Rejection::CursorBlocked(Direction::Up))
    );

    ctx.dispatch(Command::select());
    ctx.dispatch(Command::MoveCursor(Direction::Right));
    ctx.dispatch(Command::MoveCursor(Direction::Right));
    assert_eq!(ctx.ui().hand.selected_index, Some(2));
    ctx.dispatch(Command::select());
    assert_eq!(ctx.summoning().unwrap().selected_card_id, Some(5));

    ctx.dispatch(Command::select());
    assert_eq!(ctx.store().card(5).unwrap().position.coord(), Coord::new(0, -4));
}

#[test]
fn cancel_walks_summoning_back_one_phase_at_a_time() {
    let mut ctx = session();
    ctx.dispatch(Command::StartSummon);
    select_at(&mut ctx, -1, -4);
    ctx.dispatch(Command::MoveCursor(Direction::Right));
    ctx.dispatch(Command::select());
    assert_eq!(ctx.summoning().unwrap().phase, SummonPhase::Confirm);

    ctx.dispatch(Command::Cancel);
    let summoning = ctx.summoning().unwrap();
    assert_eq!(summoning.phase, SummonPhase::Card);
    assert_eq!(summoning.selected_card_id, None);
    assert_eq!(summoning.target_tile, Some(Position::new(-1, -4, TILE_Z)));
    assert!(ctx.show_hand());
    assert_eq!(ctx.ui().hand.selected_index, Some(1));

    ctx.dispatch(Command::Cancel);
    assert_eq!(ctx.summoning().unwrap().phase, SummonPhase::Target);
    assert!(!ctx.show_hand());

    ctx.dispatch(Command::Cancel);
    assert_eq!(ctx.mode(), &Mode::Idle);
    assert_eq!(ctx.ui().hand.selected_index, None);
    assert_eq!(ctx.hand_ids(), &[3, 4, 5, 6, 7]);
}

#[test]
fn board_clicks_ignored_after_target_phase() {
    let mut ctx = session();
    ctx.dispatch(Command::StartSummon);
    select_at(&mut ctx, 1, -4);
    assert_eq!(select_at(&mut ctx, -1, -4), Dispatch::Ignored(Rejection::WrongPhase));
    assert_eq!(
        ctx.summoning().unwrap().target_tile,
        Some(Position::new(1, -4, TILE_Z))
    );
}

#[test]
fn board_pieces_cannot_stand_in_for_hand_cards() {
    let mut ctx = session();
    ctx.dispatch(Command::StartSummon);
    select_at(&mut ctx, 1, -4);

    assert_eq!(
        ctx.dispatch(Command::Select(SelectArgs::piece(PieceKey::leader(2)))),
        Dispatch::Ignored(Rejection::WrongPhase)
    );
    assert_eq!(
        ctx.dispatch(Command::Select(SelectArgs::piece(PieceKey::card(20)))),
        Dispatch::Ignored(Rejection::CardNotInHand(20))
    );
    assert_eq!(ctx.summoning().unwrap().phase, SummonPhase::Card);

    ctx.dispatch(Command::Select(SelectArgs::hand_card(7)));
    assert_eq!(ctx.summoning().unwrap().phase, SummonPhase::Confirm);

    assert_eq!(
        ctx.dispatch(Command::Select(SelectArgs::piece(PieceKey::leader(2)))),
        Dispatch::Ignored(Rejection::WrongPhase)
    );
    assert_eq!(ctx.summoning().unwrap().phase, SummonPhase::Confirm);
    assert!(ctx.store().card(7).is_none());

    ctx.dispatch(Command::select());
    assert_eq!(ctx.mode(), &Mode::Idle);
    assert_eq!(ctx.store().card(7).unwrap().position.coord(), Coord::new(1, -4));
}

#[test]
fn staging_move_back_to_origin_clears_moved() {
    let mut ctx = session();
    select_at(&mut ctx, 1, -5);
    let staging = ctx.staging().unwrap();
    assert_eq!(staging.original_position, Position::new(1, -5, TILE_Z));

    ctx.dispatch(Command::MoveStaged(Direction::Right));
    assert!(ctx.staging().unwrap().has_moved);

    ctx.dispatch(Command::MoveStaged(Direction::Left));
    let staging = ctx.staging().unwrap();
    assert!(!staging.has_moved);
    assert!(!staging.has_changes());

    // Nothing net changed, so committing spends nothing.
    ctx.dispatch(Command::select());
    assert_eq!(ctx.mode(), &Mode::Idle);
    assert!(ctx.turn().acted().is_empty());
    assert!(ctx.history().is_empty());
}

#[test]
fn committed_piece_cannot_act_again_until_next_turn() {
    let mut ctx = session();
    select_at(&mut ctx, 1, -5);
    select_at(&mut ctx, 1, -4);
    select_at(&mut ctx, 1, -4);
    assert_eq!(ctx.turn().acted(), &[PieceKey::card(20)]);
    assert_eq!(ctx.store().card(20).unwrap().position.coord(), Coord::new(1, -4));

    select_at(&mut ctx, 1, -4);
    assert_eq!(ctx.mode(), &Mode::Idle);
    assert_eq!(ctx.ui().selected_piece, Some(PieceKey::card(20)));

    ctx.begin_turn(1);
    ctx.begin_turn(0);
    select_at(&mut ctx, 1, -4);
    assert_eq!(ctx.staging().unwrap().piece, PieceKey::card(20));
}

#[test]
fn moving_a_defending_card_forces_attack_stance() {
    let mut ctx = session();
    select_at(&mut ctx, -2, -3);
    ctx.dispatch(Command::MoveStaged(Direction::Up));

    let card = ctx.store().card(21).unwrap();
    assert!(!card.is_defense_mode);
    assert!(card.is_face_down);
    let staging = ctx.staging().unwrap();
    assert!(staging.has_moved);
    assert!(staging.has_changed_position);

    assert_eq!(
        ctx.dispatch(Command::Reorient),
        Dispatch::Ignored(Rejection::AlreadyMoved)
    );

    ctx.dispatch(Command::Cancel);
    let card = ctx.store().card(21).unwrap();
    assert_eq!(card.position.coord(), Coord::new(-2, -3));
    assert!(card.is_defense_mode);
    assert!(card.is_face_down);
}

#[test]
fn flip_reveals_and_commits() {
    let mut ctx = session();
    select_at(&mut ctx, -2, -3);
    ctx.dispatch(Command::Flip);
    ctx.dispatch(Command::Reorient);

    let staging = ctx.staging().unwrap();
    assert!(staging.has_flipped);
    assert!(staging.has_changed_position);

    ctx.dispatch(Command::select());
    let card = ctx.store().card(21).unwrap();
    assert!(!card.is_face_down);
    assert!(!card.is_defense_mode);
    assert_eq!(
        ctx.history()[0].action,
        RecordedAction::Committed {
            piece: PieceKey::card(21),
            moved: false,
            flipped: true,
            changed_position: true,
        }
    );
}

#[test]
fn face_up_card_cannot_be_hidden() {
    let mut ctx = session();
    select_at(&mut ctx, 1, -5);
    assert_eq!(ctx.dispatch(Command::Flip), Dispatch::Ignored(Rejection::RevealedCard));
    assert!(!ctx.store().card(20).unwrap().is_face_down);
}

#[test]
fn opponent_turn_is_view_only() {
    let mut ctx = session();
    ctx.begin_turn(1);
    assert!(!ctx.is_users_turn());

    select_at(&mut ctx, 1, -5);
    assert_eq!(ctx.mode(), &Mode::Idle);
    assert_eq!(ctx.dispatch(Command::StartSummon), Dispatch::Ignored(Rejection::NotYourTurn));
    assert_eq!(ctx.dispatch(Command::Flip), Dispatch::Ignored(Rejection::NotYourTurn));

    ctx.dispatch(Command::ToggleDetails);
    assert!(ctx.ui().details.is_some());
    ctx.dispatch(Command::Cancel);
    assert_eq!(ctx.ui().selected_piece, None);
    assert_eq!(ctx.ui().details, None);
}

#[test]
fn begin_turn_reverts_live_staging() {
    let mut ctx = session();
    select_at(&mut ctx, 1, -5);
    select_at(&mut ctx, 2, -5);
    ctx.begin_turn(1);

    assert_eq!(ctx.mode(), &Mode::Idle);
    assert_eq!(ctx.store().card(20).unwrap().position.coord(), Coord::new(1, -5));
}

#[test]
fn snapshot_tracks_interaction() {
    let mut ctx = session();
    select_at(&mut ctx, 1, -5);
    let json = ctx.to_json();
    assert_eq!(json["staging_state"]["piece_id"], serde_json::json!("card-20"));
    assert_eq!(json["selected_tile_piece"]["kind"], serde_json::json!("card"));
    assert_eq!(json["selected_tile_piece"]["id"], serde_json::json!(20));
    assert_eq!(json["summoning_state"], serde_json::Value::Null);
}
