#![no_main]
use libfuzzer_sys::fuzz_target;
use oxo::game::core::Move;
use oxo::game::position::Position;
use pretty_assertions::assert_eq;

// Every byte picks one of the free cells.
fuzz_target!(|data: &[u8]| {
    let mut position = Position::empty();
    for &byte in data {
        if position.is_terminal() {
            break;
        }
        let moves = position.available_moves();
        let next_move: Move = moves[usize::from(byte) % moves.len()];
        let was_won = position.is_won();
        position = position
            .apply_move(next_move)
            .expect("available moves are legal");
        assert!(!was_won);
        assert_eq!(position.is_won_by_last_move(next_move), position.is_won());
        assert_eq!(
            position.available_moves().len() as u32 + position.ply(),
            9,
            "{position:?}"
        );
    }
});
