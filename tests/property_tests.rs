//! Invariants that must hold for any dice sequence and any legal choices.

use proptest::prelude::*;

use rust_ludo::core::{GameRng, GameState, Player, TokenPosition};
use rust_ludo::rules::{replay, LudoRules, PassReason};
use rust_ludo::{MovePolicy, RandomPolicy};

fn table(players: usize) -> GameState {
    GameState::new(
        (0..players)
            .map(|i| Player::human(format!("p{i}"), format!("Player {i}")))
            .collect(),
    )
}

fn check_invariants(state: &GameState) {
    let mut all_in = 0;
    for seat in state.seats() {
        assert_eq!(state.census(seat).total(), 4);
        for token in state.tokens(seat) {
            if let Some(step) = token.position.step() {
                assert!(step <= 57, "step {step} past the finish");
            }
        }
        if state.all_finished(seat) {
            all_in += 1;
            assert_eq!(state.winner, Some(seat));
        }
    }
    assert!(all_in <= 1, "two seats finished");
    assert_eq!(state.is_finished(), all_in == 1);
    assert!(state.consecutive_sixes < 3);

    let captures: u32 = state.seats().map(|s| state.stats[s].captures).sum();
    let lost: u32 = state.seats().map(|s| state.stats[s].tokens_captured).sum();
    assert_eq!(captures, lost);
}

proptest! {
    #[test]
    fn test_random_play_keeps_invariants(
        players in 2usize..=4,
        dice in prop::collection::vec(1u8..=6, 1..600),
        choice_seed in any::<u64>(),
    ) {
        let rules = LudoRules::new();
        let mut state = table(players);
        let mut choices = GameRng::new(choice_seed);

        for value in dice {
            if state.is_finished() {
                break;
            }
            let player = state.current_player().id().clone();
            let streak = state.consecutive_sixes;
            let outcome = rules.apply_roll(&mut state, &player, value).unwrap();

            if value == 6 && streak == 2 {
                prop_assert_eq!(outcome.passed, Some(PassReason::ThreeSixesLimit));
            }
            if !outcome.is_pass() {
                let token = RandomPolicy.choose(&state, &outcome.available, &mut choices).unwrap();
                rules.move_token(&mut state, &player, token).unwrap();
            }
            check_invariants(&state);
        }

        for record in state.history.iter() {
            if record.from == TokenPosition::Home {
                prop_assert_eq!(record.dice, 6);
                prop_assert_eq!(record.to, TokenPosition::Track(0));
            }
        }

        let rebuilt = replay(state.roster(), state.history.iter()).unwrap();
        prop_assert_eq!(rebuilt, state.positions());
    }

    #[test]
    fn test_home_tokens_need_a_six(value in 1u8..=5, players in 2usize..=4) {
        let rules = LudoRules::new();
        let mut state = table(players);
        let player = state.current_player().id().clone();

        let outcome = rules.apply_roll(&mut state, &player, value).unwrap();

        prop_assert_eq!(outcome.passed, Some(PassReason::NoTokensOutside));
        prop_assert_eq!(state.tokens_at_home(outcome.seat), 4);
    }
}
