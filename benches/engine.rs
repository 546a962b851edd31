use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rust_ludo::core::{Difficulty, GameState, Player, Seat, TokenId, TokenPosition};
use rust_ludo::rules::LudoRules;
use rust_ludo::sim::{SeatPolicy, SimulationConfig, Simulator};
use rust_ludo::{score_move, GameRng};

fn midgame() -> GameState {
    let mut state = GameState::new(vec![
        Player::human("p0", "Ann"),
        Player::bot("p1", "Ruby", Difficulty::Hard),
        Player::bot("p2", "Jade", Difficulty::Hard),
        Player::bot("p3", "Cobalt", Difficulty::Hard),
    ]);
    for (seat, step) in [(0, 12), (1, 9), (2, 30), (3, 44)] {
        state.place_token(Seat::new(seat), TokenId::new(0), TokenPosition::Track(step));
        state.place_token(Seat::new(seat), TokenId::new(1), TokenPosition::Track(step + 5));
    }
    state
}

fn bench_roll_and_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("ludo_rules");
    let rules = LudoRules::new();
    let base = midgame();

    group.bench_function("roll_and_move", |b| {
        let mut rng = GameRng::new(7);
        b.iter_batched(
            || base.clone(),
            |mut state| {
                let player = state.current_player().id().clone();
                let outcome = rules.roll_dice(&mut state, &player, &mut rng).unwrap();
                if let Some(&token) = outcome.available.first() {
                    rules.move_token(&mut state, &player, token).unwrap();
                }
                state
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("score_all_tokens", |b| {
        b.iter(|| {
            TokenId::all()
                .map(|token| score_move(black_box(&base), Seat::new(0), token, 4))
                .max()
        });
    });

    group.finish();
}

fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("ludo_simulation");
    let heuristic = Simulator::new(SimulationConfig::new().with_seats(vec![
        SeatPolicy::Heuristic(Difficulty::Hard);
        4
    ]));
    let random = Simulator::new(SimulationConfig::new().with_seats(vec![SeatPolicy::Random; 2]));

    group.bench_function("four_heuristic_bots", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            heuristic.play_game(seed).unwrap()
        });
    });

    group.bench_function("two_random_bots", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            random.play_game(seed).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_roll_and_move, bench_full_game);
criterion_main!(benches);
