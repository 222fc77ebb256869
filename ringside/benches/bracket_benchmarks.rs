use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ringside::betting::{Bet, BetStatus, StateIdVerification, eligible_bets, prepare_settlement};
use ringside::auth::Permissions;
use ringside::fight_card::{Bout, CardStatus, Corner, FightCard};
use ringside::roster::Boxer;
use ringside::tournament::{
    Entrant, SeedingMethod, Tournament, advance_winner, create_tournament_bracket, random_order,
    seeded_order,
};
use std::hint::black_box;

/// Helper to create a roster with distinct rankings
fn roster(size: usize) -> Vec<Boxer> {
    (0..size)
        .map(|i| {
            Boxer::new(format!("b{i}"), format!("S-{i}"), format!("Boxer {i}"))
                .with_ranking_points(10_000 - i as i64)
        })
        .collect()
}

/// Play every match, first entrant wins
fn play_out(mut tournament: Tournament) -> Tournament {
    for index in 0..tournament.matches.len() {
        let m = &tournament.matches[index];
        if m.is_completed() {
            continue;
        }
        let Some(winner) = [&m.fighter1, &m.fighter2]
            .into_iter()
            .find_map(Entrant::boxer_id)
            .cloned()
        else {
            continue;
        };
        let id = m.id.clone();
        tournament = advance_winner(&tournament, &id, &winner).unwrap();
    }
    tournament
}

/// Benchmark bracket construction for both seeding methods
fn bench_bracket_construction(c: &mut Criterion) {
    let boxers = roster(64);
    let mut group = c.benchmark_group("bracket_construction");

    group.bench_function("ranked", |b| {
        b.iter(|| {
            let order = seeded_order(black_box(&boxers));
            create_tournament_bracket(&order, SeedingMethod::Ranked, "bench").unwrap()
        });
    });

    group.bench_function("random", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| {
            let order = random_order(black_box(&boxers), &mut rng);
            create_tournament_bracket(&order, SeedingMethod::Random, "bench").unwrap()
        });
    });

    group.finish();
}

/// Benchmark advancing every match to a champion
fn bench_full_advancement(c: &mut Criterion) {
    let order = seeded_order(&roster(32));
    let bracket = create_tournament_bracket(&order, SeedingMethod::Ranked, "bench").unwrap();

    c.bench_function("advance_full_bracket", |b| {
        b.iter(|| play_out(black_box(bracket.clone())));
    });
}

/// Benchmark settlement batch preparation at different batch sizes
fn bench_settlement_batch(c: &mut Criterion) {
    let mut card = FightCard::new("card", "Bench Night", Bout::new("main", "a", "b"));
    card.main_event.winner = Some(Corner::Fighter1);
    card.status = CardStatus::Completed;
    let cards = vec![card];

    let mut group = c.benchmark_group("settlement_batch");
    for size in [10, 100, 1_000] {
        let bets: Vec<Bet> = (0..size)
            .map(|i| Bet {
                id: format!("bet-{i}"),
                bettor_id: format!("p{i}"),
                bettor_name: format!("Bettor {i}"),
                bettor_state_id: format!("ID{i}"),
                fight_card_id: "card".to_string(),
                bout_id: "main".to_string(),
                fighter_id: if i % 2 == 0 { "a" } else { "b" }.to_string(),
                fighter_name: String::new(),
                opponent_name: String::new(),
                amount: 1_000,
                odds: 2.0,
                potential_payout: 2_000,
                status: BetStatus::Pending,
                placed_at: chrono::Utc::now(),
                settled_date: None,
                actual_payout: None,
                settlement_note: None,
            })
            .collect();
        let verification = (0..size).fold(StateIdVerification::new(), |v, i| {
            v.with(format!("p{i}"), format!("id{i}"))
        });

        group.bench_with_input(BenchmarkId::new("eligible", size), &bets, |b, bets| {
            b.iter(|| eligible_bets(black_box(bets), &cards));
        });
        group.bench_with_input(BenchmarkId::new("prepare", size), &bets, |b, bets| {
            b.iter(|| {
                prepare_settlement(
                    &Permissions::all(),
                    black_box(bets),
                    &cards,
                    &verification,
                    chrono::Utc::now(),
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_bracket_construction,
    bench_full_advancement,
    bench_settlement_batch
);
criterion_main!(benches);
