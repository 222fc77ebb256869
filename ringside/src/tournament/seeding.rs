//! Seed selection and round-1 ordering.

use super::models::{BRACKET_SIZE, SeedingMethod};
use crate::roster::{Boxer, BoxerId};
use rand::Rng;
use rand::seq::SliceRandom;
use std::cmp::Ordering;

/// Seed rank placed at each bracket position.
///
/// Seeds 1 and 2 sit in opposite halves, 1-4 in different quarters and so on,
/// so higher seeds only meet if both keep winning.
pub const SEED_ORDER: [u8; BRACKET_SIZE] = [
    1, 32, 16, 17, 8, 25, 9, 24, 4, 29, 13, 20, 5, 28, 12, 21, 2, 31, 15, 18, 7, 26, 10, 23, 3,
    30, 14, 19, 6, 27, 11, 22,
];

/// Ranking order: points desc, then wins desc, then losses asc
pub fn ranking_order(a: &Boxer, b: &Boxer) -> Ordering {
    b.ranking_points
        .cmp(&a.ranking_points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.losses.cmp(&b.losses))
}

/// Boxers in ranking order; full ties keep input order
pub fn rank_boxers(boxers: &[Boxer]) -> Vec<&Boxer> {
    let mut ranked: Vec<&Boxer> = boxers.iter().collect();
    ranked.sort_by(|a, b| ranking_order(a, b));
    ranked
}

/// The 32 best-ranked boxers, fewer if the roster is smaller
pub fn top_32(boxers: &[Boxer]) -> Vec<&Boxer> {
    let mut ranked = rank_boxers(boxers);
    ranked.truncate(BRACKET_SIZE);
    ranked
}

/// Round-1 positions by seed; positions whose seed has no boxer are byes
pub fn seeded_order(boxers: &[Boxer]) -> Vec<Option<BoxerId>> {
    let top = top_32(boxers);
    SEED_ORDER
        .iter()
        .map(|&seed| top.get(usize::from(seed) - 1).map(|b| b.id.clone()))
        .collect()
}

/// Round-1 positions by uniform shuffle of the top 32.
///
/// Shuffled boxers take the first slot of every match before any second
/// slot, so a short roster produces at most one bye per match.
pub fn random_order<R: Rng + ?Sized>(boxers: &[Boxer], rng: &mut R) -> Vec<Option<BoxerId>> {
    let mut ids: Vec<BoxerId> = top_32(boxers).into_iter().map(|b| b.id.clone()).collect();
    ids.shuffle(rng);

    let half = BRACKET_SIZE / 2;
    let mut slots = vec![None; BRACKET_SIZE];
    for (k, id) in ids.into_iter().enumerate() {
        let position = if k < half { 2 * k } else { 2 * (k - half) + 1 };
        slots[position] = Some(id);
    }
    slots
}

/// Round-1 positions for the chosen method
pub fn bracket_order<R: Rng + ?Sized>(
    method: SeedingMethod,
    boxers: &[Boxer],
    rng: &mut R,
) -> Vec<Option<BoxerId>> {
    match method {
        SeedingMethod::Ranked => seeded_order(boxers),
        SeedingMethod::Random => random_order(boxers, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn boxer(id: &str, points: i64, wins: u32, losses: u32) -> Boxer {
        Boxer::new(id, format!("S-{id}"), id)
            .with_ranking_points(points)
            .with_record(wins, losses, 0)
    }

    #[test]
    fn test_seed_order_is_a_permutation() {
        let mut seen = SEED_ORDER.to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (1..=32).collect::<Vec<u8>>());
    }

    #[test]
    fn test_seed_pairs_sum_to_33() {
        for pair in SEED_ORDER.chunks(2) {
            assert_eq!(pair[0] + pair[1], 33);
        }
    }

    #[test]
    fn test_ranking_tie_breaks() {
        let boxers = vec![
            boxer("fewer_points", 90, 30, 0),
            boxer("more_losses", 100, 10, 3),
            boxer("fewer_wins", 100, 8, 0),
            boxer("best", 100, 10, 1),
        ];
        let ids: Vec<&str> = rank_boxers(&boxers).iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["best", "more_losses", "fewer_wins", "fewer_points"]);
    }

    #[test]
    fn test_top_32_truncates() {
        let boxers: Vec<Boxer> = (0..40).map(|i| boxer(&format!("b{i}"), i, 0, 0)).collect();
        let top = top_32(&boxers);
        assert_eq!(top.len(), 32);
        assert_eq!(top[0].id, "b39");
        assert_eq!(top[31].id, "b8");
    }

    #[test]
    fn test_seeded_order_with_short_roster_has_byes() {
        let boxers: Vec<Boxer> = (0..20).map(|i| boxer(&format!("b{i}"), 100 - i, 0, 0)).collect();
        let order = seeded_order(&boxers);

        assert_eq!(order.len(), 32);
        assert_eq!(order.iter().filter(|slot| slot.is_some()).count(), 20);
        // position 1 holds seed 32, absent with only 20 boxers
        assert_eq!(order[0].as_deref(), Some("b0"));
        assert_eq!(order[1], None);
    }

    #[test]
    fn test_random_order_short_roster_never_double_bye() {
        let boxers: Vec<Boxer> = (0..16).map(|i| boxer(&format!("b{i}"), i, 0, 0)).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let order = random_order(&boxers, &mut rng);

        for pair in order.chunks(2) {
            assert!(pair[0].is_some(), "first slot of every match is filled");
            assert!(pair[1].is_none());
        }
    }

    #[test]
    fn test_random_order_is_seed_deterministic() {
        let boxers: Vec<Boxer> = (0..32).map(|i| boxer(&format!("b{i}"), i, 0, 0)).collect();
        let a = random_order(&boxers, &mut StdRng::seed_from_u64(42));
        let b = random_order(&boxers, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
