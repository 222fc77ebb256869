//! Fight result declaration.
//!
//! Declaring results is the only transition a card makes (`upcoming ->
//! completed`). Every decided bout gets its winner and knockout flag, and the
//! boxers' records are adjusted through a delta map keyed by boxer id, so a
//! boxer appearing on several bouts of one card accumulates correctly.

use super::errors::{ResultsError, ResultsResult};
use super::models::{BoutId, CardStatus, Corner, FightCard};
use crate::auth::{Permission, Permissions};
use crate::roster::{Boxer, BoxerId, RecordDelta};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Operator's decision for one bout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoutDecision {
    pub bout_id: BoutId,
    pub winner: Corner,
    #[serde(default)]
    pub knockout: bool,
}

impl BoutDecision {
    pub fn new(bout_id: impl Into<BoutId>, winner: Corner, knockout: bool) -> Self {
        Self {
            bout_id: bout_id.into(),
            winner,
            knockout,
        }
    }
}

/// Outcome of a declaration, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDeclaration {
    /// The card, now completed
    pub card: FightCard,
    /// Full roster with updated records
    pub boxers: Vec<Boxer>,
    /// Boxers whose record changed
    pub touched: Vec<BoxerId>,
}

impl ResultDeclaration {
    /// Updated boxers that need persisting
    pub fn touched_boxers(&self) -> impl Iterator<Item = &Boxer> {
        self.boxers
            .iter()
            .filter(|boxer| self.touched.contains(&boxer.id))
    }
}

/// Declare results for a card.
///
/// Decisions for unknown bout ids are skipped. Bouts without a decision stay
/// undecided. A bout whose winning corner has no boxer assigned still records
/// the decision but changes no records.
///
/// # Errors
///
/// * `ResultsError::Permission` - `DeclareResults` not granted
/// * `ResultsError::AlreadyCompleted` - card results were already declared
/// * `ResultsError::DuplicateDecision` - a bout id appears twice in `decisions`
pub fn declare_results(
    permissions: &Permissions,
    card: &FightCard,
    boxers: &[Boxer],
    decisions: &[BoutDecision],
) -> ResultsResult<ResultDeclaration> {
    permissions.require(Permission::DeclareResults)?;

    if card.status == CardStatus::Completed {
        return Err(ResultsError::AlreadyCompleted(card.id.clone()));
    }

    let mut decided = HashSet::new();
    if let Some(repeat) = decisions.iter().find(|d| !decided.insert(d.bout_id.as_str())) {
        return Err(ResultsError::DuplicateDecision(repeat.bout_id.clone()));
    }

    let mut updated = card.clone();
    let mut deltas: HashMap<BoxerId, RecordDelta> = HashMap::new();

    for decision in decisions {
        let Some(bout) = updated.bouts_mut().find(|b| b.id == decision.bout_id) else {
            debug!(
                "Skipping decision for unknown bout {} on card {}",
                decision.bout_id, card.id
            );
            continue;
        };

        bout.winner = Some(decision.winner);
        bout.knockout = decision.knockout;

        let (Some(winner), Some(loser)) = (bout.winner_id().cloned(), bout.loser_id().cloned())
        else {
            continue;
        };

        let winner_delta = deltas.entry(winner).or_default();
        winner_delta.wins += 1;
        if decision.knockout {
            winner_delta.knockouts += 1;
        }
        deltas.entry(loser).or_default().losses += 1;
    }

    updated.status = CardStatus::Completed;

    let mut touched = Vec::new();
    let boxers = boxers
        .iter()
        .map(|boxer| match deltas.get(&boxer.id) {
            Some(delta) if !delta.is_empty() => {
                touched.push(boxer.id.clone());
                boxer.with_delta(delta)
            }
            _ => boxer.clone(),
        })
        .collect();

    info!(
        "Declared results for card {}: {} decision(s), {} boxer record(s) updated",
        card.id,
        decisions.len(),
        touched.len()
    );

    Ok(ResultDeclaration {
        card: updated,
        boxers,
        touched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fight_card::models::Bout;

    fn roster() -> Vec<Boxer> {
        vec![
            Boxer::new("a", "S-A", "Alvarez").with_record(5, 1, 3),
            Boxer::new("b", "S-B", "Benn").with_record(7, 0, 2),
            Boxer::new("c", "S-C", "Cole").with_record(2, 2, 0),
            Boxer::new("d", "S-D", "Diaz").with_record(0, 0, 0),
        ]
    }

    fn card() -> FightCard {
        FightCard::new("card-1", "Test Card", Bout::new("main", "a", "b"))
            .with_undercard(Bout::new("u1", "c", "d"))
    }

    #[test]
    fn test_requires_permission() {
        let result = declare_results(&Permissions::none(), &card(), &roster(), &[]);
        assert!(matches!(result, Err(ResultsError::Permission(_))));
    }

    #[test]
    fn test_rejects_completed_card() {
        let mut completed = card();
        completed.status = CardStatus::Completed;
        let result = declare_results(&Permissions::all(), &completed, &roster(), &[]);
        assert!(matches!(result, Err(ResultsError::AlreadyCompleted(_))));
    }

    #[test]
    fn test_partial_declaration_leaves_bout_undecided() {
        let decisions = vec![BoutDecision::new("main", Corner::Fighter1, false)];
        let outcome = declare_results(&Permissions::all(), &card(), &roster(), &decisions).unwrap();

        assert_eq!(outcome.card.status, CardStatus::Completed);
        assert_eq!(outcome.card.main_event.winner, Some(Corner::Fighter1));
        assert_eq!(outcome.card.other_bouts[0].winner, None);
        assert_eq!(outcome.touched, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_unknown_bout_is_skipped() {
        let decisions = vec![BoutDecision::new("ghost", Corner::Fighter1, true)];
        let outcome = declare_results(&Permissions::all(), &card(), &roster(), &decisions).unwrap();
        assert!(outcome.touched.is_empty());
        assert_eq!(outcome.boxers, roster());
    }

    #[test]
    fn test_boxer_on_two_bouts_accumulates() {
        let card = FightCard::new("card-2", "Double Duty", Bout::new("main", "a", "b"))
            .with_undercard(Bout::new("u1", "a", "c"));
        let decisions = vec![
            BoutDecision::new("main", Corner::Fighter1, true),
            BoutDecision::new("u1", Corner::Fighter1, false),
        ];

        let outcome = declare_results(&Permissions::all(), &card, &roster(), &decisions).unwrap();
        let a = outcome.boxers.iter().find(|b| b.id == "a").unwrap();
        assert_eq!(a.wins, 7);
        assert_eq!(a.knockouts, 4);
        assert_eq!(a.losses, 1);
    }

    #[test]
    fn test_repeated_bout_is_rejected() {
        let decisions = vec![
            BoutDecision::new("main", Corner::Fighter1, true),
            BoutDecision::new("main", Corner::Fighter1, true),
        ];
        let result = declare_results(&Permissions::all(), &card(), &roster(), &decisions);
        assert!(matches!(result, Err(ResultsError::DuplicateDecision(id)) if id == "main"));

        let conflicting = vec![
            BoutDecision::new("main", Corner::Fighter1, false),
            BoutDecision::new("u1", Corner::Fighter2, false),
            BoutDecision::new("main", Corner::Fighter2, false),
        ];
        let result = declare_results(&Permissions::all(), &card(), &roster(), &conflicting);
        assert!(matches!(result, Err(ResultsError::DuplicateDecision(_))));
    }

    #[test]
    fn test_input_card_not_mutated() {
        let original = card();
        let decisions = vec![BoutDecision::new("main", Corner::Fighter2, false)];
        let _ = declare_results(&Permissions::all(), &original, &roster(), &decisions).unwrap();
        assert_eq!(original.status, CardStatus::Upcoming);
        assert_eq!(original.main_event.winner, None);
    }
}
