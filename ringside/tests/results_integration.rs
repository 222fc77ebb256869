//! Integration tests for fight result declaration.

use ringside::auth::{Permissions, Role};
use ringside::fight_card::{
    Bout, BoutDecision, CardStatus, Corner, FightCard, FightCardManager, ResultsError,
    declare_results,
};
use ringside::roster::Boxer;
use ringside::store::{self, InMemoryStore};
use std::sync::Arc;

fn roster() -> Vec<Boxer> {
    vec![
        Boxer::new("a", "ST-A", "Ana").with_record(3, 1, 2),
        Boxer::new("b", "ST-B", "Bea").with_record(5, 0, 4),
        Boxer::new("c", "ST-C", "Cruz").with_record(1, 1, 0),
        Boxer::new("d", "ST-D", "Dee"),
        Boxer::new("e", "ST-E", "Eli").with_record(7, 2, 3),
    ]
}

fn card() -> FightCard {
    FightCard::new("card-9", "Harbor Lights", Bout::new("main", "a", "b"))
        .with_co_main(Bout::new("co", "c", "d"))
}

#[test]
fn test_knockout_win_arithmetic() {
    let commissioner = Permissions::for_role(Role::Commissioner);
    let decisions = vec![BoutDecision::new("main", Corner::Fighter1, true)];

    let outcome = declare_results(&commissioner, &card(), &roster(), &decisions).unwrap();

    let find = |id: &str| outcome.boxers.iter().find(|b| b.id == id).unwrap();
    assert_eq!((find("a").wins, find("a").losses, find("a").knockouts), (4, 1, 3));
    assert_eq!((find("b").wins, find("b").losses, find("b").knockouts), (5, 1, 4));

    // Untouched boxers keep their records
    let before = roster();
    for id in ["c", "d", "e"] {
        assert_eq!(find(id), before.iter().find(|b| b.id == id).unwrap());
    }

    assert_eq!(outcome.card.status, CardStatus::Completed);
    assert_eq!(outcome.card.main_event.winner, Some(Corner::Fighter1));
    assert!(outcome.card.main_event.knockout);
    // Undecided bout stays open
    assert_eq!(outcome.card.co_main_event.as_ref().unwrap().winner, None);

    let mut touched = outcome.touched.clone();
    touched.sort();
    assert_eq!(touched, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_unknown_bouts_are_skipped() {
    let decisions = vec![
        BoutDecision::new("ghost", Corner::Fighter1, false),
        BoutDecision::new("co", Corner::Fighter2, false),
    ];
    let outcome = declare_results(&Permissions::all(), &card(), &roster(), &decisions).unwrap();

    let dee = outcome.boxers.iter().find(|b| b.id == "d").unwrap();
    assert_eq!((dee.wins, dee.knockouts), (1, 0));
}

#[test]
fn test_inputs_are_not_mutated() {
    let card = card();
    let boxers = roster();
    let decisions = vec![BoutDecision::new("main", Corner::Fighter2, false)];

    let _ = declare_results(&Permissions::all(), &card, &boxers, &decisions).unwrap();
    assert_eq!(card.status, CardStatus::Upcoming);
    assert_eq!(boxers, roster());
}

#[test]
fn test_cashier_cannot_declare() {
    let result = declare_results(
        &Permissions::for_role(Role::Cashier),
        &card(),
        &roster(),
        &[],
    );
    assert!(matches!(result, Err(ResultsError::Permission(_))));
}

#[tokio::test]
async fn test_manager_persists_declaration() {
    let store = Arc::new(InMemoryStore::new());
    for boxer in roster() {
        store::insert(store.as_ref(), &boxer).await.unwrap();
    }
    store::insert(store.as_ref(), &card()).await.unwrap();

    let manager = FightCardManager::new(store.clone());
    manager
        .declare_results(
            &Permissions::all(),
            "card-9",
            &[BoutDecision::new("co", Corner::Fighter1, true)],
        )
        .await
        .unwrap();

    let cruz: Boxer = store::fetch(store.as_ref(), "c").await.unwrap();
    assert_eq!((cruz.wins, cruz.knockouts), (2, 1));
    let card: FightCard = manager.get_card("card-9").await.unwrap();
    assert!(card.is_completed());
}
