//! Tests for subset enumeration.

use std::collections::HashSet;

use space_ranker::{space_combinations, CombinationKey};

fn key(ids: &[&str]) -> CombinationKey {
    CombinationKey::new(ids.iter().copied())
}

#[test]
fn no_spaces_yields_no_combinations() {
    let ids: [&str; 0] = [];
    assert!(space_combinations(&ids).is_empty());
}

#[test]
fn single_space_yields_itself() {
    assert_eq!(space_combinations(&["A1"]), vec![key(&["A1"])]);
}

#[test]
fn three_spaces_in_size_then_lexicographic_order() {
    let combos = space_combinations(&["A1", "A2", "A3"]);
    assert_eq!(
        combos,
        vec![
            key(&["A1"]),
            key(&["A2"]),
            key(&["A3"]),
            key(&["A1", "A2"]),
            key(&["A1", "A3"]),
            key(&["A2", "A3"]),
            key(&["A1", "A2", "A3"]),
        ]
    );
}

#[test]
fn n_spaces_yield_two_pow_n_minus_one_unique_subsets() {
    let ids: Vec<String> = (0..10).map(|i| format!("S{:02}", i)).collect();
    let combos = space_combinations(&ids);

    assert_eq!(combos.len(), (1 << 10) - 1);
    let unique: HashSet<_> = combos.iter().collect();
    assert_eq!(unique.len(), combos.len());
    assert!(combos.iter().all(|c| !c.is_empty()));
}

#[test]
fn duplicate_ids_are_collapsed() {
    let combos = space_combinations(&["B", "A", "B"]);
    assert_eq!(combos.len(), 3);
}

#[test]
fn key_is_order_independent() {
    assert_eq!(key(&["A3", "A1"]), key(&["A1", "A3"]));
    assert_eq!(key(&["A1", "A1"]).len(), 1);
    assert!(key(&["A1", "A3"]).contains("A3"));
    assert!(!key(&["A1", "A3"]).contains("A2"));
}

#[test]
fn keys_order_lexicographically() {
    assert!(key(&["A1", "A2"]) < key(&["A1", "A2", "A3"]));
    assert!(key(&["A1", "A2", "A3"]) < key(&["A1", "A3"]));
    assert!(key(&["A1"]) < key(&["A2"]));
}

#[test]
fn key_displays_as_tuple() {
    assert_eq!(key(&["A3", "A1"]).to_string(), "(A1, A3)");
}

#[test]
fn key_serializes_canonical_member_list() {
    let json = serde_json::to_string(&key(&["B", "A", "B"])).unwrap();
    assert_eq!(json, r#"["A","B"]"#);
}
