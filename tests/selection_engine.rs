use psp_router::domain::routing::{FallbackEntry, PspWeight, RoutingConfig, RoutingMode};
use psp_router::router::selection::{select_next, SelectionError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};

fn manual_config(entries: &[(&str, i32)]) -> RoutingConfig {
    RoutingConfig {
        store_id: "store_1".to_string(),
        mode: RoutingMode::Manual,
        fallback_enabled: true,
        max_retries: 3,
        psp_weights: vec![],
        fallback_sequence: entries
            .iter()
            .map(|(id, order)| FallbackEntry {
                psp_id: id.to_string(),
                psp_name: id.to_string(),
                order: *order,
            })
            .collect(),
    }
}

fn automatic_config(weights: &[(&str, f64)]) -> RoutingConfig {
    RoutingConfig {
        store_id: "store_1".to_string(),
        mode: RoutingMode::Automatic,
        fallback_enabled: true,
        max_retries: 3,
        psp_weights: weights
            .iter()
            .map(|(id, weight)| PspWeight {
                psp_id: id.to_string(),
                psp_name: id.to_string(),
                weight: *weight,
            })
            .collect(),
        fallback_sequence: vec![],
    }
}

#[test]
fn manual_returns_lowest_order_first() {
    let config = manual_config(&[("stripe", 1), ("adyen", 2), ("mollie", 3)]);
    let mut rng = StdRng::seed_from_u64(42);
    let picked = select_next(Some(&config), &HashSet::new(), &mut rng).unwrap();
    assert_eq!(picked.psp_id, "stripe");
}

#[test]
fn manual_enumerates_every_psp_once_in_order() {
    let config = manual_config(&[("stripe", 1), ("adyen", 2), ("mollie", 3)]);
    let mut rng = StdRng::seed_from_u64(42);
    let mut excluded = HashSet::new();
    let mut walked = Vec::new();

    loop {
        match select_next(Some(&config), &excluded, &mut rng) {
            Ok(selection) => {
                excluded.insert(selection.psp_id.clone());
                walked.push(selection.psp_id);
            }
            Err(e) => {
                assert_eq!(e, SelectionError::NoCandidate);
                break;
            }
        }
    }

    assert_eq!(walked, vec!["stripe", "adyen", "mollie"]);
}

#[test]
fn manual_orders_need_not_be_contiguous() {
    let config = manual_config(&[("stripe", 10), ("adyen", 200), ("mollie", 35)]);
    let mut rng = StdRng::seed_from_u64(42);
    let mut excluded = HashSet::new();
    let mut walked = Vec::new();

    while let Ok(selection) = select_next(Some(&config), &excluded, &mut rng) {
        excluded.insert(selection.psp_id.clone());
        walked.push(selection.psp_id);
    }

    assert_eq!(walked, vec!["stripe", "mollie", "adyen"]);
}

#[test]
fn no_config_is_distinct_from_exhaustion() {
    let mut rng = StdRng::seed_from_u64(42);
    assert_eq!(
        select_next(None, &HashSet::new(), &mut rng).unwrap_err(),
        SelectionError::NoRoutingConfigured
    );

    let config = manual_config(&[]);
    assert_eq!(
        select_next(Some(&config), &HashSet::new(), &mut rng).unwrap_err(),
        SelectionError::NoCandidate
    );
}

#[test]
fn weighted_frequencies_converge_to_weight_ratios() {
    let config = automatic_config(&[("stripe", 1.0), ("adyen", 3.0)]);
    let mut rng = StdRng::seed_from_u64(1234);
    let draws = 10_000;

    let mut counts: HashMap<String, u32> = HashMap::new();
    for _ in 0..draws {
        let picked = select_next(Some(&config), &HashSet::new(), &mut rng).unwrap();
        *counts.entry(picked.psp_id).or_insert(0) += 1;
    }

    let stripe_share = f64::from(counts["stripe"]) / f64::from(draws);
    let adyen_share = f64::from(counts["adyen"]) / f64::from(draws);
    assert!((stripe_share - 0.25).abs() < 0.03, "stripe share {stripe_share}");
    assert!((adyen_share - 0.75).abs() < 0.03, "adyen share {adyen_share}");
}

#[test]
fn zero_weight_psp_is_never_selected() {
    let config = automatic_config(&[("dead", 0.0), ("stripe", 50.0), ("adyen", 50.0)]);
    let mut rng = StdRng::seed_from_u64(99);

    let mut counts: HashMap<String, u32> = HashMap::new();
    for _ in 0..10_000 {
        let picked = select_next(Some(&config), &HashSet::new(), &mut rng).unwrap();
        *counts.entry(picked.psp_id).or_insert(0) += 1;
    }

    assert!(!counts.contains_key("dead"));
    let stripe_share = f64::from(counts["stripe"]) / 10_000.0;
    assert!((stripe_share - 0.5).abs() < 0.03, "stripe share {stripe_share}");
}

#[test]
fn weighted_selection_respects_exclusions() {
    let config = automatic_config(&[("stripe", 10.0), ("adyen", 1.0)]);
    let mut rng = StdRng::seed_from_u64(5);
    let excluded: HashSet<String> = ["stripe".to_string()].into_iter().collect();

    for _ in 0..100 {
        let picked = select_next(Some(&config), &excluded, &mut rng).unwrap();
        assert_eq!(picked.psp_id, "adyen");
    }
}

#[test]
fn all_zero_weights_exhaust_immediately() {
    let config = automatic_config(&[("stripe", 0.0), ("adyen", 0.0)]);
    let mut rng = StdRng::seed_from_u64(5);
    assert_eq!(
        select_next(Some(&config), &HashSet::new(), &mut rng).unwrap_err(),
        SelectionError::NoCandidate
    );
}

#[test]
fn seeded_rng_reproduces_the_same_walk() {
    let config = automatic_config(&[("stripe", 2.0), ("adyen", 5.0), ("mollie", 3.0)]);

    let walk = |seed: u64| -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut excluded = HashSet::new();
        let mut picked = Vec::new();
        while let Ok(selection) = select_next(Some(&config), &excluded, &mut rng) {
            excluded.insert(selection.psp_id.clone());
            picked.push(selection.psp_id);
        }
        picked
    };

    assert_eq!(walk(77), walk(77));
}
