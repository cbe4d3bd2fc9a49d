use crate::domain::routing::{RoutingConfig, RoutingMode};
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The store has no routing configuration at all. A setup problem, not a
    /// payment decline.
    NoRoutingConfigured,
    /// Every eligible PSP is excluded or the config has none to offer.
    NoCandidate,
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub psp_id: String,
    pub reason: String,
}

/// Picks the next PSP to try for one payment attempt. Pure: reads only the
/// resolved config and the exclusion set, draws from the injected rng.
///
/// `excluded` must contain every PSP already attempted in this logical
/// payment, whatever the outcome was — a PSP is never revisited.
pub fn select_next<R: Rng>(
    config: Option<&RoutingConfig>,
    excluded: &HashSet<String>,
    rng: &mut R,
) -> Result<Selection, SelectionError> {
    let config = config.ok_or(SelectionError::NoRoutingConfigured)?;
    match config.mode {
        RoutingMode::Manual => select_manual(config, excluded),
        RoutingMode::Automatic => select_weighted(config, excluded, rng),
    }
}

fn select_manual(
    config: &RoutingConfig,
    excluded: &HashSet<String>,
) -> Result<Selection, SelectionError> {
    config
        .fallback_sequence
        .iter()
        .filter(|entry| !excluded.contains(&entry.psp_id))
        .min_by_key(|entry| entry.order)
        .map(|entry| Selection {
            psp_id: entry.psp_id.clone(),
            reason: format!("manual(order={})", entry.order),
        })
        .ok_or(SelectionError::NoCandidate)
}

fn select_weighted<R: Rng>(
    config: &RoutingConfig,
    excluded: &HashSet<String>,
    rng: &mut R,
) -> Result<Selection, SelectionError> {
    let eligible: Vec<_> = config
        .psp_weights
        .iter()
        .filter(|w| w.weight > 0.0 && !excluded.contains(&w.psp_id))
        .collect();

    let total: f64 = eligible.iter().map(|w| w.weight).sum();
    if eligible.is_empty() || total <= 0.0 {
        return Err(SelectionError::NoCandidate);
    }

    let draw = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for entry in &eligible {
        cumulative += entry.weight;
        if draw < cumulative {
            return Ok(Selection {
                psp_id: entry.psp_id.clone(),
                reason: format!("weighted(weight={:.2},total={:.2})", entry.weight, total),
            });
        }
    }

    // Float summation can leave the draw at the upper edge of the last bucket.
    let last = eligible[eligible.len() - 1];
    Ok(Selection {
        psp_id: last.psp_id.clone(),
        reason: format!("weighted(weight={:.2},total={:.2})", last.weight, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::routing::{FallbackEntry, PspWeight};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

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

    #[test]
    fn missing_config_is_a_setup_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = select_next(None, &HashSet::new(), &mut rng);
        assert_eq!(result.unwrap_err(), SelectionError::NoRoutingConfigured);
    }

    #[test]
    fn manual_picks_lowest_order_even_when_unsorted() {
        let config = manual_config(&[("adyen", 20), ("stripe", 5), ("mollie", 10)]);
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select_next(Some(&config), &HashSet::new(), &mut rng).unwrap();
        assert_eq!(picked.psp_id, "stripe");
    }

    #[test]
    fn weighted_skips_zero_weight_entries() {
        let config = RoutingConfig {
            store_id: "store_1".to_string(),
            mode: RoutingMode::Automatic,
            fallback_enabled: true,
            max_retries: 3,
            psp_weights: vec![
                PspWeight {
                    psp_id: "dead".to_string(),
                    psp_name: "dead".to_string(),
                    weight: 0.0,
                },
                PspWeight {
                    psp_id: "live".to_string(),
                    psp_name: "live".to_string(),
                    weight: 1.0,
                },
            ],
            fallback_sequence: vec![],
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let picked = select_next(Some(&config), &HashSet::new(), &mut rng).unwrap();
            assert_eq!(picked.psp_id, "live");
        }
    }
}
