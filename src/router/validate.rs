use crate::domain::routing::{SequenceInput, WeightInput};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("weight for psp {psp_id} must be a non-negative number")]
    InvalidWeight { psp_id: String },
    #[error("psp {psp_id} appears more than once")]
    DuplicatePsp { psp_id: String },
    #[error("order {order} appears more than once in fallback sequence")]
    DuplicateOrder { order: i32 },
}

/// Validates a full weight replacement payload. Rejects the whole set on the
/// first bad entry; an empty set is valid (clears the table).
pub fn validate_weights(entries: &[WeightInput]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !entry.weight.is_finite() || entry.weight < 0.0 {
            return Err(ValidationError::InvalidWeight {
                psp_id: entry.psp_id.clone(),
            });
        }
        if !seen.insert(entry.psp_id.as_str()) {
            return Err(ValidationError::DuplicatePsp {
                psp_id: entry.psp_id.clone(),
            });
        }
    }
    Ok(())
}

/// Validates a full fallback-sequence replacement payload: no duplicate psp,
/// no tied orders. Orders need not be contiguous.
pub fn validate_sequence(entries: &[SequenceInput]) -> Result<(), ValidationError> {
    let mut seen_psps = HashSet::new();
    let mut seen_orders = HashSet::new();
    for entry in entries {
        if !seen_psps.insert(entry.psp_id.as_str()) {
            return Err(ValidationError::DuplicatePsp {
                psp_id: entry.psp_id.clone(),
            });
        }
        if !seen_orders.insert(entry.order) {
            return Err(ValidationError::DuplicateOrder { order: entry.order });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_weight() {
        let entries = vec![WeightInput {
            psp_id: "stripe".to_string(),
            weight: -1.0,
        }];
        assert!(matches!(
            validate_weights(&entries),
            Err(ValidationError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn rejects_nan_weight() {
        let entries = vec![WeightInput {
            psp_id: "stripe".to_string(),
            weight: f64::NAN,
        }];
        assert!(matches!(
            validate_weights(&entries),
            Err(ValidationError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_psp_in_sequence() {
        let entries = vec![
            SequenceInput {
                psp_id: "stripe".to_string(),
                order: 1,
            },
            SequenceInput {
                psp_id: "stripe".to_string(),
                order: 2,
            },
        ];
        assert!(matches!(
            validate_sequence(&entries),
            Err(ValidationError::DuplicatePsp { .. })
        ));
    }

    #[test]
    fn accepts_gapped_orders() {
        let entries = vec![
            SequenceInput {
                psp_id: "stripe".to_string(),
                order: 10,
            },
            SequenceInput {
                psp_id: "adyen".to_string(),
                order: 30,
            },
        ];
        assert!(validate_sequence(&entries).is_ok());
    }
}
