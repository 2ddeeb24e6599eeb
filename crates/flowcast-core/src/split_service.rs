//! Keeps multi-envelope contribution splits summing to one hundred percent.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::CoreError;

const SPLIT_TOLERANCE: f64 = 1e-6;

/// Maintains percentage allocations across envelopes so that manual edits to
/// one entry redistribute proportionally across the rest.
pub struct SplitService;

impl SplitService {
    /// Applies a manual change to one entry and rebalances the others so the
    /// total stays at 100.
    ///
    /// The change's delta is distributed evenly across the remaining entries,
    /// each clamped to `[0, 100]`, and the whole map is rescaled afterwards
    /// to absorb clamping residue and floating-point drift.
    pub fn update_allocation(
        entries: &BTreeMap<Uuid, f64>,
        changed_id: Uuid,
        new_value: f64,
    ) -> Result<BTreeMap<Uuid, f64>, CoreError> {
        let Some(&old_value) = entries.get(&changed_id) else {
            return Err(CoreError::EnvelopeNotFound(changed_id));
        };

        let mut updated = entries.clone();
        if updated.len() == 1 {
            updated.insert(changed_id, 100.0);
            return Ok(updated);
        }

        let new_value = new_value.clamp(0.0, 100.0);
        let share = (old_value - new_value) / (updated.len() - 1) as f64;
        for (id, value) in updated.iter_mut() {
            if *id == changed_id {
                *value = new_value;
            } else {
                *value = (*value + share).clamp(0.0, 100.0);
            }
        }

        let sum: f64 = updated.values().sum();
        if sum > SPLIT_TOLERANCE {
            let scale = 100.0 / sum;
            for value in updated.values_mut() {
                *value *= scale;
            }
        } else {
            // Degenerate all-zero split collapses onto the edited entry.
            for (id, value) in updated.iter_mut() {
                *value = if *id == changed_id { 100.0 } else { 0.0 };
            }
        }
        Ok(updated)
    }
}
