//! Cross-owner trade reconciliation.
//!
//! After every company has spent what it wanted on its own priorities,
//! leftover transport capacity is pooled and re-offered to the sector's
//! unmet demand. Each iteration hands every company a quota proportional
//! to its share of the remaining pool, so a company with most of the
//! spare ships does most of the remaining hauling. Companies whose
//! capacity stops producing movement are dropped from the pool.

use crate::config::EconomyConfig;
use crate::state::{SectorState, Tag};
use crate::systems::capacity::transport_capacity_needs;
use crate::systems::transport::simulate_transport_for;
use sectordata::ResourceCatalog;
use tracing::instrument;

/// Spend the companies' remaining transport capacity on sector-wide
/// unmet needs, iterating until either the needs or the pool runs dry.
///
/// `remaining` holds each company's unspent capacity and is drawn down
/// in place.
#[instrument(skip_all, name = "trade")]
pub fn simulate_trade(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    remaining: &mut [(Tag, u32)],
) {
    loop {
        let total_needs: u32 = remaining
            .iter()
            .map(|(tag, _)| transport_capacity_needs(state, catalog, tag, true))
            .sum();
        let total_remaining: u32 = remaining.iter().map(|(_, capacity)| *capacity).sum();
        if total_needs == 0 || total_remaining == 0 {
            return;
        }

        let mut moved = 0u32;
        for index in 0..remaining.len() {
            let (ref tag, capacity) = remaining[index];
            if capacity == 0 {
                continue;
            }
            let tag = tag.clone();

            // Proportional share of the outstanding work, never more
            // than the company's own leftover capacity.
            let quota =
                (total_needs as u64 * capacity as u64 / total_remaining as u64) as u32;
            let budget = quota.min(capacity);

            let used = simulate_transport_for(state, catalog, config, &tag, budget, true);
            if used == 0 {
                // Capacity that can't move anything is dead weight;
                // retire it so the others' quotas grow.
                remaining[index].1 = 0;
            } else {
                remaining[index].1 -= used;
                moved += used;
            }
        }

        if moved == 0 {
            log::warn!(
                "trade reconciliation stalled with {total_needs} unmet needs; retiring pool"
            );
            return;
        }
    }
}
