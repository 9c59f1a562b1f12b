//! Transport allocation engine.
//!
//! The per-tick distributor: each company spends its transport capacity
//! moving resources between stations in strict priority order, stopping
//! the instant the budget runs out:
//!
//! 1. consumer stations, one full slot per customer resource;
//! 2. maintenance stations, one full slot per maintenance resource;
//! 3. active factory inputs up to 1x per-cycle consumption;
//! 4. the same up to 2x consumption (a buffer);
//! 5. active factories up to one slot's capacity regardless of need;
//! 6. the same for inactive factories, lowest priority.
//!
//! Passes 3-6 scan stations from the sector's rotating fairness cursor
//! and advance it per station visited, so no station is perpetually
//! served first across ticks. Cross-owner moves settle money and
//! reputation through [`settle_trade`]; hostile companies never trade.

use crate::config::EconomyConfig;
use crate::state::{Capability, SectorState, Tag};
use crate::systems::capacity::transport_capacity;
use crate::systems::logistics::take_useless_resources;
use crate::systems::trade::simulate_trade;
use sectordata::{PriceContext, ResourceCatalog, ResourceId};
use tracing::instrument;

/// How much of a resource a destination is entitled to pull in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportLimit {
    /// Multiples of the factory's per-cycle consumption.
    Production(u32),
    /// Multiples of one cargo slot's capacity.
    CargoBay(u32),
}

impl TransportLimit {
    pub(crate) fn needed_quantity(self, consumed_per_cycle: u32, slot_capacity: u32) -> u32 {
        match self {
            TransportLimit::Production(cycles) => consumed_per_cycle * cycles,
            TransportLimit::CargoBay(slots) => slot_capacity * slots,
        }
    }
}

/// Units `money` can pay for at `unit_price` credits each.
pub(crate) fn affordable_units(money: i64, unit_price: i64) -> u32 {
    debug_assert!(unit_price >= 1);
    (money / unit_price.max(1)).clamp(0, u32::MAX as i64) as u32
}

/// Settle a cross-owner sale: the buyer pays `quantity * unit_price`,
/// the seller receives exactly the same amount, and both sides gain the
/// fixed capped reputation increment. Same-owner moves are free.
pub(crate) fn settle_trade(
    state: &mut SectorState,
    config: &EconomyConfig,
    buyer: &str,
    seller: &str,
    quantity: u32,
    unit_price: i64,
) {
    if buyer == seller || quantity == 0 {
        return;
    }

    let amount = quantity as i64 * unit_price;
    if !state.company_mut(buyer).take_money(amount) {
        // Affordability caps upstream should make this unreachable.
        log::warn!("company '{buyer}' cannot pay {amount} credits to '{seller}'; trade unsettled");
        return;
    }
    state.company_mut(seller).give_money(amount);
    state
        .company_mut(buyer)
        .give_reputation(seller, config.reputation_gain);
    state
        .company_mut(seller)
        .give_reputation(buyer, config.reputation_gain);

    log::trace!("'{buyer}' paid {amount} credits to '{seller}' for {quantity} units");
}

/// Per-tick transport entry point: every company spends its home
/// capacity, then leftover capacity feeds the cross-owner trade
/// reconciler.
#[instrument(skip_all, name = "transport")]
pub fn run_transport_tick(state: &mut SectorState, catalog: &ResourceCatalog, config: &EconomyConfig) {
    let mut remaining: Vec<(Tag, u32)> = Vec::new();

    for tag in state.company_tags() {
        let capacity = transport_capacity(state, &tag, false);
        let used = simulate_transport_for(state, catalog, config, &tag, capacity, true);
        remaining.push((tag, capacity - used));
    }

    simulate_trade(state, catalog, config, &mut remaining);
}

/// Run the six allocation passes for one company against `initial`
/// capacity. Returns the capacity actually spent.
pub fn simulate_transport_for(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    initial: u32,
    allow_trade: bool,
) -> u32 {
    if initial == 0 || state.stations.is_empty() {
        return 0;
    }

    if state.station_cursor >= state.stations.len() {
        state.station_cursor = 0;
    }

    let mut budget = initial;

    fill_capability_needs(
        state,
        catalog,
        config,
        company,
        &mut budget,
        Capability::Consumer,
        allow_trade,
    );
    fill_capability_needs(
        state,
        catalog,
        config,
        company,
        &mut budget,
        Capability::Maintenance,
        allow_trade,
    );

    let adaptive_passes = [
        (TransportLimit::Production(1), true),
        (TransportLimit::Production(2), true),
        (TransportLimit::CargoBay(1), true),
        (TransportLimit::CargoBay(1), false),
    ];
    for (limit, active_only) in adaptive_passes {
        if budget == 0 {
            break;
        }
        adaptive_transport_resources(
            state,
            catalog,
            config,
            company,
            &mut budget,
            limit,
            active_only,
            allow_trade,
        );
    }

    initial - budget
}

/// Passes 1-2: top up Consumer/Maintenance stations to one full cargo
/// slot per relevant resource.
pub fn fill_capability_needs(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    budget: &mut u32,
    capability: Capability,
    allow_trade: bool,
) {
    let resources: Vec<ResourceId> = match capability {
        Capability::Consumer => catalog.customer_resources().collect(),
        Capability::Maintenance => catalog.maintenance_resources().collect(),
        Capability::Storage => return,
    };

    let station_count = state.stations.len();
    if station_count == 0 {
        return;
    }
    for resource in resources {
        let unit_sell_price = state.resource_price(catalog, resource, PriceContext::FactoryInput);

        // Scan from the fairness cursor, but don't advance it; only the
        // adaptive passes rotate it.
        for offset in 0..station_count {
            if *budget == 0 {
                return;
            }

            let index = (state.station_cursor + offset) % station_count;
            let station = &state.stations[index];
            if (!allow_trade && station.company != company)
                || !station.has_capability(capability)
                || state.diplomacy.is_hostile(&station.company, company)
            {
                continue;
            }

            // One full slot per resource is the target; stations already
            // holding more are left alone.
            let stored = station.cargo.quantity(resource);
            let slot_capacity = station.cargo.slot_capacity();
            if stored > slot_capacity {
                continue;
            }

            let mut to_transfer = (slot_capacity - stored)
                .min(station.cargo.free_space_for(resource))
                .min(*budget);
            let destination = station.company.clone();
            if destination != company {
                to_transfer = to_transfer.min(affordable_units(
                    state.company(&destination).money,
                    unit_sell_price,
                ));
            }

            let taken =
                take_useless_resources(state, catalog, config, company, resource, to_transfer, allow_trade);
            let given = state.stations[index].cargo.give(resource, taken);
            debug_assert_eq!(given, taken, "free space was checked before the take");
            *budget -= taken;

            if taken > 0 && destination != company {
                settle_trade(state, config, &destination, company, taken, unit_sell_price);
            }
        }
    }
}

/// Passes 3-6: fill factory inputs, scanning from the rotating cursor.
///
/// `active_only` restricts service to factories that are active and
/// still need production; the limit decides whether the target is
/// per-cycle consumption or raw slot capacity.
#[allow(clippy::too_many_arguments)]
pub fn adaptive_transport_resources(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    company: &str,
    budget: &mut u32,
    limit: TransportLimit,
    active_only: bool,
    allow_trade: bool,
) {
    let station_count = state.stations.len();

    for _ in 0..station_count {
        if state.station_cursor >= station_count {
            state.station_cursor = 0;
        }
        let index = state.station_cursor;
        state.station_cursor = (state.station_cursor + 1) % station_count;

        let station = &state.stations[index];
        if (!allow_trade && station.company != company)
            || state.diplomacy.is_hostile(&station.company, company)
        {
            continue;
        }

        for factory_index in 0..state.stations[index].factories.len() {
            let factory = &state.stations[index].factories[factory_index];
            if active_only && (!factory.active || !factory.needs_production) {
                break;
            }

            for input_index in 0..state.stations[index].factories[factory_index].inputs.len() {
                let station = &state.stations[index];
                let slot = station.factories[factory_index].inputs[input_index];
                let resource = slot.resource;

                let stored = station.cargo.quantity(resource);
                let needed = limit.needed_quantity(slot.quantity, station.cargo.slot_capacity());
                if stored >= needed {
                    continue;
                }

                let free_space = station.cargo.free_space_for(resource);
                let unit_sell_price =
                    state.resource_price(catalog, resource, PriceContext::FactoryInput);

                let mut to_transfer = (*budget).min(needed - stored).min(free_space);
                let destination = station.company.clone();
                if destination != company {
                    to_transfer = to_transfer.min(affordable_units(
                        state.company(&destination).money,
                        unit_sell_price,
                    ));
                }

                let taken = take_useless_resources(
                    state, catalog, config, company, resource, to_transfer, allow_trade,
                );
                let given = state.stations[index].cargo.give(resource, taken);
                debug_assert_eq!(given, taken, "free space was checked before the take");
                *budget -= taken;

                if taken > 0 && destination != company {
                    settle_trade(state, config, &destination, company, taken, unit_sell_price);
                }

                if *budget == 0 {
                    return;
                }
            }
        }
    }
}
