//! Transport capacity and demand queries.
//!
//! Capacity is the cargo space an owner's assigned ships contribute to
//! the sector per tick. Needs bound the usefully movable quantity of each
//! resource by both demand headroom (free slot space on stations that
//! want it) and idle supply (stock held by stations that don't).

use crate::state::{Capability, SectorState};
use sectordata::{ResourceCatalog, ResourceId};

/// Total cargo capacity of `company`'s ships assigned to the sector
/// (or of every company's, when `all_companies` is set).
pub fn transport_capacity(state: &SectorState, company: &str, all_companies: bool) -> u32 {
    state
        .ships
        .iter()
        .filter(|ship| ship.assigned && (all_companies || ship.company == company))
        .map(|ship| ship.cargo.capacity())
        .sum()
}

/// Unmet transport demand for `company`, summed over all resources.
///
/// For each resource, `input` is the free slot headroom on visible
/// stations that need it and `stock` is the quantity held by visible
/// stations that don't; the resource contributes `min(input, stock)`.
pub fn transport_capacity_needs(
    state: &SectorState,
    catalog: &ResourceCatalog,
    company: &str,
    allow_trade: bool,
) -> u32 {
    let mut needs = 0u32;

    for resource in catalog.ids() {
        let mut input = 0u32;
        let mut stock = 0u32;

        for station in &state.stations {
            if (!allow_trade && station.company != company)
                || state.diplomacy.is_hostile(&station.company, company)
            {
                continue;
            }

            let headroom = station
                .cargo
                .slot_capacity()
                .saturating_sub(station.cargo.quantity(resource));
            let mut need_resource = false;

            for factory in &station.factories {
                if factory.active && factory.has_input_resource(resource) {
                    input += headroom;
                    need_resource = true;
                    break;
                }
            }

            if station.has_capability(Capability::Consumer)
                && catalog.is_customer_resource(resource)
            {
                input += headroom;
                need_resource = true;
            }

            if station.has_capability(Capability::Maintenance)
                && catalog.is_maintenance_resource(resource)
            {
                input += headroom;
                need_resource = true;
            }

            if !need_resource {
                stock += station.cargo.quantity(resource);
            }
        }

        needs += input.min(stock);
    }

    needs
}

/// Diagnostic: spare capacity (positive) or shortfall (negative).
pub fn transport_capacity_balance(
    state: &SectorState,
    catalog: &ResourceCatalog,
    company: &str,
    allow_trade: bool,
) -> i64 {
    transport_capacity(state, company, allow_trade) as i64
        - transport_capacity_needs(state, catalog, company, allow_trade) as i64
}

/// Aggregate stock of `resource` held by `company` in the sector.
pub fn resource_count(
    state: &SectorState,
    company: &str,
    resource: ResourceId,
    include_ships: bool,
) -> u32 {
    let station_stock: u32 = state
        .stations
        .iter()
        .filter(|s| s.company == company)
        .map(|s| s.cargo.quantity(resource))
        .sum();

    if !include_ships {
        return station_stock;
    }

    station_stock
        + state
            .ships
            .iter()
            .filter(|s| s.company == company)
            .map(|s| s.cargo.quantity(resource))
            .sum::<u32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{consumer_factory, producer_factory, SectorStateBuilder};

    const ORE: ResourceId = ResourceId(0);

    #[test]
    fn test_capacity_counts_only_assigned_own_ships() {
        let state = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_company("NEM", 1000)
            .with_ship("sig-1", "SIG", 100)
            .with_ship("sig-2", "SIG", 50)
            .with_unassigned_ship("sig-3", "SIG", 400)
            .with_ship("nem-1", "NEM", 70)
            .build();

        assert_eq!(transport_capacity(&state, "SIG", false), 150);
        assert_eq!(transport_capacity(&state, "NEM", false), 70);
        assert_eq!(transport_capacity(&state, "SIG", true), 220);
    }

    #[test]
    fn test_needs_bounded_by_idle_supply() {
        // Consumer of ore with 100 headroom, but only 30 idle units exist.
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("refinery", "SIG")
            .with_factory(consumer_factory(ORE, 5))
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 30)
            .build_with_catalog();

        assert_eq!(transport_capacity_needs(&state, &catalog, "SIG", false), 30);
    }

    #[test]
    fn test_needs_bounded_by_headroom() {
        // Idle stock (400) far exceeds the consumer's slot headroom (100).
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("refinery", "SIG")
            .with_factory(consumer_factory(ORE, 5))
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 400)
            .build_with_catalog();

        assert_eq!(transport_capacity_needs(&state, &catalog, "SIG", false), 100);
    }

    #[test]
    fn test_needs_respect_trade_and_hostility_filters() {
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_company("NEM", 1000)
            .with_station("refinery", "NEM")
            .with_factory(consumer_factory(ORE, 5))
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 30)
            .build_with_catalog();

        // Without trade, NEM's starving refinery is invisible to SIG.
        assert_eq!(transport_capacity_needs(&state, &catalog, "SIG", false), 0);
        assert_eq!(transport_capacity_needs(&state, &catalog, "SIG", true), 30);

        let hostile = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_company("NEM", 1000)
            .with_station("refinery", "NEM")
            .with_factory(consumer_factory(ORE, 5))
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 30)
            .with_hostility("SIG", "NEM")
            .build();
        assert_eq!(transport_capacity_needs(&hostile, &catalog, "SIG", true), 0);
    }

    #[test]
    fn test_balance_diagnostic() {
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_ship("hauler", "SIG", 100)
            .with_station("refinery", "SIG")
            .with_factory(consumer_factory(ORE, 5))
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 30)
            .build_with_catalog();

        assert_eq!(transport_capacity_balance(&state, &catalog, "SIG", false), 70);
    }

    #[test]
    fn test_resource_count() {
        let state = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("mine", "SIG")
            .with_stock(ORE, 30)
            .with_ship("hauler", "SIG", 100)
            .build();

        assert_eq!(resource_count(&state, "SIG", ORE, false), 30);
        assert_eq!(resource_count(&state, "SIG", ORE, true), 30);
        assert_eq!(resource_count(&state, "NEM", ORE, true), 0);
    }
}
