//! Market price simulation.
//!
//! Each tick, every resource's price drifts according to aggregate stock
//! ratios across the sector's stations:
//!
//! - starved factory inputs and starved consumer/maintenance stations
//!   push the price up;
//! - glutted factory outputs and glutted consumer/maintenance stations
//!   push it down;
//! - factories running above the margin threshold apply a small flat
//!   downward correction.
//!
//! The variation is a pure sum over stations, so any enumeration order of
//! the same station set yields the same prices. Prices never fall below
//! the floor of 1 credit.

use crate::config::EconomyConfig;
use crate::state::{Capability, SectorState};
use sectordata::{defines, ResourceCatalog, ResourceId};
use tracing::instrument;

/// Runs the per-tick price variation for every known resource.
///
/// A resource's price only moves when at least one station exerts
/// pressure on it; untouched resources keep their table entry (or the
/// catalog default) unchanged.
#[instrument(skip_all, name = "price_variation")]
pub fn run_price_variation_tick(
    state: &mut SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
) {
    for resource in catalog.ids() {
        let variation = price_variation(state, catalog, config, resource);
        if variation != 0.0 {
            let old_price = state.precise_resource_price(catalog, resource);
            let new_price =
                (old_price * (1.0 + variation / 100.0)).max(defines::prices::MIN_PRICE);
            state.set_precise_resource_price(resource, new_price);
            log::trace!(
                "price of {:?} moved {:.4} -> {:.4} (variation {:+.4}%)",
                resource,
                old_price,
                new_price,
                variation
            );
        }
    }
}

/// Signed percentage variation for one resource, summed over stations.
fn price_variation(
    state: &SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
    resource: ResourceId,
) -> f32 {
    let mut variation = 0.0_f32;

    for station in &state.stations {
        let slot_capacity = station.cargo.slot_capacity();
        if slot_capacity == 0 {
            continue;
        }
        let stock_ratio = station.cargo.quantity(resource) as f32 / slot_capacity as f32;

        for factory in &station.factories {
            if !factory.active {
                continue;
            }

            if factory.has_input_resource(resource) && stock_ratio < 0.5 {
                variation += (0.5 - stock_ratio) * config.factory_input_coeff;
            }

            if factory.has_output_resource(resource) {
                if stock_ratio > 0.5 {
                    variation -= (stock_ratio - 0.5) * config.factory_output_coeff;
                }
                if factory.margin_ratio > config.max_margin {
                    variation -= config.excess_margin_coeff;
                }
            }
        }

        if station.has_capability(Capability::Consumer) && catalog.is_customer_resource(resource) {
            if stock_ratio < 0.5 {
                variation += (0.5 - stock_ratio) * config.consumer_up_coeff;
            }
            if stock_ratio > 0.5 {
                variation -= (stock_ratio - 0.5) * config.consumer_down_coeff;
            }
        }

        if station.has_capability(Capability::Maintenance)
            && catalog.is_maintenance_resource(resource)
        {
            if stock_ratio < 0.5 {
                variation += (0.5 - stock_ratio) * config.maintenance_up_coeff;
            }
            if stock_ratio > 0.5 {
                variation -= (stock_ratio - 0.5) * config.maintenance_down_coeff;
            }
        }
    }

    variation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{consumer_factory, producer_factory, SectorStateBuilder};
    use proptest::prelude::*;

    const ORE: ResourceId = ResourceId(0);
    const FOOD: ResourceId = ResourceId(1);

    #[test]
    fn test_starved_input_raises_price() {
        let (mut state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("refinery", "SIG")
            .with_factory(consumer_factory(ORE, 5))
            .with_price(ORE, 10.0)
            .build_with_catalog();

        run_price_variation_tick(&mut state, &catalog, &EconomyConfig::default());

        assert!(state.precise_resource_price(&catalog, ORE) > 10.0);
    }

    #[test]
    fn test_glutted_output_lowers_price() {
        let (mut state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 400) // ratio 4.0 against slot capacity 100
            .with_price(ORE, 10.0)
            .build_with_catalog();

        run_price_variation_tick(&mut state, &catalog, &EconomyConfig::default());

        assert!(state.precise_resource_price(&catalog, ORE) < 10.0);
    }

    #[test]
    fn test_balanced_stock_leaves_price_alone() {
        // Ratio exactly 0.5 exerts no pressure in either direction.
        let (mut state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 50)
            .with_price(ORE, 10.0)
            .build_with_catalog();

        run_price_variation_tick(&mut state, &catalog, &EconomyConfig::default());

        assert_eq!(state.precise_resource_price(&catalog, ORE), 10.0);
    }

    #[test]
    fn test_inactive_factory_exerts_no_pressure() {
        let mut factory = consumer_factory(ORE, 5);
        factory.active = false;

        let (mut state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("refinery", "SIG")
            .with_factory(factory)
            .with_price(ORE, 10.0)
            .build_with_catalog();

        run_price_variation_tick(&mut state, &catalog, &EconomyConfig::default());

        assert_eq!(state.precise_resource_price(&catalog, ORE), 10.0);
    }

    #[test]
    fn test_excess_margin_flat_correction() {
        let mut factory = producer_factory(ORE);
        factory.margin_ratio = 0.9;

        // Stock at exactly half: only the margin correction applies.
        let (mut state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("mine", "SIG")
            .with_factory(factory)
            .with_stock(ORE, 50)
            .with_price(ORE, 100.0)
            .build_with_catalog();

        run_price_variation_tick(&mut state, &catalog, &EconomyConfig::default());

        let expected = 100.0 * (1.0 - 0.01 / 100.0);
        let got = state.precise_resource_price(&catalog, ORE);
        assert!((got - expected).abs() < 1e-3, "got {got}");
    }

    #[test]
    fn test_consumer_pressure_is_steeper_upward() {
        let build = |stock: u32| {
            let (mut state, catalog) = SectorStateBuilder::new()
                .with_company("SIG", 1000)
                .with_station("habitat", "SIG")
                .with_capability(Capability::Consumer)
                .with_stock(FOOD, stock)
                .with_price(FOOD, 10.0)
                .build_with_catalog();
            run_price_variation_tick(&mut state, &catalog, &EconomyConfig::default());
            state.precise_resource_price(&catalog, FOOD)
        };

        let starved = build(0); // ratio 0.0, +0.5 * 0.4
        let glutted = build(100); // ratio 1.0, -0.5 * 0.02
        assert!((starved - 10.0) > (10.0 - glutted) * 5.0);
    }

    #[test]
    fn test_variation_is_order_independent() {
        let build = |reverse: bool| {
            let mut builder = SectorStateBuilder::new().with_company("SIG", 1000);
            let stations: Vec<(&str, u32)> = if reverse {
                vec![("b", 400), ("a", 10)]
            } else {
                vec![("a", 10), ("b", 400)]
            };
            for (name, stock) in stations {
                builder = builder
                    .with_station(name, "SIG")
                    .with_factory(producer_factory(ORE))
                    .with_stock(ORE, stock);
            }
            let (mut state, catalog) = builder.with_price(ORE, 10.0).build_with_catalog();
            run_price_variation_tick(&mut state, &catalog, &EconomyConfig::default());
            state.precise_resource_price(&catalog, ORE)
        };

        assert_eq!(build(false), build(true));
    }

    proptest! {
        #[test]
        fn prop_price_never_below_floor(
            stock in 0u32..400,
            price in 1.0f32..50.0,
            ticks in 1usize..50
        ) {
            let (mut state, catalog) = SectorStateBuilder::new()
                .with_company("SIG", 1000)
                .with_station("mine", "SIG")
                .with_factory(producer_factory(ORE))
                .with_stock(ORE, stock)
                .with_price(ORE, price)
                .build_with_catalog();

            for _ in 0..ticks {
                run_price_variation_tick(&mut state, &catalog, &EconomyConfig::default());
                prop_assert!(
                    state.precise_resource_price(&catalog, ORE)
                        >= defines::prices::MIN_PRICE
                );
            }
        }
    }
}
