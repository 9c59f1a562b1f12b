use crate::config::EconomyConfig;
use crate::state::{SectorState, StateError};
use crate::systems::{run_price_variation_tick, run_transport_tick};
use sectordata::ResourceCatalog;
use tracing::instrument;

/// Advance the sector economy by one tick.
///
/// Pure with respect to the input: the state is cloned, validated, and
/// the systems run against the clone, so a failed tick leaves the caller
/// holding the untouched original.
#[instrument(skip_all, name = "step_sector")]
pub fn step_sector(
    state: &SectorState,
    catalog: &ResourceCatalog,
    config: &EconomyConfig,
) -> Result<SectorState, StateError> {
    state.validate(catalog)?;
    let mut new_state = state.clone();

    run_price_variation_tick(&mut new_state, catalog, config);
    run_transport_tick(&mut new_state, catalog, config);

    Ok(new_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Capability;
    use crate::testing::{
        consumer_factory, producer_factory, test_catalog, total_money, SectorStateBuilder,
    };
    use sectordata::ResourceId;

    const ORE: ResourceId = ResourceId(0);
    const FOOD: ResourceId = ResourceId(1);

    #[test]
    fn test_step_moves_goods_along_own_supply_chain() {
        // Scenario A: one company, producer feeding a refinery, enough
        // shipping for everything.
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 100_000)
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 80)
            .with_station("refinery", "SIG")
            .with_factory(consumer_factory(ORE, 40))
            .with_ship("hauler", "SIG", 200)
            .build_with_catalog();

        let next = step_sector(&state, &catalog, &EconomyConfig::default()).unwrap();

        assert_eq!(next.stations[1].cargo.quantity(ORE), 80);
        assert_eq!(next.stations[0].cargo.quantity(ORE), 0);
        assert_eq!(next.company("SIG").money, 100_000);
        // The original is untouched.
        assert_eq!(state.stations[1].cargo.quantity(ORE), 0);
    }

    #[test]
    fn test_step_cross_owner_trade_conserves_money() {
        // Scenario B: SIG hauls its food to NEM's habitat and gets paid.
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 100_000)
            .with_company("NEM", 100_000)
            .with_station("farm", "SIG")
            .with_factory(producer_factory(FOOD))
            .with_stock(FOOD, 60)
            .with_station("habitat", "NEM")
            .with_capability(Capability::Consumer)
            .with_ship("hauler", "SIG", 200)
            .build_with_catalog();

        let total_before = total_money(&state);
        let next = step_sector(&state, &catalog, &EconomyConfig::default()).unwrap();

        assert_eq!(next.stations[1].cargo.quantity(FOOD), 60);
        assert!(next.company("SIG").money > 100_000);
        assert!(next.company("NEM").money < 100_000);
        assert_eq!(total_money(&next), total_before);
        assert!(next.company("SIG").reputation_with("NEM") > 0.0);
    }

    #[test]
    fn test_step_hostility_freezes_trade() {
        // Scenario C: same economy as B, but the companies are at war.
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 100_000)
            .with_company("NEM", 100_000)
            .with_station("farm", "SIG")
            .with_factory(producer_factory(FOOD))
            .with_stock(FOOD, 60)
            .with_station("habitat", "NEM")
            .with_capability(Capability::Consumer)
            .with_ship("hauler", "SIG", 200)
            .with_hostility("SIG", "NEM")
            .build_with_catalog();

        let next = step_sector(&state, &catalog, &EconomyConfig::default()).unwrap();

        assert_eq!(next.stations[1].cargo.quantity(FOOD), 0);
        assert_eq!(next.stations[0].cargo.quantity(FOOD), 60);
        assert_eq!(next.company("SIG").money, 100_000);
        assert_eq!(next.company("NEM").money, 100_000);
    }

    #[test]
    fn test_step_rejects_invalid_state() {
        let mut state = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("mine", "SIG")
            .build();
        state.stations[0].company = "GHOST".to_string();

        let err = step_sector(&state, &test_catalog(), &EconomyConfig::default());
        assert!(matches!(err, Err(StateError::UnknownStationCompany { .. })));
    }

    #[test]
    fn test_determinism() {
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 100_000)
            .with_company("NEM", 50_000)
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 200)
            .with_station("refinery", "NEM")
            .with_factory(consumer_factory(ORE, 30))
            .with_station("habitat", "NEM")
            .with_capability(Capability::Consumer)
            .with_ship("hauler-1", "SIG", 100)
            .with_ship("hauler-2", "NEM", 50)
            .build_with_catalog();

        let config = EconomyConfig::default();
        let state_a = step_sector(&state, &catalog, &config).unwrap();
        let state_b = step_sector(&state, &catalog, &config).unwrap();

        assert_eq!(state_a.checksum(), state_b.checksum());

        // And across multiple ticks.
        let mut chain_a = state.clone();
        let mut chain_b = state.clone();
        for _ in 0..10 {
            chain_a = step_sector(&chain_a, &catalog, &config).unwrap();
            chain_b = step_sector(&chain_b, &catalog, &config).unwrap();
        }
        assert_eq!(chain_a.checksum(), chain_b.checksum());
    }

    #[test]
    fn test_step_without_ships_only_moves_prices() {
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 100_000)
            .with_station("mine", "SIG")
            .with_factory(producer_factory(ORE))
            .with_stock(ORE, 400)
            .build_with_catalog();

        let next = step_sector(&state, &catalog, &EconomyConfig::default()).unwrap();

        assert_eq!(next.stations[0].cargo.quantity(ORE), 400);
        assert!(
            next.precise_resource_price(&catalog, ORE)
                < state.precise_resource_price(&catalog, ORE)
        );
    }
}
