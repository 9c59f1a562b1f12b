//! Test helpers for building sector states.

use crate::cargo::CargoBay;
use crate::state::{
    Capability, CompanyState, Factory, FactorySlot, SectorState, Ship, Station,
};
use sectordata::{ResourceCatalog, ResourceDef, ResourceId};

/// Standard three-resource catalog used across tests:
/// `0` = ore (plain), `1` = food (customer), `2` = parts (maintenance).
pub fn test_catalog() -> ResourceCatalog {
    let def = |identifier: &str, is_customer: bool, is_maintenance: bool| ResourceDef {
        identifier: identifier.to_string(),
        is_customer,
        is_maintenance,
        default_price: 10.0,
    };
    ResourceCatalog::new(vec![
        def("ore", false, false),
        def("food", true, false),
        def("parts", false, true),
    ])
    .expect("test catalog is valid")
}

/// Factory that outputs `resource`; never needs inputs.
pub fn producer_factory(resource: ResourceId) -> Factory {
    Factory {
        inputs: vec![],
        outputs: vec![FactorySlot {
            resource,
            quantity: 10,
        }],
        active: true,
        needs_production: true,
        margin_ratio: 0.0,
    }
}

/// Factory that consumes `per_cycle` units of `resource` per cycle.
pub fn consumer_factory(resource: ResourceId, per_cycle: u32) -> Factory {
    Factory {
        inputs: vec![FactorySlot {
            resource,
            quantity: per_cycle,
        }],
        outputs: vec![],
        active: true,
        needs_production: true,
        margin_ratio: 0.0,
    }
}

pub struct SectorStateBuilder {
    state: SectorState,
}

impl SectorStateBuilder {
    pub fn new() -> Self {
        Self {
            state: SectorState::default(),
        }
    }

    pub fn with_company(mut self, tag: &str, money: i64) -> Self {
        self.state.companies.insert(
            tag.to_string(),
            CompanyState {
                money,
                ..Default::default()
            },
        );
        self
    }

    /// Station with default geometry (4 slots of 100) and no factories.
    pub fn with_station(self, name: &str, company: &str) -> Self {
        self.with_station_state(Station {
            name: name.to_string(),
            company: company.to_string(),
            capabilities: vec![],
            factories: vec![],
            cargo: CargoBay::new(4, 100),
        })
    }

    pub fn with_station_state(mut self, station: Station) -> Self {
        self.state.stations.push(station);
        self
    }

    /// Attach a capability to the most recently added station.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.last_station().capabilities.push(capability);
        self
    }

    /// Attach a factory to the most recently added station.
    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.last_station().factories.push(factory);
        self
    }

    /// Stock the most recently added station's cargo.
    pub fn with_stock(mut self, resource: ResourceId, quantity: u32) -> Self {
        let given = self.last_station().cargo.give(resource, quantity);
        assert_eq!(given, quantity, "test stock exceeds cargo capacity");
        self
    }

    /// Assigned ship with a single cargo slot of `capacity`.
    pub fn with_ship(mut self, name: &str, company: &str, capacity: u32) -> Self {
        self.state.ships.push(Ship {
            name: name.to_string(),
            company: company.to_string(),
            cargo: CargoBay::new(1, capacity),
            assigned: true,
        });
        self
    }

    pub fn with_unassigned_ship(mut self, name: &str, company: &str, capacity: u32) -> Self {
        self.state.ships.push(Ship {
            name: name.to_string(),
            company: company.to_string(),
            cargo: CargoBay::new(1, capacity),
            assigned: false,
        });
        self
    }

    pub fn with_hostility(mut self, a: &str, b: &str) -> Self {
        self.state.diplomacy.set_hostile(a, b);
        self
    }

    pub fn with_people_consumption(mut self, resource: ResourceId, quantity: u32) -> Self {
        self.state.people.consumption.insert(resource, quantity);
        self
    }

    pub fn with_price(mut self, resource: ResourceId, price: f32) -> Self {
        self.state.set_precise_resource_price(resource, price);
        self
    }

    pub fn build(self) -> SectorState {
        self.state
    }

    pub fn build_with_catalog(self) -> (SectorState, ResourceCatalog) {
        (self.state, test_catalog())
    }

    fn last_station(&mut self) -> &mut Station {
        self.state
            .stations
            .last_mut()
            .expect("add a station before configuring it")
    }
}

impl Default for SectorStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Total money across all companies, for conservation assertions.
pub fn total_money(state: &SectorState) -> i64 {
    state.companies.values().map(|c| c.money).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let state = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("hub", "SIG")
            .with_capability(Capability::Consumer)
            .with_factory(producer_factory(ResourceId(0)))
            .with_stock(ResourceId(0), 50)
            .with_ship("hauler", "SIG", 200)
            .build();

        assert_eq!(state.stations.len(), 1);
        assert!(state.stations[0].has_capability(Capability::Consumer));
        assert_eq!(state.stations[0].cargo.quantity(ResourceId(0)), 50);
        assert_eq!(state.ships.len(), 1);
        assert_eq!(state.company("SIG").money, 1000);
    }

    #[test]
    fn test_built_state_validates() {
        let (state, catalog) = SectorStateBuilder::new()
            .with_company("SIG", 1000)
            .with_station("hub", "SIG")
            .with_factory(consumer_factory(ResourceId(0), 5))
            .build_with_catalog();
        assert!(state.validate(&catalog).is_ok());
    }

    #[test]
    fn test_catalog_resource_classes() {
        let catalog = test_catalog();
        assert!(catalog.is_customer_resource(ResourceId(1)));
        assert!(catalog.is_maintenance_resource(ResourceId(2)));
    }
}
