//! Sector simulation state.
//!
//! A sector is one localized economic zone: stations, ships, the
//! companies operating them, a shared price table, and the rotating
//! fairness cursor used by the transport allocator. Everything here is
//! plain serializable data; the per-tick systems in [`crate::systems`]
//! mutate it through a single pipeline.

use crate::cargo::CargoBay;
use rustc_hash::FxHashMap;
use sectordata::{defines, PriceContext, ResourceCatalog, ResourceId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Company identifier, e.g. `"SIG"` for Sigma Industries.
pub type Tag = String;

/// Role tags that drive special resource-need rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Sells customer resources to the population.
    Consumer,
    /// Consumes maintenance resources for ship upkeep.
    Maintenance,
    /// Accepts any surplus as a dump target.
    Storage,
}

/// One resource line of a factory cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorySlot {
    pub resource: ResourceId,
    /// Units consumed or produced per production cycle.
    pub quantity: u32,
}

/// A production unit inside a station.
///
/// Production itself is simulated elsewhere; the economy core only reads
/// the input/output lists and the activity flags to decide where stock
/// should move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factory {
    pub inputs: Vec<FactorySlot>,
    pub outputs: Vec<FactorySlot>,
    pub active: bool,
    /// False once the factory has queued enough cycles; it then stops
    /// pulling inputs beyond what it already holds.
    pub needs_production: bool,
    pub margin_ratio: f32,
}

impl Factory {
    pub fn has_input_resource(&self, resource: ResourceId) -> bool {
        self.inputs.iter().any(|s| s.resource == resource)
    }

    pub fn has_output_resource(&self, resource: ResourceId) -> bool {
        self.outputs.iter().any(|s| s.resource == resource)
    }
}

/// A stationary production/consumption site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub company: Tag,
    pub capabilities: Vec<Capability>,
    /// Order matters: factories are served in declared order.
    pub factories: Vec<Factory>,
    pub cargo: CargoBay,
}

impl Station {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// True when this station consumes `resource` for its population
    /// (Consumer capability on a customer resource).
    pub fn consumes_resource(&self, catalog: &ResourceCatalog, resource: ResourceId) -> bool {
        self.has_capability(Capability::Consumer) && catalog.is_customer_resource(resource)
    }
}

/// A mobile spacecraft contributing transport capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub name: String,
    pub company: Tag,
    pub cargo: CargoBay,
    /// Only ships assigned to the sector carry cargo for the allocator.
    pub assigned: bool,
}

/// Per-company ledger state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyState {
    /// Money balance in credits. Integer ledger; this core never drives
    /// it negative because every transfer is capped by affordability.
    pub money: i64,
    /// Pairwise reputation, capped at `defines::trade::REPUTATION_CAP`.
    pub reputation: HashMap<Tag, f32>,
}

impl CompanyState {
    /// Withdraw `amount` credits. Returns false (leaving the balance
    /// untouched) when funds are insufficient.
    pub fn take_money(&mut self, amount: i64) -> bool {
        if self.money < amount {
            return false;
        }
        self.money -= amount;
        true
    }

    pub fn give_money(&mut self, amount: i64) {
        self.money += amount;
    }

    /// Increase reputation toward `other`, capped.
    pub fn give_reputation(&mut self, other: &str, amount: f32) {
        let entry = self.reputation.entry(other.to_string()).or_insert(0.0);
        *entry = (*entry + amount).min(defines::trade::REPUTATION_CAP);
    }

    pub fn reputation_with(&self, other: &str) -> f32 {
        self.reputation.get(other).copied().unwrap_or(0.0)
    }
}

/// Pairwise war state. Hostility fully blocks trade in both directions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiplomacyState {
    /// Hostile pairs, stored with the smaller tag first.
    hostilities: HashSet<(Tag, Tag)>,
}

impl DiplomacyState {
    fn key(a: &str, b: &str) -> (Tag, Tag) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn set_hostile(&mut self, a: &str, b: &str) {
        self.hostilities.insert(Self::key(a, b));
    }

    pub fn clear_hostile(&mut self, a: &str, b: &str) {
        self.hostilities.remove(&Self::key(a, b));
    }

    pub fn is_hostile(&self, a: &str, b: &str) -> bool {
        a != b && self.hostilities.contains(&Self::key(a, b))
    }
}

/// Population data consumed from the people simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeopleState {
    /// Units of each customer resource the population consumes per tick.
    pub consumption: FxHashMap<ResourceId, u32>,
}

impl PeopleState {
    pub fn resource_consumption(&self, resource: ResourceId) -> u32 {
        self.consumption.get(&resource).copied().unwrap_or(0)
    }
}

/// Referential-integrity violation in sector state.
///
/// These are precondition failures from corrupted or stale saves; the
/// core refuses to run a tick over them rather than corrupt the ledger.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("station '{station}' references unknown company '{company}'")]
    UnknownStationCompany { station: String, company: Tag },

    #[error("ship '{ship}' references unknown company '{company}'")]
    UnknownShipCompany { ship: String, company: Tag },

    #[error("station '{station}' references unknown resource {resource:?}")]
    UnknownFactoryResource {
        station: String,
        resource: ResourceId,
    },

    #[error("people consumption references unknown resource {resource:?}")]
    UnknownPeopleResource { resource: ResourceId },

    #[error("price table references unknown resource {resource:?}")]
    UnknownPricedResource { resource: ResourceId },
}

/// Complete state of one sector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectorState {
    /// Stations in fairness order. The allocator's rotating cursor walks
    /// this list, so order is part of persisted state.
    pub stations: Vec<Station>,
    pub ships: Vec<Ship>,
    pub companies: HashMap<Tag, CompanyState>,
    pub diplomacy: DiplomacyState,
    pub people: PeopleState,
    /// Current precise price per resource. Entries appear the first time
    /// a price is written and persist indefinitely.
    pub resource_prices: FxHashMap<ResourceId, f32>,
    /// Rotating fairness cursor into `stations`. Wraps modulo the station
    /// count and persists across ticks.
    pub station_cursor: usize,
}

impl SectorState {
    /// Precise market price for `resource`, falling back to the catalog
    /// default until the price simulator writes an entry.
    pub fn precise_resource_price(&self, catalog: &ResourceCatalog, resource: ResourceId) -> f32 {
        self.resource_prices
            .get(&resource)
            .copied()
            .unwrap_or_else(|| catalog.default_price(resource))
    }

    pub fn set_precise_resource_price(&mut self, resource: ResourceId, price: f32) {
        self.resource_prices
            .insert(resource, price.max(defines::prices::MIN_PRICE));
    }

    /// Integer unit price for a transaction in the given context.
    /// Floored at 1 so affordability divisions are always safe.
    pub fn resource_price(
        &self,
        catalog: &ResourceCatalog,
        resource: ResourceId,
        context: PriceContext,
    ) -> i64 {
        let precise = self.precise_resource_price(catalog, resource) * context.factor();
        (precise.round() as i64).max(1)
    }

    /// Company tags in stable (sorted) order, for deterministic iteration.
    pub fn company_tags(&self) -> Vec<Tag> {
        let mut tags: Vec<_> = self.companies.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Look up a company that validation has already proven to exist.
    ///
    /// Panics on a miss: reaching this with an unknown tag means state
    /// was mutated behind the simulation's back.
    pub fn company(&self, tag: &str) -> &CompanyState {
        self.companies
            .get(tag)
            .unwrap_or_else(|| panic!("unknown company '{tag}' in sector state"))
    }

    pub fn company_mut(&mut self, tag: &str) -> &mut CompanyState {
        self.companies
            .get_mut(tag)
            .unwrap_or_else(|| panic!("unknown company '{tag}' in sector state"))
    }

    /// Check referential integrity against the catalog.
    ///
    /// Loading collaborators are expected to log and skip dangling
    /// references before the core ever sees the state; anything that
    /// slips through fails the tick here instead of silently no-oping.
    pub fn validate(&self, catalog: &ResourceCatalog) -> Result<(), StateError> {
        for station in &self.stations {
            if !self.companies.contains_key(&station.company) {
                return Err(StateError::UnknownStationCompany {
                    station: station.name.clone(),
                    company: station.company.clone(),
                });
            }
            for factory in &station.factories {
                for slot in factory.inputs.iter().chain(factory.outputs.iter()) {
                    if !catalog.contains(slot.resource) {
                        return Err(StateError::UnknownFactoryResource {
                            station: station.name.clone(),
                            resource: slot.resource,
                        });
                    }
                }
            }
        }
        for ship in &self.ships {
            if !self.companies.contains_key(&ship.company) {
                return Err(StateError::UnknownShipCompany {
                    ship: ship.name.clone(),
                    company: ship.company.clone(),
                });
            }
        }
        for &resource in self.people.consumption.keys() {
            if !catalog.contains(resource) {
                return Err(StateError::UnknownPeopleResource { resource });
            }
        }
        for &resource in self.resource_prices.keys() {
            if !catalog.contains(resource) {
                return Err(StateError::UnknownPricedResource { resource });
            }
        }
        Ok(())
    }

    /// Compute a deterministic checksum of the sector state.
    ///
    /// Used for desync detection and persistence validation: identical
    /// states produce identical checksums regardless of map iteration
    /// order.
    pub fn checksum(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.station_cursor.hash(&mut hasher);

        // Companies (sorted by tag)
        for tag in self.company_tags() {
            let company = &self.companies[&tag];
            tag.hash(&mut hasher);
            company.money.hash(&mut hasher);
            let mut rep_tags: Vec<_> = company.reputation.keys().collect();
            rep_tags.sort();
            for other in rep_tags {
                other.hash(&mut hasher);
                company.reputation[other].to_bits().hash(&mut hasher);
            }
        }

        // Stations and ships (list order is part of state)
        for station in &self.stations {
            station.name.hash(&mut hasher);
            station.company.hash(&mut hasher);
            hash_cargo(&station.cargo, &mut hasher);
        }
        for ship in &self.ships {
            ship.name.hash(&mut hasher);
            ship.company.hash(&mut hasher);
            ship.assigned.hash(&mut hasher);
            hash_cargo(&ship.cargo, &mut hasher);
        }

        // Prices (sorted by resource id)
        let mut priced: Vec<_> = self.resource_prices.iter().collect();
        priced.sort_by_key(|(id, _)| **id);
        for (id, price) in priced {
            id.hash(&mut hasher);
            price.to_bits().hash(&mut hasher);
        }

        hasher.finish()
    }
}

fn hash_cargo(cargo: &CargoBay, hasher: &mut impl std::hash::Hasher) {
    use std::hash::Hash;

    cargo.slot_capacity().hash(hasher);
    cargo.slot_count().hash(hasher);
    for slot in cargo.slots() {
        slot.resource.hash(hasher);
        slot.quantity.hash(hasher);
    }
}
