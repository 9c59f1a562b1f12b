//! Resource catalog.
//!
//! The catalog is the full enumeration of tradeable resources together
//! with their classification flags. It is built once at load time and
//! shared immutably with the simulation; per-sector prices live in
//! sector state, only the defaults live here.

use crate::defines;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a resource.
///
/// Index into the catalog's resource array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u16);

/// Pricing context for a resource transaction.
///
/// The same resource trades at slightly different unit prices depending
/// on which side of a factory the unit sits: surplus output sells below
/// the sheet price, needed input buys above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceContext {
    Default,
    FactoryInput,
    FactoryOutput,
}

impl PriceContext {
    /// Multiplier applied to the precise price for this context.
    pub fn factor(self) -> f32 {
        match self {
            PriceContext::Default => 1.0,
            PriceContext::FactoryInput => defines::prices::FACTORY_INPUT_FACTOR,
            PriceContext::FactoryOutput => defines::prices::FACTORY_OUTPUT_FACTOR,
        }
    }
}

/// Static definition of a single resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDef {
    /// Stable identifier, e.g. `"fuel"` or `"food"`.
    pub identifier: String,

    /// Sold to Consumer-capability stations for the population.
    pub is_customer: bool,

    /// Consumed by Maintenance-capability stations for ship upkeep.
    pub is_maintenance: bool,

    /// Price a fresh sector starts trading at (credits per unit).
    pub default_price: f32,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate resource identifier '{0}'")]
    DuplicateIdentifier(String),

    #[error("resource '{identifier}' has non-positive default price {price}")]
    InvalidDefaultPrice { identifier: String, price: f32 },
}

/// Immutable enumeration of all resources in the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCatalog {
    resources: Vec<ResourceDef>,
}

impl ResourceCatalog {
    /// Build a catalog, rejecting duplicate identifiers and prices below
    /// the floor.
    pub fn new(resources: Vec<ResourceDef>) -> Result<Self, CatalogError> {
        for (i, def) in resources.iter().enumerate() {
            if def.default_price < defines::prices::MIN_PRICE {
                return Err(CatalogError::InvalidDefaultPrice {
                    identifier: def.identifier.clone(),
                    price: def.default_price,
                });
            }
            if resources[..i].iter().any(|r| r.identifier == def.identifier) {
                return Err(CatalogError::DuplicateIdentifier(def.identifier.clone()));
            }
        }
        Ok(Self { resources })
    }

    pub fn get(&self, id: ResourceId) -> Option<&ResourceDef> {
        self.resources.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        (id.0 as usize) < self.resources.len()
    }

    /// All resource ids, in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        (0..self.resources.len()).map(|i| ResourceId(i as u16))
    }

    /// Resources sold to the population through Consumer stations.
    pub fn customer_resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.ids()
            .filter(move |&id| self.resources[id.0 as usize].is_customer)
    }

    /// Resources consumed by Maintenance stations.
    pub fn maintenance_resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.ids()
            .filter(move |&id| self.resources[id.0 as usize].is_maintenance)
    }

    pub fn is_customer_resource(&self, id: ResourceId) -> bool {
        self.get(id).is_some_and(|r| r.is_customer)
    }

    pub fn is_maintenance_resource(&self, id: ResourceId) -> bool {
        self.get(id).is_some_and(|r| r.is_maintenance)
    }

    pub fn default_price(&self, id: ResourceId) -> f32 {
        self.get(id)
            .map(|r| r.default_price)
            .unwrap_or(defines::prices::MIN_PRICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(identifier: &str, customer: bool, maintenance: bool) -> ResourceDef {
        ResourceDef {
            identifier: identifier.to_string(),
            is_customer: customer,
            is_maintenance: maintenance,
            default_price: 10.0,
        }
    }

    #[test]
    fn test_subsets() {
        let catalog = ResourceCatalog::new(vec![
            def("ore", false, false),
            def("food", true, false),
            def("parts", false, true),
        ])
        .unwrap();

        let customers: Vec<_> = catalog.customer_resources().collect();
        let maintenance: Vec<_> = catalog.maintenance_resources().collect();
        assert_eq!(customers, vec![ResourceId(1)]);
        assert_eq!(maintenance, vec![ResourceId(2)]);
        assert!(catalog.is_customer_resource(ResourceId(1)));
        assert!(!catalog.is_customer_resource(ResourceId(0)));
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let result = ResourceCatalog::new(vec![def("ore", false, false), def("ore", true, false)]);
        assert!(matches!(result, Err(CatalogError::DuplicateIdentifier(_))));
    }

    #[test]
    fn test_invalid_price_rejected() {
        let mut bad = def("ore", false, false);
        bad.default_price = 0.0;
        let result = ResourceCatalog::new(vec![bad]);
        assert!(matches!(
            result,
            Err(CatalogError::InvalidDefaultPrice { .. })
        ));
    }

    #[test]
    fn test_price_context_factors() {
        assert_eq!(PriceContext::Default.factor(), 1.0);
        assert!(PriceContext::FactoryInput.factor() > 1.0);
        assert!(PriceContext::FactoryOutput.factor() < 1.0);
    }
}
