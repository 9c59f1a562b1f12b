//! Static data for the sector economy simulation.
//!
//! Shared catalogs (resources) and game-mechanic constants (defines).
//! Everything here is immutable configuration: it is built once at load
//! time and injected into the simulation core by reference.

pub mod defines;
pub mod resources;

pub use resources::{CatalogError, PriceContext, ResourceCatalog, ResourceDef, ResourceId};
