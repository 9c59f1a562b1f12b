//! # Sector Economy Simulation Core
//!
//! Deterministic per-tick economy engine for a persistent multi-company
//! space sector.
//!
//! This crate implements the sector game loop: state → systems → state
//! transitions. It is designed for lockstep persistence and replay
//! determinism.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │ SectorState  │────▶│   step_sector    │────▶│ SectorState  │
//! │ (persisted)  │     │   (pure fn)      │     │ (next tick)  │
//! └──────────────┘     └────────┬─────────┘     └──────────────┘
//!                               │
//!                  ┌────────────┴────────────┐
//!                  │ 1. price variation      │
//!                  │ 2. per-company transport│
//!                  │ 3. trade reconciliation │
//!                  └─────────────────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SectorState`] | Complete sector state (stations, ships, companies) |
//! | [`step_sector`] | Pure function: `(state, catalog, config) -> state` |
//! | [`EconomyConfig`] | Tunable coefficients for all systems |
//! | [`CargoBay`] | Slot-based cargo storage shared by ships and stations |
//! | [`TransportLimit`] | Fill targets for the allocation passes |
//!
//! Static resource definitions live in the companion `sectordata` crate.

pub mod cargo;
pub mod config;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;

pub use cargo::{CargoBay, CargoSlot};
pub use config::EconomyConfig;
pub use state::{
    Capability, CompanyState, DiplomacyState, Factory, FactorySlot, PeopleState, SectorState,
    Ship, StateError, Station, Tag,
};
pub use step::step_sector;
pub use systems::{
    give_resources, resource_count, run_price_variation_tick, run_transport_tick,
    simulate_trade, simulate_transport_for, take_resources, take_useless_resources,
    transport_capacity, transport_capacity_balance, transport_capacity_needs, TransportLimit,
};
