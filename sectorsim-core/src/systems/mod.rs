//! Per-tick economy systems.

pub mod capacity;
pub mod logistics;
pub mod prices;
pub mod trade;
pub mod transport;

pub use capacity::{
    resource_count, transport_capacity, transport_capacity_balance, transport_capacity_needs,
};
pub use logistics::{give_resources, take_resources, take_useless_resources};
pub use prices::run_price_variation_tick;
pub use trade::simulate_trade;
pub use transport::{run_transport_tick, simulate_transport_for, TransportLimit};
