//! Game mechanic constants (defines).
//!
//! Hardcoded tuning values for the sector economy. Grouped by system so
//! call sites read as `defines::prices::MIN_PRICE`.

/// Price simulation constants
pub mod prices {
    /// Absolute floor for any resource price (credits per unit).
    /// Affordability divisions rely on prices never reaching zero.
    pub const MIN_PRICE: f32 = 1.0;

    /// Per-tick upward pressure from a starved factory input.
    pub const FACTORY_INPUT_COEFF: f32 = 0.05;

    /// Per-tick downward pressure from a glutted factory output.
    pub const FACTORY_OUTPUT_COEFF: f32 = 0.05;

    /// Flat correction when a factory margin exceeds `MAX_MARGIN`.
    pub const EXCESS_MARGIN_COEFF: f32 = 0.01;

    /// Margin ratio above which the flat correction kicks in.
    pub const MAX_MARGIN: f32 = 0.5;

    /// Upward pressure for starved consumer stations.
    pub const CONSUMER_UP_COEFF: f32 = 0.4;

    /// Downward pressure for glutted consumer stations.
    pub const CONSUMER_DOWN_COEFF: f32 = 0.02;

    /// Upward pressure for starved maintenance stations.
    pub const MAINTENANCE_UP_COEFF: f32 = 0.2;

    /// Downward pressure for glutted maintenance stations.
    pub const MAINTENANCE_DOWN_COEFF: f32 = 0.02;

    /// Unit price factor when buying as factory input.
    pub const FACTORY_INPUT_FACTOR: f32 = 1.1;

    /// Unit price factor when selling factory output surplus.
    pub const FACTORY_OUTPUT_FACTOR: f32 = 0.9;
}

/// Trade and diplomacy constants
pub mod trade {
    /// Reputation granted to each party per successful trade.
    pub const REPUTATION_GAIN: f32 = 0.5;

    /// Pairwise reputation cap.
    pub const REPUTATION_CAP: f32 = 100.0;
}
