//! Economy simulation configuration.

use sectordata::defines;
use serde::{Deserialize, Serialize};

/// Tunable coefficients for the economy systems.
///
/// Externalized so balance passes can adjust them without recompiling;
/// defaults come from `sectordata::defines`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Upward price pressure per starved factory input.
    pub factory_input_coeff: f32,
    /// Downward price pressure per glutted factory output.
    pub factory_output_coeff: f32,
    /// Flat downward correction when an output factory's margin exceeds
    /// `max_margin`.
    pub excess_margin_coeff: f32,
    /// Margin ratio threshold for the flat correction.
    pub max_margin: f32,
    /// Consumer-station price pressure, upward / downward.
    pub consumer_up_coeff: f32,
    pub consumer_down_coeff: f32,
    /// Maintenance-station price pressure, upward / downward.
    pub maintenance_up_coeff: f32,
    pub maintenance_down_coeff: f32,
    /// Reputation granted to both parties per cross-owner trade.
    pub reputation_gain: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        use defines::{prices, trade};
        Self {
            factory_input_coeff: prices::FACTORY_INPUT_COEFF,
            factory_output_coeff: prices::FACTORY_OUTPUT_COEFF,
            excess_margin_coeff: prices::EXCESS_MARGIN_COEFF,
            max_margin: prices::MAX_MARGIN,
            consumer_up_coeff: prices::CONSUMER_UP_COEFF,
            consumer_down_coeff: prices::CONSUMER_DOWN_COEFF,
            maintenance_up_coeff: prices::MAINTENANCE_UP_COEFF,
            maintenance_down_coeff: prices::MAINTENANCE_DOWN_COEFF,
            reputation_gain: trade::REPUTATION_GAIN,
        }
    }
}
