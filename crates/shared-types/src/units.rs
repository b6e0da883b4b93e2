//! Wei / display-unit conversion.
//!
//! The ledger stores every monetary value as an integer with 18 decimals.
//! These helpers exist for the API boundary only; core subsystems never
//! leave integer wei.

use primitive_types::U256;

/// Wei per display unit (10^18).
pub const WEI_PER_UNIT: u128 = 1_000_000_000_000_000_000;

/// Convert wei to a human-scale number for API responses.
///
/// Lossy above 2^53 display units, which is fine for dashboard rendering.
pub fn to_display(wei: U256) -> f64 {
    let whole = (wei / U256::from(WEI_PER_UNIT)).as_u128() as f64;
    let frac = (wei % U256::from(WEI_PER_UNIT)).as_u128() as f64 / WEI_PER_UNIT as f64;
    whole + frac
}

/// Convert a human-scale amount from an API request into wei.
///
/// Negative and non-finite inputs map to zero wei; request validation
/// rejects those before conversion.
pub fn from_display(amount: f64) -> U256 {
    if !amount.is_finite() || amount <= 0.0 {
        return U256::zero();
    }
    let whole = amount.trunc() as u128;
    let frac = (amount.fract() * WEI_PER_UNIT as f64).round() as u128;
    U256::from(whole) * U256::from(WEI_PER_UNIT) + U256::from(frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_units_round_trip() {
        let wei = from_display(15000.0);
        assert_eq!(wei, U256::from(15000u64) * U256::from(WEI_PER_UNIT));
        assert_eq!(to_display(wei), 15000.0);
    }

    #[test]
    fn test_fractional_units() {
        let wei = from_display(2.5);
        assert_eq!(wei, U256::from(25u64) * U256::from(WEI_PER_UNIT / 10));
        assert!((to_display(wei) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs_map_to_zero() {
        assert_eq!(from_display(-1.0), U256::zero());
        assert_eq!(from_display(f64::NAN), U256::zero());
        assert_eq!(from_display(f64::INFINITY), U256::zero());
    }
}
