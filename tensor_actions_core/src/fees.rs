use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Fee charged for sources not present in the schedule.
pub const DEFAULT_FEE_BPS: u64 = 150;

/// Taker fee per marketplace source, in basis points.
static SOURCE_TO_FEE_BPS: Lazy<HashMap<&'static str, u64>> = Lazy::new(|| {
    HashMap::from([
        ("TENSORSWAP", 150),
        ("TCOMP", 150),
        ("MAGICEDEN_V2", 250),
    ])
});

/// Fee schedule lookup. Never fails; unknown sources fall back to
/// [`DEFAULT_FEE_BPS`].
pub fn marketplace_fee_bps(source: &str) -> u64 {
    SOURCE_TO_FEE_BPS
        .get(source)
        .copied()
        .unwrap_or(DEFAULT_FEE_BPS)
}

/// Total cost of a purchase: listing price plus creator royalty plus the
/// marketplace taker fee, both expressed in basis points of the price.
///
/// Float division is intentional; fractional lamports are forwarded to the
/// marketplace transaction builder unrounded.
pub fn total_price(price: u64, royalty_bps: u64, source: &str) -> f64 {
    let fee_bps = marketplace_fee_bps(source);
    let royalty = price as f64 * royalty_bps as f64 / 10_000.0;
    let marketplace_fee = price as f64 * fee_bps as f64 / 10_000.0;
    price as f64 + royalty + marketplace_fee
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tensorswap_total() {
        // 1_000_000 + 5% royalty + 1.5% marketplace fee
        assert_eq!(total_price(1_000_000, 500, "TENSORSWAP"), 1_065_000.0);
    }

    #[test]
    fn magiceden_charges_250_bps() {
        assert_eq!(total_price(1_000_000, 0, "MAGICEDEN_V2"), 1_025_000.0);
    }

    #[test]
    fn unknown_source_falls_back_to_default() {
        for price in [0u64, 1, 999, 1_000_000, u32::MAX as u64] {
            for royalty in [0u64, 100, 500, 10_000] {
                assert_eq!(
                    total_price(price, royalty, "UNKNOWN_SOURCE"),
                    total_price(price, royalty, "TENSORSWAP"),
                );
            }
        }
    }

    #[test]
    fn zero_price_is_zero() {
        assert_eq!(total_price(0, 10_000, "TCOMP"), 0.0);
    }

    #[test]
    fn fractional_results_are_not_rounded() {
        // 1 lamport with 150 bps fee: 1 + 0.015
        assert_eq!(total_price(1, 0, "TCOMP"), 1.015);
    }
}
