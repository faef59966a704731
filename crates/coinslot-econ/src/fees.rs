//! Operator fee calculation.
//!
//! The fee rate is a rational over micro units so the computation stays in
//! integer arithmetic end to end. Downstream code treats `net_amount` as
//! the literal on-chain transfer amount, so every caller must obtain it
//! from [`calculate_fee`] rather than re-deriving it.

use coinslot_types::{Amount, FeeBreakdown};

/// Fee rate numerator. The rate is `NUMERATOR / DENOMINATOR` = 0.001%.
pub const FEE_RATE_NUMERATOR: u64 = 1;

/// Fee rate denominator.
pub const FEE_RATE_DENOMINATOR: u64 = 100_000;

/// Rate label shown to users and recorded on settled sessions.
pub const FEE_PERCENTAGE_LABEL: &str = "0.001%";

/// Split a gross settlement amount into fee and net.
///
/// `fee = gross * rate` rounded half away from zero at micro precision
/// (amounts are non-negative, so this is round-half-up); `net = gross -
/// fee`. Pure, never fails, and `gross == fee + net` holds exactly.
pub fn calculate_fee(gross: Amount) -> FeeBreakdown {
    let micros = gross.micros() as u128;
    let num = FEE_RATE_NUMERATOR as u128;
    let den = FEE_RATE_DENOMINATOR as u128;

    let fee = ((micros * num + den / 2) / den) as u64;
    let fee = Amount::from_micros(fee);
    // fee <= gross for any rate <= 100%, so this cannot underflow
    let net = Amount::from_micros(gross.micros() - fee.micros());

    FeeBreakdown {
        gross_amount: gross,
        fee,
        net_amount: net,
        fee_percentage: FEE_PERCENTAGE_LABEL.to_string(),
    }
}
