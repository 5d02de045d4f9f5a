//! Amount Conversion - Exact Decimal ↔ Base-Unit Arithmetic
//!
//! Converts user-entered decimal strings into integer base units
//! (18-decimal fixed point for both ETH and the exchange token) and
//! back into display strings. Every step is integer arithmetic on
//! 256-bit words; nothing passes through `f64`, so amounts well
//! beyond 2^53 base units keep every digit.

use alloy::primitives::U256;
use serde::{Serialize, Serializer};

use super::error::AmountError;

/// Decimals of the base-chain currency (wei per ETH).
pub const ETH_DECIMALS: u8 = 18;

/// Decimals used when formatting amounts for display.
pub const DEFAULT_DISPLAY_PRECISION: u8 = 6;

/// Largest decimals value whose scale factor still fits in a U256.
pub const MAX_DECIMALS: u8 = 77;

/// Non-negative integer amount denominated in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a raw base-unit value.
    pub const fn new(raw: U256) -> Self {
        Self(raw)
    }

    /// Raw base-unit value.
    pub const fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of whole units, discarding the fractional remainder.
    pub fn whole_units(&self, decimals: u8) -> U256 {
        self.0 / scale(decimals)
    }
}

impl From<U256> for Amount {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl From<u64> for Amount {
    fn from(raw: u64) -> Self {
        Self(U256::from(raw))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Serialized as a decimal string: JSON numbers lose precision past 2^53.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// `10^decimals` as a U256. Callers keep `decimals <= MAX_DECIMALS`.
fn scale(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Convert a human-entered decimal string into base units.
///
/// Accepts plain decimal notation (`"1"`, `"0.01"`, `".5"`, `"+2"`),
/// surrounding whitespace is ignored. Rejects empty, non-numeric,
/// negative and zero inputs, inputs with more significant fractional
/// digits than `decimals`, and values that overflow 256 bits.
///
/// # Examples
/// `to_base_units("0.01", 18)` → `10000000000000000`
pub fn to_base_units(input: &str, decimals: u8) -> Result<Amount, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::NotNumeric);
    }

    // Trailing zeros carry no value, "1.500" is as exact as "1.5".
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals { max: decimals });
    }

    let whole_value = parse_digits(whole)?;
    let fraction_value = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{fraction:0<width$}", width = decimals as usize);
        parse_digits(&padded)?
    };

    let total = whole_value
        .checked_mul(scale(decimals))
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or(AmountError::Overflow)?;

    if total.is_zero() {
        return Err(AmountError::Zero);
    }

    Ok(Amount(total))
}

/// Format a base-unit amount as a decimal string for display.
///
/// The integer part is exact. The fractional part is truncated (never
/// rounded) to `precision` digits and trailing zeros are dropped, so
/// `1500000000000000000` at 18 decimals renders as `"1.5"`.
pub fn from_base_units(amount: Amount, decimals: u8, precision: u8) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let unit = scale(decimals);
    let whole = amount.0 / unit;
    let remainder = amount.0 % unit;

    if remainder.is_zero() || precision == 0 {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    let shown = &fraction[..usize::from(precision.min(decimals))];
    let shown = shown.trim_end_matches('0');

    if shown.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{shown}")
    }
}

fn parse_digits(digits: &str) -> Result<U256, AmountError> {
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).map_err(|_| AmountError::Overflow)
}
