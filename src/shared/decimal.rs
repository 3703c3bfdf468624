//! Fixed-point decimal helpers.
//!
//! Commission rates and similar on-chain ratios are 18-decimal fixed-point
//! numbers. Direct mode carries them as integer "atomics" strings, legacy JSON
//! renders them with all 18 fractional digits. All math uses
//! `rust_decimal::Decimal`; nothing goes through floating point.

use rust_decimal::Decimal;

/// Number of fractional digits in an on-chain decimal.
pub const DEC_PRECISION: u32 = 18;

/// Errors from fixed-point conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    Negative(String),
    TooPrecise { value: String },
    Overflow(String),
    InvalidAtomics { input: String, reason: String },
}

impl std::fmt::Display for DecimalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecimalError::Negative(v) => write!(f, "Decimal must not be negative, got {}", v),
            DecimalError::TooPrecise { value } => write!(
                f,
                "Decimal {} has more than {} fractional digits",
                value, DEC_PRECISION
            ),
            DecimalError::Overflow(v) => write!(f, "Decimal {} does not fit at 18 digits", v),
            DecimalError::InvalidAtomics { input, reason } => {
                write!(f, "Invalid atomics '{}': {}", input, reason)
            }
        }
    }
}

impl std::error::Error for DecimalError {}

fn rescaled(value: Decimal) -> Result<Decimal, DecimalError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DecimalError::Negative(value.to_string()));
    }
    if value.normalize().scale() > DEC_PRECISION {
        return Err(DecimalError::TooPrecise {
            value: value.to_string(),
        });
    }

    let mut scaled = value;
    scaled.rescale(DEC_PRECISION);
    // rescale silently caps the scale when the mantissa would not fit
    if scaled.scale() != DEC_PRECISION {
        return Err(DecimalError::Overflow(value.to_string()));
    }
    Ok(scaled)
}

/// Encode a decimal as an integer atomics string (`0.1` → `"100000000000000000"`).
pub fn to_atomics(value: Decimal) -> Result<String, DecimalError> {
    Ok(rescaled(value)?.mantissa().to_string())
}

/// Decode an atomics string back into a normalized decimal.
pub fn from_atomics(atomics: &str) -> Result<Decimal, DecimalError> {
    let mantissa = atomics
        .parse::<i128>()
        .map_err(|e| DecimalError::InvalidAtomics {
            input: atomics.to_string(),
            reason: e.to_string(),
        })?;
    if mantissa < 0 {
        return Err(DecimalError::Negative(atomics.to_string()));
    }
    Decimal::try_from_i128_with_scale(mantissa, DEC_PRECISION)
        .map(|d| d.normalize())
        .map_err(|e| DecimalError::InvalidAtomics {
            input: atomics.to_string(),
            reason: e.to_string(),
        })
}

/// Render a decimal with exactly 18 fractional digits (`0.1` → `"0.100000000000000000"`).
pub fn format_dec(value: Decimal) -> Result<String, DecimalError> {
    Ok(rescaled(value)?.to_string())
}
