//! Asset and symbol value types.
//!
//! An EOS asset is a 64-bit integer amount paired with a symbol that fixes
//! the token code and its decimal precision. `"1.2300 EOS"` is amount
//! `12300` with symbol `EOS` at precision 4. Quantities are always written
//! with exactly `precision` decimal places; a quantity with the wrong number
//! of decimals is rejected before it gets anywhere near the wire.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAssetError;

/// Maximum symbol precision accepted by the chain.
const MAX_PRECISION: u8 = 18;

/// A token symbol: a 1-7 character uppercase code plus a decimal precision.
///
/// Packed into a `u64` the way the chain serializes it: precision in the low
/// byte, then the code characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(u64);

impl Symbol {
    /// Create a symbol from a code and precision.
    pub fn new(code: &str, precision: u8) -> Result<Self, ParseAssetError> {
        if precision > MAX_PRECISION {
            return Err(ParseAssetError::PrecisionTooLarge(precision));
        }
        if code.is_empty() || code.len() > 7 || !code.bytes().all(|c| c.is_ascii_uppercase()) {
            return Err(ParseAssetError::InvalidSymbol(code.to_string()));
        }
        let mut raw = precision as u64;
        for (i, c) in code.bytes().enumerate() {
            raw |= (c as u64) << (8 * (i + 1));
        }
        Ok(Self(raw))
    }

    /// The raw `u64` wire representation.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Decimal precision (number of decimal places in quantities).
    pub fn precision(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// The symbol code, e.g. `"EOS"`.
    pub fn code(&self) -> String {
        let mut code = String::with_capacity(7);
        let mut raw = self.0 >> 8;
        while raw > 0 {
            code.push((raw & 0xff) as u8 as char);
            raw >>= 8;
        }
        code
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision(), self.code())
    }
}

/// A token amount bound to a [`Symbol`].
///
/// ```
/// use eos_kit::{Asset, Symbol};
///
/// let eos = Symbol::new("EOS", 4).unwrap();
/// let asset = Asset::from_quantity("1.2300", eos).unwrap();
/// assert_eq!(asset.to_string(), "1.2300 EOS");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Asset {
    amount: i64,
    symbol: Symbol,
}

impl Asset {
    /// Create an asset from a raw integer amount.
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    /// Parse a bare quantity string (e.g. `"1.2300"`) against a known symbol.
    ///
    /// The number of decimal places must equal the symbol's precision
    /// exactly; `"1.23"` is not a valid quantity for a precision-4 token.
    pub fn from_quantity(quantity: &str, symbol: Symbol) -> Result<Self, ParseAssetError> {
        let (sign, digits) = match quantity.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, quantity),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        if int_part.is_empty()
            || !int_part.bytes().all(|c| c.is_ascii_digit())
            || !frac_part.bytes().all(|c| c.is_ascii_digit())
        {
            return Err(ParseAssetError::InvalidNumber(quantity.to_string()));
        }

        if frac_part.len() != symbol.precision() as usize {
            return Err(ParseAssetError::PrecisionMismatch {
                quantity: quantity.to_string(),
                symbol: symbol.code(),
                expected: symbol.precision(),
            });
        }

        let mut amount: i64 = 0;
        for c in int_part.bytes().chain(frac_part.bytes()) {
            amount = amount
                .checked_mul(10)
                .and_then(|a| a.checked_add((c - b'0') as i64))
                .ok_or(ParseAssetError::Overflow)?;
        }

        Ok(Self {
            amount: sign * amount,
            symbol,
        })
    }

    /// Raw integer amount (quantity scaled by `10^precision`).
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// The asset's symbol.
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// The amount as a float, as reported by balance queries.
    pub fn to_f64(&self) -> f64 {
        self.amount as f64 / 10f64.powi(self.symbol.precision() as i32)
    }
}

impl FromStr for Asset {
    type Err = ParseAssetError;

    /// Parse the chain's `"<amount> <SYMBOL>"` form, inferring the precision
    /// from the number of decimal places (`"123.4567 EOS"` → precision 4).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (quantity, code) = s
            .split_once(' ')
            .ok_or_else(|| ParseAssetError::InvalidFormat(s.to_string()))?;
        let precision = match quantity.split_once('.') {
            Some((_, frac)) => frac.len() as u8,
            None => 0,
        };
        let symbol = Symbol::new(code, precision)?;
        Self::from_quantity(quantity, symbol)
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.symbol.precision() as u32;
        let magnitude = self.amount.unsigned_abs();
        let scale = 10u64.pow(precision);
        let sign = if self.amount < 0 { "-" } else { "" };
        if precision == 0 {
            write!(f, "{}{} {}", sign, magnitude, self.symbol.code())
        } else {
            write!(
                f,
                "{}{}.{:0width$} {}",
                sign,
                magnitude / scale,
                magnitude % scale,
                self.symbol.code(),
                width = precision as usize
            )
        }
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
