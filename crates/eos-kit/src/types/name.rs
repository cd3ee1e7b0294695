//! EOS account name type and its base-32 codec.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseNameError;

/// The base-32 alphabet used by the chain, indexed by symbol value.
const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// A validated EOS account name.
///
/// Account names are up to 13 characters from the alphabet `.12345a-z`,
/// packed bijectively into a `u64`. The first 12 characters take 5 bits
/// each; the 13th, if present, takes the remaining 4 bits and is therefore
/// restricted to the first 16 symbols (`.12345a-j`).
///
/// The same encoding is used for contract table names, action names, and
/// permission names, so this type covers those too.
///
/// ```
/// use eos_kit::AccountName;
///
/// let name: AccountName = "eosio.token".parse().unwrap();
/// assert_eq!(name.to_string(), "eosio.token");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountName(u64);

impl AccountName {
    /// The canonical 64-bit value of this name.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Reconstruct a name from its canonical 64-bit value.
    ///
    /// Any `u64` decodes to *some* name string, so this cannot fail; values
    /// that did not come from [`AccountName::from_str`] may decode to names
    /// with embedded dots.
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// The little-endian byte representation used in packed transactions.
    pub fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    fn char_to_symbol(c: u8) -> Option<u64> {
        match c {
            b'a'..=b'z' => Some((c - b'a') as u64 + 6),
            b'1'..=b'5' => Some((c - b'1') as u64 + 1),
            b'.' => Some(0),
            _ => None,
        }
    }
}

impl FromStr for AccountName {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseNameError::Empty);
        }
        if s.len() > 13 {
            return Err(ParseNameError::TooLong(s.to_string()));
        }
        if s.ends_with('.') {
            return Err(ParseNameError::TrailingDot(s.to_string()));
        }

        let mut value: u64 = 0;
        for (i, &c) in s.as_bytes().iter().enumerate() {
            let sym = Self::char_to_symbol(c)
                .ok_or_else(|| ParseNameError::InvalidChar(s.to_string(), c as char))?;
            if i < 12 {
                value |= (sym & 0x1f) << (64 - 5 * (i + 1));
            } else {
                // 13th character only has 4 bits available
                if sym > 0x0f {
                    return Err(ParseNameError::InvalidThirteenth(s.to_string()));
                }
                value |= sym;
            }
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for AccountName {
    type Error = ParseNameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = [b'.'; 13];
        let mut tmp = self.0;
        for i in (0..13).rev() {
            if i == 12 {
                chars[i] = CHARMAP[(tmp & 0x0f) as usize];
                tmp >>= 4;
            } else {
                chars[i] = CHARMAP[(tmp & 0x1f) as usize];
                tmp >>= 5;
            }
        }
        let mut end = 13;
        while end > 0 && chars[end - 1] == b'.' {
            end -= 1;
        }
        // CHARMAP is pure ASCII
        f.write_str(std::str::from_utf8(&chars[..end]).map_err(|_| fmt::Error)?)
    }
}

impl Debug for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountName({})", self)
    }
}

impl Serialize for AccountName {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountName {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
