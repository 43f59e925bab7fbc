//! Human-readable size and file mode parsing utilities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid size format: {0}")]
    InvalidFormat(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Size does not fit in 64 bits: {0}")]
    TooLarge(String),

    #[error("Invalid file mode '{0}', expected octal such as \"0o644\"")]
    InvalidMode(String),
}

/// Units accepted and emitted for byte sizes, largest first
const SIZE_UNITS: [(&str, u64); 5] = [
    ("TB", 1 << 40),
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
    ("B", 1),
];

/// Byte size that reads and writes as `"32MB"`, `"1GiB"` or a plain integer
///
/// Formatting picks the largest unit that divides the size exactly, so the
/// printed form always parses back to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (unit, divisor) = SIZE_UNITS
            .iter()
            .copied()
            .find(|&(_, divisor)| self.0 != 0 && self.0 % divisor == 0)
            .unwrap_or(("B", 1));
        write!(f, "{}{}", self.0 / divisor, unit)
    }
}

impl Serialize for ByteSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ByteSizeVisitor;

        impl<'de> serde::de::Visitor<'de> for ByteSizeVisitor {
            type Value = ByteSize;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a byte size as string (e.g., \"5MB\", \"1GB\") or integer")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ByteSize(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(v)
                    .map(ByteSize)
                    .map_err(|_| E::custom(format!("byte size cannot be negative: {}", v)))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<ByteSize>().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_any(ByteSizeVisitor)
    }
}

impl FromStr for ByteSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();

        if let Ok(num) = upper.parse::<u64>() {
            return Ok(ByteSize(num));
        }

        let pos = upper
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ParseError::InvalidFormat(s.to_string()))?;
        let (num_str, unit) = upper.split_at(pos);
        let num: u64 = num_str.parse()?;

        // Binary units only; "MB" and "MiB" mean the same thing here
        let name = match unit.trim() {
            "B" => "B",
            "K" | "KB" | "KIB" => "KB",
            "M" | "MB" | "MIB" => "MB",
            "G" | "GB" | "GIB" => "GB",
            "T" | "TB" | "TIB" => "TB",
            other => return Err(ParseError::InvalidUnit(other.to_string())),
        };
        let multiplier = SIZE_UNITS
            .iter()
            .find(|(unit, _)| *unit == name)
            .map_or(1, |&(_, multiplier)| multiplier);

        num.checked_mul(multiplier)
            .map(ByteSize)
            .ok_or_else(|| ParseError::TooLarge(s.to_string()))
    }
}

/// Unix permission bits for the store, written and parsed as octal
///
/// Describes file permissions. The store lives in a directory, so
/// `dir_mode` adds the search bit wherever read access is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(pub u32);

impl FileMode {
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Directory permissions derived from the file mode
    pub fn dir_mode(&self) -> u32 {
        self.0 | ((self.0 & 0o444) >> 2)
    }
}

impl Default for FileMode {
    fn default() -> Self {
        FileMode(0o666)
    }
}

impl FromStr for FileMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .or_else(|| trimmed.strip_prefix("0O"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(ParseError::InvalidMode(s.to_string()));
        }

        u32::from_str_radix(digits, 8)
            .map(FileMode)
            .map_err(|_| ParseError::InvalidMode(s.to_string()))
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0o{:o}", self.0)
    }
}

impl Serialize for FileMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FileMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FileModeVisitor;

        impl<'de> serde::de::Visitor<'de> for FileModeVisitor {
            type Value = FileMode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an octal file mode as string (e.g., \"0o644\") or integer")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u32::try_from(v)
                    .map(FileMode)
                    .map_err(|_| E::custom(format!("file mode out of range: {}", v)))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u32::try_from(v)
                    .map(FileMode)
                    .map_err(|_| E::custom(format!("file mode out of range: {}", v)))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<FileMode>().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_any(FileModeVisitor)
    }
}
