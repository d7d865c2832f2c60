//! Resolved column descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical type tag for a resolved column.
///
/// This is the resolver's output vocabulary: the closed primitive set in
/// lowercase, `struct`/`enum` for generic composites, the three built-in
/// composite types spelled the way the portal displays them, and `unknown`
/// as the permissive fallback for shapes the protocol conventions do not
/// cover.
///
/// # Example JSON
///
/// ```json
/// "u32"
/// "Timestamp"
/// "unknown"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    I8,
    I16,
    I32,
    I64,
    I128,
    I256,
    F32,
    F64,
    Bool,
    String,
    Struct,
    Enum,
    #[serde(rename = "Timestamp")]
    Timestamp,
    #[serde(rename = "Identity")]
    Identity,
    #[serde(rename = "Duration")]
    Duration,
    Unknown,
}

impl ColumnType {
    /// The display string, exactly as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::U256 => "u256",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::I256 => "i256",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Timestamp => "Timestamp",
            Self::Identity => "Identity",
            Self::Duration => "Duration",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved column: display name plus canonical type tag.
///
/// The name is the schema's engaged element name, or `col_<index>` when
/// the schema left it disengaged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Canonical type tag produced by the resolver.
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serialized_form() {
        for (column_type, expected) in [
            (ColumnType::U8, "\"u8\""),
            (ColumnType::String, "\"string\""),
            (ColumnType::Timestamp, "\"Timestamp\""),
            (ColumnType::Identity, "\"Identity\""),
            (ColumnType::Duration, "\"Duration\""),
            (ColumnType::Unknown, "\"unknown\""),
        ] {
            assert_eq!(serde_json::to_string(&column_type).unwrap(), expected);
            assert_eq!(format!("\"{column_type}\""), expected);
        }
    }

    #[test]
    fn test_column_descriptor_serde_round_trip() {
        let column = ColumnDescriptor::new("joined", ColumnType::Timestamp);
        let json = serde_json::to_string(&column).unwrap();
        let parsed: ColumnDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, column);
    }
}
