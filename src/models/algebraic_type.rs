//! Algebraic type descriptors for the Meridian wire protocol.
//!
//! The server describes every value shape with a small structural algebra:
//! primitives, products (structs/tuples), sums (tagged unions) and `Ref`
//! indirections into a shared typespace table. Descriptors arrive as
//! self-describing JSON:
//!
//! ```json
//! "U32"
//! {"Ref": 3}
//! {"Product": {"elements": [{"name": {"some": "id"}, "algebraic_type": "U64"}]}}
//! {"Sum": {"variants": [{"name": {"none": []}, "algebraic_type": "Bool"}]}}
//! ```
//!
//! The primitive namespace is closed: a bare string tag outside it is a
//! protocol violation and fails deserialization. Composite shapes that do
//! not match the conventions above are captured as [`AlgebraicType::Opaque`]
//! and later resolve to the `unknown` display tag instead of failing.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::error::TypeResolutionError;
use crate::models::column::ColumnType;

/// Field name marking a single-element product as a timestamp
/// (microseconds since the Unix epoch).
pub const TIMESTAMP_SENTINEL: &str = "__timestamp_micros_since_unix_epoch__";

/// Field name marking a single-element product as an identity (the
/// server's opaque principal bytes).
pub const IDENTITY_SENTINEL: &str = "__identity__";

/// Field name marking a single-element product as a duration in
/// microseconds.
pub const DURATION_SENTINEL: &str = "__time_duration_micros__";

/// The closed set of primitive wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
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
    String,
}

impl PrimitiveType {
    /// Parse a wire tag ("U32", "Bool", ...). The set is closed, so an
    /// unknown tag is a protocol violation, not caller data.
    pub fn from_tag(tag: &str) -> Result<Self, TypeResolutionError> {
        let primitive = match tag {
            "Bool" => Self::Bool,
            "U8" => Self::U8,
            "U16" => Self::U16,
            "U32" => Self::U32,
            "U64" => Self::U64,
            "U128" => Self::U128,
            "U256" => Self::U256,
            "I8" => Self::I8,
            "I16" => Self::I16,
            "I32" => Self::I32,
            "I64" => Self::I64,
            "I128" => Self::I128,
            "I256" => Self::I256,
            "F32" => Self::F32,
            "F64" => Self::F64,
            "String" => Self::String,
            other => return Err(TypeResolutionError::UnrecognizedPrimitive(other.to_string())),
        };
        Ok(primitive)
    }

    /// The wire tag for this primitive.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::U8 => "U8",
            Self::U16 => "U16",
            Self::U32 => "U32",
            Self::U64 => "U64",
            Self::U128 => "U128",
            Self::U256 => "U256",
            Self::I8 => "I8",
            Self::I16 => "I16",
            Self::I32 => "I32",
            Self::I64 => "I64",
            Self::I128 => "I128",
            Self::I256 => "I256",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::String => "String",
        }
    }

    /// The canonical display tag. Total over the closed set.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Bool => ColumnType::Bool,
            Self::U8 => ColumnType::U8,
            Self::U16 => ColumnType::U16,
            Self::U32 => ColumnType::U32,
            Self::U64 => ColumnType::U64,
            Self::U128 => ColumnType::U128,
            Self::U256 => ColumnType::U256,
            Self::I8 => ColumnType::I8,
            Self::I16 => ColumnType::I16,
            Self::I32 => ColumnType::I32,
            Self::I64 => ColumnType::I64,
            Self::I128 => ColumnType::I128,
            Self::I256 => ColumnType::I256,
            Self::F32 => ColumnType::F32,
            Self::F64 => ColumnType::F64,
            Self::String => ColumnType::String,
        }
    }
}

/// Engaged/disengaged optional name, as the wire encodes it:
/// `{"some": "id"}` when present, `{"none": []}` (or `null`) when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalName(Option<String>);

impl OptionalName {
    /// An engaged name.
    pub fn some(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    /// A disengaged name.
    pub fn none() -> Self {
        Self(None)
    }

    /// The name, if engaged.
    pub fn engaged(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Read the wire encoding. Missing/null/`{"none": ...}` are all
    /// disengaged; a bare string is accepted as engaged.
    pub fn from_json(value: Option<&JsonValue>) -> Self {
        match value {
            Some(JsonValue::String(name)) => Self(Some(name.clone())),
            Some(JsonValue::Object(map)) => match map.get("some") {
                Some(JsonValue::String(name)) => Self(Some(name.clone())),
                _ => Self(None),
            },
            _ => Self(None),
        }
    }

    fn to_json(&self) -> JsonValue {
        match &self.0 {
            Some(name) => json!({ "some": name }),
            None => json!({ "none": [] }),
        }
    }
}

impl Serialize for OptionalName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OptionalName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Ok(Self::from_json(Some(&value)))
    }
}

/// One field of a product type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductElement {
    pub name: OptionalName,
    pub algebraic_type: AlgebraicType,
}

impl ProductElement {
    pub fn new(name: OptionalName, algebraic_type: AlgebraicType) -> Self {
        Self {
            name,
            algebraic_type,
        }
    }

    fn from_json(value: &JsonValue) -> Result<Option<Self>, TypeResolutionError> {
        let Some(ty) = value.get("algebraic_type") else {
            return Ok(None);
        };
        Ok(Some(Self {
            name: OptionalName::from_json(value.get("name")),
            algebraic_type: AlgebraicType::from_json(ty)?,
        }))
    }

    fn to_json(&self) -> JsonValue {
        json!({
            "name": self.name.to_json(),
            "algebraic_type": self.algebraic_type.to_json(),
        })
    }
}

impl Serialize for ProductElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProductElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json(&value)
            .map_err(de::Error::custom)?
            .ok_or_else(|| de::Error::custom("product element missing 'algebraic_type'"))
    }
}

/// One variant of a sum type. Same wire shape as [`ProductElement`].
#[derive(Debug, Clone, PartialEq)]
pub struct SumVariant {
    pub name: OptionalName,
    pub algebraic_type: AlgebraicType,
}

impl SumVariant {
    pub fn new(name: OptionalName, algebraic_type: AlgebraicType) -> Self {
        Self {
            name,
            algebraic_type,
        }
    }

    fn to_json(&self) -> JsonValue {
        json!({
            "name": self.name.to_json(),
            "algebraic_type": self.algebraic_type.to_json(),
        })
    }
}

/// A structural type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgebraicType {
    Primitive(PrimitiveType),
    Product { elements: Vec<ProductElement> },
    Sum { variants: Vec<SumVariant> },
    Ref(usize),
    /// Anything that does not match the conventions above. Kept verbatim
    /// and resolved to the `unknown` display tag.
    Opaque(JsonValue),
}

impl AlgebraicType {
    /// Convenience constructor for a product type.
    pub fn product(elements: Vec<ProductElement>) -> Self {
        Self::Product { elements }
    }

    /// Convenience constructor for a sum type.
    pub fn sum(variants: Vec<SumVariant>) -> Self {
        Self::Sum { variants }
    }

    /// Parse the wire encoding.
    ///
    /// Only an unrecognized primitive tag is an error; malformed composite
    /// shapes become [`AlgebraicType::Opaque`].
    pub fn from_json(value: &JsonValue) -> Result<Self, TypeResolutionError> {
        match value {
            JsonValue::String(tag) => PrimitiveType::from_tag(tag).map(Self::Primitive),
            JsonValue::Object(map) if map.len() == 1 => {
                if let Some(inner) = map.get("Ref") {
                    return Ok(match inner.as_u64() {
                        Some(index) => Self::Ref(index as usize),
                        None => Self::Opaque(value.clone()),
                    });
                }
                if let Some(inner) = map.get("Product") {
                    return Ok(match Self::members_from_json(inner, "elements")? {
                        Some(members) => Self::Product {
                            elements: members
                                .into_iter()
                                .map(|(name, ty)| ProductElement::new(name, ty))
                                .collect(),
                        },
                        None => Self::Opaque(value.clone()),
                    });
                }
                if let Some(inner) = map.get("Sum") {
                    return Ok(match Self::members_from_json(inner, "variants")? {
                        Some(members) => Self::Sum {
                            variants: members
                                .into_iter()
                                .map(|(name, ty)| SumVariant::new(name, ty))
                                .collect(),
                        },
                        None => Self::Opaque(value.clone()),
                    });
                }
                Ok(Self::Opaque(value.clone()))
            }
            _ => Ok(Self::Opaque(value.clone())),
        }
    }

    /// Shared parse for product elements and sum variants. `Ok(None)`
    /// means the shape did not match (caller falls back to `Opaque`);
    /// `Err` bubbles an unrecognized primitive tag out of any depth.
    fn members_from_json(
        inner: &JsonValue,
        key: &str,
    ) -> Result<Option<Vec<(OptionalName, AlgebraicType)>>, TypeResolutionError> {
        let Some(list) = inner.get(key).and_then(JsonValue::as_array) else {
            return Ok(None);
        };
        let mut members = Vec::with_capacity(list.len());
        for entry in list {
            match ProductElement::from_json(entry)? {
                Some(element) => members.push((element.name, element.algebraic_type)),
                None => return Ok(None),
            }
        }
        Ok(Some(members))
    }

    /// The wire encoding of this descriptor.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Primitive(primitive) => JsonValue::String(primitive.tag().to_string()),
            Self::Product { elements } => json!({
                "Product": {
                    "elements": elements.iter().map(ProductElement::to_json).collect::<Vec<_>>(),
                }
            }),
            Self::Sum { variants } => json!({
                "Sum": {
                    "variants": variants.iter().map(SumVariant::to_json).collect::<Vec<_>>(),
                }
            }),
            Self::Ref(index) => json!({ "Ref": index }),
            Self::Opaque(value) => value.clone(),
        }
    }
}

impl Serialize for AlgebraicType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AlgebraicType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json(&value).map_err(de::Error::custom)
    }
}

/// The ordered table of algebraic types that `Ref` indices index into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Typespace(pub Vec<AlgebraicType>);

impl Typespace {
    pub fn new(types: Vec<AlgebraicType>) -> Self {
        Self(types)
    }

    /// An empty typespace, for descriptors known to be ref-free.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, index: usize) -> Option<&AlgebraicType> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
