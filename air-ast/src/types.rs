//! The value-type sub-language.

use serde::{Deserialize, Serialize};

/// A value type in the AIR type grammar.
///
/// Closed sum: `optional` and `array` wrap exactly one inner type,
/// `object` holds an ordered field list with unique names, and an
/// explicitly declared `enum` has a non-empty value list. Primitives may
/// carry a literal default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AirType {
    Str {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<i64>,
    },
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
    },
    Bool {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<bool>,
    },
    Date,
    Datetime,
    Optional {
        of: Box<AirType>,
    },
    Array {
        of: Box<AirType>,
    },
    Object {
        fields: Vec<AirField>,
    },
    Enum {
        values: Vec<String>,
    },
    Ref {
        entity: String,
    },
}

impl AirType {
    /// A `str` with no default.
    pub fn str() -> Self {
        AirType::Str { default: None }
    }

    /// An `int` with no default.
    pub fn int() -> Self {
        AirType::Int { default: None }
    }

    /// A `bool` with no default.
    pub fn bool() -> Self {
        AirType::Bool { default: None }
    }

    /// True for the non-wrapping, non-composite kinds.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            AirType::Str { .. }
                | AirType::Int { .. }
                | AirType::Float { .. }
                | AirType::Bool { .. }
                | AirType::Date
                | AirType::Datetime
        )
    }
}

/// A named, typed field (state fields, API parameters, object members).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AirType,
}

impl AirField {
    pub fn new(name: impl Into<String>, ty: AirType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A database model field: an [`AirField`] plus column modifiers.
///
/// At most one field per model may set `primary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirDbField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AirType,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub auto: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl AirDbField {
    pub fn new(name: impl Into<String>, ty: AirType) -> Self {
        Self {
            name: name.into(),
            ty,
            primary: false,
            required: false,
            auto: false,
            default: None,
        }
    }
}
