//! Positional field metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of an attribute field, as reported by reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    Int,
    Double,
    String,
    Enum,
    BoolVector,
    IntVector,
    DoubleVector,
    StringVector,
    /// Sequence of enumerators, persisted by canonical name.
    EnumVector,
}

impl FieldType {
    pub fn type_name(self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Enum => "enum",
            FieldType::BoolVector => "boolVector",
            FieldType::IntVector => "intVector",
            FieldType::DoubleVector => "doubleVector",
            FieldType::StringVector => "stringVector",
            FieldType::EnumVector => "enumVector",
        }
    }

    pub fn is_vector(self) -> bool {
        matches!(
            self,
            FieldType::BoolVector
                | FieldType::IntVector
                | FieldType::DoubleVector
                | FieldType::StringVector
                | FieldType::EnumVector
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One row of a record type's index-to-metadata table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldSpec {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(FieldType::StringVector.type_name(), "stringVector");
        assert_eq!(FieldType::Int.to_string(), "int");
        assert!(FieldType::EnumVector.is_vector());
        assert!(!FieldType::Enum.is_vector());
    }

    #[test]
    fn test_const_spec() {
        const SPEC: FieldSpec = FieldSpec::new("names", FieldType::StringVector);
        assert_eq!(SPEC.name, "names");
        assert_eq!(SPEC.ty, FieldType::StringVector);
    }
}
