use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Storage class a declared column type falls into.
///
/// Derived from the declared type by substring matching, following SQLite's
/// column affinity rules with a separate bucket for date-like types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeGroup {
    Integer,
    Text,
    Blob,
    Real,
    Date,
    Numeric,
}

impl TypeGroup {
    /// Normalize a declared SQL type into its type group.
    ///
    /// An empty declared type is treated as absent and maps to `BLOB`;
    /// anything not matched by the rules below maps to `NUMERIC`.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.trim().to_uppercase();
        if upper.is_empty() {
            return TypeGroup::Blob;
        }

        if upper.contains("INT") {
            TypeGroup::Integer
        } else if ["CHAR", "CLOB", "TEXT"].iter().any(|pat| upper.contains(pat)) {
            TypeGroup::Text
        } else if upper.contains("BLOB") {
            TypeGroup::Blob
        } else if ["REAL", "FLOA", "DOUB"].iter().any(|pat| upper.contains(pat)) {
            TypeGroup::Real
        } else if ["DATE", "TIME"].iter().any(|pat| upper.contains(pat)) {
            TypeGroup::Date
        } else {
            TypeGroup::Numeric
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeGroup::Integer => "INTEGER",
            TypeGroup::Text => "TEXT",
            TypeGroup::Blob => "BLOB",
            TypeGroup::Real => "REAL",
            TypeGroup::Date => "DATE",
            TypeGroup::Numeric => "NUMERIC",
        }
    }
}

impl fmt::Display for TypeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::TypeGroup;

    #[test]
    fn integer_types_match_on_int_substring() {
        assert_eq!(TypeGroup::from_declared("INT"), TypeGroup::Integer);
        assert_eq!(TypeGroup::from_declared("bigint"), TypeGroup::Integer);
        assert_eq!(TypeGroup::from_declared("UNSIGNED BIG INT"), TypeGroup::Integer);
        // "POINT" contains INT and wins over everything else.
        assert_eq!(TypeGroup::from_declared("point"), TypeGroup::Integer);
    }

    #[test]
    fn text_blob_real_and_date_groups() {
        assert_eq!(TypeGroup::from_declared("varchar(255)"), TypeGroup::Text);
        assert_eq!(TypeGroup::from_declared("CLOB"), TypeGroup::Text);
        assert_eq!(TypeGroup::from_declared("blob"), TypeGroup::Blob);
        assert_eq!(TypeGroup::from_declared("double precision"), TypeGroup::Real);
        assert_eq!(TypeGroup::from_declared("FLOAT"), TypeGroup::Real);
        assert_eq!(TypeGroup::from_declared("datetime"), TypeGroup::Date);
        assert_eq!(TypeGroup::from_declared("TIMESTAMP"), TypeGroup::Date);
    }

    #[test]
    fn absent_and_unknown_types() {
        assert_eq!(TypeGroup::from_declared(""), TypeGroup::Blob);
        assert_eq!(TypeGroup::from_declared("   "), TypeGroup::Blob);
        assert_eq!(TypeGroup::from_declared("decimal(10,2)"), TypeGroup::Numeric);
        assert_eq!(TypeGroup::from_declared("boolean"), TypeGroup::Numeric);
    }
}
