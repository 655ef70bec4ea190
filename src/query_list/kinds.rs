//! Enumerations stored in a `QueryList` and their canonical text form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use crate::Error;

/// An enumeration persisted by canonical name (or, for older data, by ordinal).
pub trait AttributeEnum: Copy + FromStr<Err = Error> + 'static {
    /// Type name used in error reports.
    const ENUM_NAME: &'static str;

    /// Every enumerator, in ordinal order.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn ordinal(self) -> i64;

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

macro_rules! attribute_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $first:ident $(, $rest:ident)* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $first,
            $($rest,)*
        }

        impl AttributeEnum for $name {
            const ENUM_NAME: &'static str = stringify!($name);
            const ALL: &'static [Self] = &[$name::$first $(, $name::$rest)*];

            fn as_str(self) -> &'static str {
                match self {
                    $name::$first => stringify!($first),
                    $($name::$rest => stringify!($rest),)*
                }
            }

            fn ordinal(self) -> i64 {
                self as i64
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            /// Case-sensitive; unknown names are an error, never a default.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|e| e.as_str() == s)
                    .ok_or_else(|| Error::InvalidEnum {
                        enum_name: <Self as AttributeEnum>::ENUM_NAME,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

attribute_enum! {
    /// Kind of query a descriptor registers.
    pub enum QueryType { DatabaseQuery, PointQuery, LineQuery }
}

attribute_enum! {
    /// Space a query's coordinates are interpreted in.
    pub enum CoordinateRepresentation { WorldSpace, ScreenSpace }
}
