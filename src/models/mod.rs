//! UI-facing entity shapes
//!
//! Entities serialize in camelCase, the way the dashboard consumes them.
//! The storage row shapes live next to their mappers in [`crate::mapper`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::MapError;

/// A string that does not name any variant of a closed enum
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized {kind} value {raw:?}")]
pub struct UnrecognizedValue {
    pub kind: &'static str,
    pub raw: String,
}

/// Declares a storage-string enum.
///
/// Every enum gets strict [`parse`](AssetStatus::parse), a lenient
/// `from_stored` that keeps unknown values in an `Unrecognized` variant,
/// the wire string (`as_str`) and the Spanish display label (`label`).
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $variant:ident => $wire:literal, $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            /// A stored value outside the known set, kept verbatim
            Unrecognized(String),
        }

        impl $name {
            /// Strict parse of a stored or imported value
            pub fn parse(raw: &str) -> ::std::result::Result<Self, $crate::models::UnrecognizedValue> {
                match raw {
                    $( $wire => Ok($name::$variant), )+
                    _ => Err($crate::models::UnrecognizedValue {
                        kind: $kind,
                        raw: raw.to_string(),
                    }),
                }
            }

            /// Lenient parse used on rows read back from storage
            pub fn from_stored(raw: &str) -> Self {
                Self::parse(raw).unwrap_or_else(|err| {
                    tracing::warn!(%err, "keeping unrecognized stored value");
                    $name::Unrecognized(err.raw)
                })
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Unrecognized(raw) => raw.as_str(),
                }
            }

            /// Spanish display label
            pub fn label(&self) -> &str {
                match self {
                    $( $name::$variant => $label, )+
                    $name::Unrecognized(raw) => raw.as_str(),
                }
            }

            /// Reverse of [`label`](Self::label) for the known variants
            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $( $label => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, $name::Unrecognized(_))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnrecognizedValue;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_stored(&raw))
            }
        }
    };
}

pub(crate) use wire_enum;

mod asset;
mod client;
mod maintenance;
mod repair;

pub use asset::*;
pub use client::*;
pub use maintenance::*;
pub use repair::*;

/// Geographic position as `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self(longitude, latitude)
    }

    pub fn longitude(&self) -> f64 {
        self.0
    }

    pub fn latitude(&self) -> f64 {
        self.1
    }

    /// JSON text stored in the `coordinates` column
    pub fn to_column(&self) -> String {
        serde_json::json!([self.0, self.1]).to_string()
    }

    pub fn from_column(raw: &str) -> Result<Self, MapError> {
        serde_json::from_str(raw).map_err(|source| MapError::Coordinates {
            raw: raw.to_string(),
            source,
        })
    }
}
