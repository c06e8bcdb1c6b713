use crate::{FromValue, FromValueError, Value};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Represents the error raised when a stored enumeration cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{text}' is not a valid {kind}")]
pub struct ParseEnumError {
    kind: &'static str,
    text: String,
}

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[cfg_attr(feature = "serde", serde(rename = $text))]
                $variant,
            )+
        }

        impl $name {
            /// Gets the stored text of the value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: stringify!($name),
                        text: s.to_owned(),
                    }),
                }
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::Text(value.as_str().to_owned())
            }
        }

        impl FromValue for $name {
            fn from_value(value: Value) -> Result<Self, FromValueError> {
                let expected = concat!("a ", stringify!($name));

                match value {
                    Value::Text(text) => text
                        .parse()
                        .map_err(|_| FromValueError::new(expected, Value::Text(text))),
                    other => Err(FromValueError::new(expected, other)),
                }
            }
        }
    };
}

text_enum! {
    /// Represents the kind of ownership over a real estate property.
    Ownership {
        /// Indicates the property is wholly owned.
        #[default]
        Full => "FULL",

        /// Indicates the property is partially owned.
        Partial => "PARTIAL",
    }
}

text_enum! {
    /// Represents the unit in which a real estate area is measured.
    AreaUnit {
        /// Indicates square meters.
        #[default]
        SquareMeters => "SQ_MT",
        SquareFeet => "SQ_FT",
        Acres => "ACRES",
        Hectares => "HECTARES",
        Blocks => "BLOCKS",
    }
}
