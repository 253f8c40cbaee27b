use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Serde goes through the same string table so the wire form matches
/// what is written to the ledger.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(TurnRole {
    System => "system",
    User => "user",
    Assistant => "assistant",
});

str_enum!(SymptomStatus {
    Present => "present",
    Absent => "absent",
    Unknown => "unknown",
});

// Ledger values keep the labels the reviewer picked from.
str_enum!(RelevanceRating {
    Yes => "Yes",
    Partially => "Partially",
    No => "No",
});

str_enum!(CorrectnessRating {
    Yes => "Yes",
    No => "No",
});

str_enum!(LookaheadMode {
    Strict => "strict",
    Lenient => "lenient",
});

impl Default for RelevanceRating {
    fn default() -> Self {
        Self::Yes
    }
}

impl Default for CorrectnessRating {
    fn default() -> Self {
        Self::Yes
    }
}

impl Default for LookaheadMode {
    fn default() -> Self {
        Self::Strict
    }
}
