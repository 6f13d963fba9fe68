//! Lenient JSON number handling for the light-wallet-server wire format.
//!
//! Deployed servers disagree about whether 64-bit quantities are JSON
//! numbers or decimal strings (amounts and global indices in particular),
//! and payloads destined for JavaScript hosts must carry them as strings
//! because 64-bit values overflow JavaScript numbers. These helpers accept
//! both forms on the way in and emit strings on the way out.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use std::fmt;

struct U64Visitor;

impl<'de> Visitor<'de> for U64Visitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an unsigned 64-bit integer or a decimal string")
    }

    fn visit_u64<E>(self, v: u64) -> Result<u64, E>
    where
        E: de::Error,
    {
        Ok(v)
    }

    fn visit_i64<E>(self, v: i64) -> Result<u64, E>
    where
        E: de::Error,
    {
        u64::try_from(v).map_err(|_| E::custom(format!("negative integer {v}")))
    }

    fn visit_str<E>(self, v: &str) -> Result<u64, E>
    where
        E: de::Error,
    {
        v.trim()
            .parse::<u64>()
            .map_err(|_| E::custom(format!("`{v}` is not a decimal u64")))
    }
}

/// Deserialize a `u64` the server may emit as a number or a string.
pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(U64Visitor)
}

/// Deserialize an optional `u64` that may arrive as a number, a string, or
/// JSON null. Combine with `#[serde(default)]` to cover absent fields.
pub fn opt_u64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptVisitor;

    impl<'de> Visitor<'de> for OptVisitor {
        type Value = Option<u64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an unsigned 64-bit integer, a decimal string, or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(U64Visitor).map(Some)
        }
    }

    deserializer.deserialize_option(OptVisitor)
}

/// Deserialize an optional string, mapping absent, null, and `""` all to
/// `None`. Servers emit the empty string where a field does not apply.
pub fn opt_string_nonempty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

/// Serialize a `u64` as a decimal string.
pub fn u64_as_string<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}
