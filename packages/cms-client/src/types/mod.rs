//! Entity types shared by the management and website APIs.

mod entities;
mod website;

pub use entities::*;
pub use website::*;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Backend-assigned identifier. Numeric for most resources, but some
/// endpoints hand out string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        EntityId::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| EntityId::Text(value.to_string()))
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::from(value.as_str())
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    /// Canonical digits parse as a number. Anything that would not print
    /// back the same (`"007"`, `"+7"`) is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) if n.to_string() == s => EntityId::Number(n),
            _ => EntityId::Text(s.to_string()),
        })
    }
}

/// Visibility of a news article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
}

impl PublishStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishStatus::Published)
    }
}

/// Folds the legacy `isPublished` key into `is_published`. The snake_case
/// key wins whenever it carries a value.
pub(crate) fn canonical_published(mut value: Value) -> Value {
    if let Value::Object(fields) = &mut value {
        if let Some(legacy) = fields.remove("isPublished") {
            let current = fields.entry("is_published").or_insert(Value::Null);
            if current.is_null() {
                *current = legacy;
            }
        }
    }
    value
}

/// Serde impls for entities whose publish flag arrives under either
/// spelling. The entity derives with `#[serde(remote = "Self")]`, and these
/// impls route through the derived inherent functions.
macro_rules! published_serde {
    ($($ty:ty),* $(,)?) => {$(
        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                <$ty>::serialize(self, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                <$ty>::deserialize($crate::types::canonical_published(value))
                    .map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    )*};
}
pub(crate) use published_serde;

/// Accepts `true`/`false`, `0`/`1`, and their string forms. The backend
/// stores flags as tinyints and is not consistent about casting them.
/// `null` reads as unset.
pub(crate) fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Raw::Bool(b)) => Ok(b),
        Some(Raw::Int(n)) => Ok(n != 0),
        Some(Raw::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean flag: {other:?}"))),
        },
    }
}

/// Accepts a number or a numeric string. `null` reads as zero.
pub(crate) fn flexible_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Raw::Int(n)) => Ok(n),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid number: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Flags {
        #[serde(deserialize_with = "flexible_bool")]
        on: bool,
        #[serde(deserialize_with = "flexible_u32")]
        order: u32,
    }

    #[test]
    fn test_entity_id_untagged() {
        let n: EntityId = serde_json::from_value(json!(7)).unwrap();
        let s: EntityId = serde_json::from_value(json!("slug-7")).unwrap();
        assert_eq!(n, EntityId::Number(7));
        assert_eq!(s, EntityId::Text("slug-7".into()));
        assert_eq!(n.to_string(), "7");
        assert_eq!(s.to_string(), "slug-7");
    }

    #[test]
    fn test_entity_id_from_str() {
        assert_eq!(EntityId::from("12"), EntityId::Number(12));
        assert_eq!(EntityId::from("abc"), EntityId::Text("abc".into()));
    }

    #[test]
    fn test_entity_id_keeps_padded_keys_as_text() {
        let padded = EntityId::from("007");
        assert_eq!(padded, EntityId::Text("007".into()));
        assert_eq!(padded.to_string(), "007");
        assert_eq!(EntityId::from("+7"), EntityId::Text("+7".into()));
        assert_ne!(EntityId::from("007"), EntityId::from("7"));
    }

    #[test]
    fn test_flexible_flags() {
        for (raw, expected) in [
            (json!(true), true),
            (json!(0), false),
            (json!(1), true),
            (json!("1"), true),
            (json!("false"), false),
        ] {
            let flags: Flags = serde_json::from_value(json!({"on": raw, "order": 1})).unwrap();
            assert_eq!(flags.on, expected);
        }

        let bad = serde_json::from_value::<Flags>(json!({"on": "maybe", "order": 1}));
        assert!(bad.is_err());

        let flags: Flags = serde_json::from_value(json!({"on": 1, "order": "3"})).unwrap();
        assert_eq!(flags.order, 3);
    }

    #[test]
    fn test_flexible_flags_read_null_as_unset() {
        let flags: Flags = serde_json::from_value(json!({"on": null, "order": null})).unwrap();
        assert!(!flags.on);
        assert_eq!(flags.order, 0);
    }

    #[test]
    fn test_canonical_published_prefers_snake_case() {
        let both = canonical_published(json!({"is_published": 1, "isPublished": false}));
        assert_eq!(both, json!({"is_published": 1}));

        let legacy = canonical_published(json!({"isPublished": true}));
        assert_eq!(legacy, json!({"is_published": true}));

        let null_snake = canonical_published(json!({"is_published": null, "isPublished": 1}));
        assert_eq!(null_snake, json!({"is_published": 1}));
    }

    #[test]
    fn test_publish_status_wire_format() {
        assert_eq!(
            serde_json::to_value(PublishStatus::Published).unwrap(),
            json!("published")
        );
        let draft: PublishStatus = serde_json::from_value(json!("draft")).unwrap();
        assert!(!draft.is_published());
    }
}
