// ── Core identity type ──
//
// EntityId is the foundation of every domain type. The backend mixes
// UUID identifiers (identity-provider accounts) with opaque
// collision-resistant ids (catalog rows); both normalize into a single
// ergonomic type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical identifier for any marketplace entity.
///
/// Transparently wraps either a UUID or an opaque backend id string.
/// Consumers never care which.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    Opaque(String),
}

impl EntityId {
    pub fn as_uuid(&self) -> Option<&Uuid> {
        if let Self::Uuid(u) = self { Some(u) } else { None }
    }

    pub fn as_opaque(&self) -> Option<&str> {
        if let Self::Opaque(s) = self { Some(s) } else { None }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => fmt::Display::fmt(u, f),
            Self::Opaque(s) => fmt::Display::fmt(s, f),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Uuid::parse_str(&s).map_or_else(|_| Self::Opaque(s), Self::Uuid)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn uuid_strings_take_the_uuid_variant() {
        let id = EntityId::from("8c0be1b5-2d9a-4ec8-a456-426614174000".to_owned());
        assert!(id.as_uuid().is_some());
        assert!(id.as_opaque().is_none());
    }

    #[test]
    fn anything_else_stays_opaque() {
        let id = EntityId::from("clz4k9x2e0001ab8xnm3w".to_owned());
        assert!(id.as_opaque().is_some());
    }

    #[test]
    fn entity_id_display_round_trips() {
        let id: EntityId = "clz4k9x2e0001ab8xnm3w".parse().unwrap();
        assert_eq!(id.to_string(), "clz4k9x2e0001ab8xnm3w");
    }
}
