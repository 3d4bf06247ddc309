use crate::core::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Entities whose list endpoints accept filter expressions. Each one owns a
/// separate field catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Note,
    Class,
    SavedQuery,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Note, EntityKind::Class, EntityKind::SavedQuery];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Note => "note",
            EntityKind::Class => "class",
            EntityKind::SavedQuery => "saved_query",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" | "memo" => Ok(EntityKind::Note),
            "class" => Ok(EntityKind::Class),
            "saved_query" | "shortcut" => Ok(EntityKind::SavedQuery),
            _ => Err(ModelError::UnknownEntity(s.to_string())),
        }
    }
}
