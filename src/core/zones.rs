//! Zone identifiers and the read-only persona registry.
//!
//! The catalogue ships inside the binary (`builtins/zones.toml`) and is parsed
//! once at startup. After that the registry is shared behind an `Arc` and
//! never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five fixed zones, in display order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ZoneId {
    #[default]
    Observation,
    Learning,
    Discussion,
    Support,
    Silence,
}

impl ZoneId {
    pub const ALL: [ZoneId; 5] = [
        ZoneId::Observation,
        ZoneId::Learning,
        ZoneId::Discussion,
        ZoneId::Support,
        ZoneId::Silence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ZoneId::Observation => "observation",
            ZoneId::Learning => "learning",
            ZoneId::Discussion => "discussion",
            ZoneId::Support => "support",
            ZoneId::Silence => "silence",
        }
    }

    /// Zero-based position in [`ZoneId::ALL`].
    pub fn index(self) -> usize {
        match self {
            ZoneId::Observation => 0,
            ZoneId::Learning => 1,
            ZoneId::Discussion => 2,
            ZoneId::Support => 3,
            ZoneId::Silence => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following zone, wrapping from the last back to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseZoneError {
    input: String,
}

impl fmt::Display for ParseZoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = ZoneId::ALL.iter().map(|zone| zone.as_str()).collect();
        write!(
            f,
            "unknown zone '{}' (expected one of: {})",
            self.input,
            known.join(", ")
        )
    }
}

impl std::error::Error for ParseZoneError {}

impl FromStr for ZoneId {
    type Err = ParseZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ZoneId::ALL
            .iter()
            .copied()
            .find(|zone| zone.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseZoneError {
                input: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Insight {
    pub label: String,
    pub value: String,
}

/// Static persona configuration for a zone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZonePersona {
    pub id: ZoneId,
    pub title: String,
    pub metaphor: String,
    pub tagline: String,
    pub description: String,
    /// `#rrggbb`
    pub accent_color: String,
    pub placeholder: String,
    /// System-level instruction sent with every completion request for this zone.
    pub prompt: String,
    #[serde(default)]
    pub suggested_prompts: Vec<String>,
    #[serde(default)]
    pub featured_insights: Vec<Insight>,
}

/// Errors raised while building a [`ZoneRegistry`].
#[derive(Debug)]
pub enum ZoneRegistryError {
    /// The catalogue is not valid TOML or does not match the persona schema.
    Parse(toml::de::Error),
    /// A zone appears more than once.
    Duplicate(ZoneId),
    /// A zone has no persona.
    Missing(ZoneId),
}

impl fmt::Display for ZoneRegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneRegistryError::Parse(err) => write!(f, "Failed to parse zone catalogue: {err}"),
            ZoneRegistryError::Duplicate(zone) => {
                write!(f, "Zone '{zone}' is defined more than once")
            }
            ZoneRegistryError::Missing(zone) => write!(f, "Zone '{zone}' has no persona"),
        }
    }
}

impl std::error::Error for ZoneRegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ZoneRegistryError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ZoneCatalogue {
    zones: Vec<ZonePersona>,
}

/// Read-only lookup from [`ZoneId`] to its persona.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    // Indexed by `ZoneId::index`.
    zones: Vec<ZonePersona>,
}

impl ZoneRegistry {
    pub fn builtin() -> Result<Self, ZoneRegistryError> {
        const CATALOGUE: &str = include_str!("../builtins/zones.toml");
        Self::from_toml(CATALOGUE)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ZoneRegistryError> {
        let catalogue: ZoneCatalogue = toml::from_str(contents).map_err(ZoneRegistryError::Parse)?;
        Self::from_personas(catalogue.zones)
    }

    /// Builds a registry from personas in any order, requiring each zone exactly once.
    pub fn from_personas(personas: Vec<ZonePersona>) -> Result<Self, ZoneRegistryError> {
        let mut slots: Vec<Option<ZonePersona>> = vec![None; ZoneId::ALL.len()];
        for persona in personas {
            let slot = &mut slots[persona.id.index()];
            if slot.is_some() {
                return Err(ZoneRegistryError::Duplicate(persona.id));
            }
            *slot = Some(persona);
        }

        let mut zones = Vec::with_capacity(slots.len());
        for (zone, slot) in ZoneId::ALL.iter().zip(slots) {
            zones.push(slot.ok_or(ZoneRegistryError::Missing(*zone))?);
        }
        Ok(Self { zones })
    }

    pub fn get(&self, id: ZoneId) -> &ZonePersona {
        &self.zones[id.index()]
    }

    /// Personas in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ZonePersona> {
        self.zones.iter()
    }

    /// One-based zone number shown in the header ("Zone 2").
    pub fn number(&self, id: ZoneId) -> usize {
        id.index() + 1
    }
}
