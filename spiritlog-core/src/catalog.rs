//! Spirit and adversary catalogs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordinal difficulty band for a spirit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplexityTier {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "moderate", alias = "MODERATE")]
    Moderate,
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(
        rename = "Very High",
        alias = "VeryHigh",
        alias = "very_high",
        alias = "VERY_HIGH",
        alias = "very high"
    )]
    VeryHigh,
}

impl ComplexityTier {
    /// Every tier, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Moderate, Self::High, Self::VeryHigh];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A playable spirit as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiritDefinition {
    #[serde(alias = "spirit")]
    pub id: String,
    pub complexity: ComplexityTier,
    /// Expansion or box the spirit ships in
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub image: String,
}

/// One declared escalation level of an adversary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryLevel {
    pub level: u8,
    pub difficulty: i32,
    #[serde(default)]
    pub fear_cards: String,
    #[serde(default)]
    pub effect: String,
}

/// An opposing adversary with its base difficulty and escalation levels.
///
/// Level 0 is the base adversary and is never listed in `levels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryDefinition {
    #[serde(alias = "adversary", alias = "name")]
    pub id: String,
    #[serde(alias = "difficulty")]
    pub base_difficulty: i32,
    #[serde(default)]
    pub escalation: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub levels: Vec<AdversaryLevel>,
}

impl AdversaryDefinition {
    #[must_use]
    pub fn level(&self, level: u8) -> Option<&AdversaryLevel> {
        if level == 0 {
            return None;
        }
        self.levels.iter().find(|l| l.level == level)
    }

    /// Difficulty of the adversary fought at `level`.
    ///
    /// Undeclared levels fall back to the base difficulty.
    #[must_use]
    pub fn difficulty_for(&self, level: u8) -> i32 {
        self.level(level)
            .map_or(self.base_difficulty, |declared| declared.difficulty)
    }

    #[must_use]
    pub fn highest_declared_level(&self) -> u8 {
        self.levels.iter().map(|l| l.level).max().unwrap_or(0)
    }
}

fn dedup_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> &str, kind: &str) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(id(&item).to_string()) {
            kept.push(item);
        } else {
            log::warn!("duplicate {kind} id {:?} in catalog; keeping first entry", id(&item));
        }
    }
    kept
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpiritCatalog(pub Vec<SpiritDefinition>);

impl SpiritCatalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Build a catalog, dropping repeated ids after the first.
    #[must_use]
    pub fn new(spirits: Vec<SpiritDefinition>) -> Self {
        Self(dedup_by_id(spirits, |s| s.id.as_str(), "spirit"))
    }

    /// Load spirits from a JSON array
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into spirit definitions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let spirits: Vec<SpiritDefinition> = serde_json::from_str(json)?;
        Ok(Self::new(spirits))
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&SpiritDefinition> {
        self.0.iter().find(|s| s.id == id)
    }

    /// Spirits of one tier, in catalog order.
    pub fn by_tier(&self, tier: ComplexityTier) -> impl Iterator<Item = &SpiritDefinition> {
        self.0.iter().filter(move |s| s.complexity == tier)
    }

    /// Spirits shipped in one set, in catalog order.
    pub fn by_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a SpiritDefinition> {
        self.0.iter().filter(move |s| s.source == source)
    }

    /// First spirit whose id contains `fragment`, ignoring case.
    #[must_use]
    pub fn resolve_fragment(&self, fragment: &str) -> Option<&SpiritDefinition> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.0
            .iter()
            .find(|s| s.id.to_lowercase().contains(&needle))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpiritDefinition> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a SpiritCatalog {
    type Item = &'a SpiritDefinition;
    type IntoIter = std::slice::Iter<'a, SpiritDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdversaryCatalog(pub Vec<AdversaryDefinition>);

impl AdversaryCatalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    #[must_use]
    pub fn new(adversaries: Vec<AdversaryDefinition>) -> Self {
        Self(dedup_by_id(adversaries, |a| a.id.as_str(), "adversary"))
    }

    /// Load adversaries from a JSON array
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into adversary definitions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let adversaries: Vec<AdversaryDefinition> = serde_json::from_str(json)?;
        Ok(Self::new(adversaries))
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&AdversaryDefinition> {
        self.0.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AdversaryDefinition> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a AdversaryCatalog {
    type Item = &'a AdversaryDefinition;
    type IntoIter = std::slice::Iter<'a, AdversaryDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
