//! Plan and artifact records
//!
//! These types use camelCase serialization for the JS host page.
//! Every field is defaulted so that records written by older versions of the
//! app keep parsing; the aggregation engine can then assume total fields and
//! never needs read-time fallbacks.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Fixed vocabularies
// ============================================================================

/// Kind of evidence an artifact represents.
///
/// Unknown or missing kinds collapse to `Other` at parse time, so the
/// engine never sees an empty kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Document,
    Presentation,
    Assessment,
    Reflection,
    Recording,
    Other,
}

impl ArtifactKind {
    /// All known kinds, in display order
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::Document,
        ArtifactKind::Presentation,
        ArtifactKind::Assessment,
        ArtifactKind::Reflection,
        ArtifactKind::Recording,
        ArtifactKind::Other,
    ];

    /// String representation (tally key, filter key)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Presentation => "presentation",
            Self::Assessment => "assessment",
            Self::Reflection => "reflection",
            Self::Recording => "recording",
            Self::Other => "other",
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "document" => Some(Self::Document),
            "presentation" => Some(Self::Presentation),
            "assessment" => Some(Self::Assessment),
            "reflection" => Some(Self::Reflection),
            "recording" => Some(Self::Recording),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl Default for ArtifactKind {
    fn default() -> Self {
        Self::Other
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for ArtifactKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s).unwrap_or(Self::Other))
    }
}

/// Perspective a piece of evidence was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Perspective {
    SelfReflection,
    Teacher,
    Peer,
    PeerGroup,
    Supervisor,
    Client,
    Other,
}

impl Perspective {
    /// All known perspectives, in display order
    pub const ALL: [Perspective; 7] = [
        Perspective::SelfReflection,
        Perspective::Teacher,
        Perspective::Peer,
        Perspective::PeerGroup,
        Perspective::Supervisor,
        Perspective::Client,
        Perspective::Other,
    ];

    /// Tally key for an artifact carrying no perspective at all
    pub const NONE_KEY: &'static str = "none";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfReflection => "self-reflection",
            Self::Teacher => "teacher",
            Self::Peer => "peer",
            Self::PeerGroup => "peer-group",
            Self::Supervisor => "supervisor",
            Self::Client => "client",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "self-reflection" => Some(Self::SelfReflection),
            "teacher" => Some(Self::Teacher),
            "peer" => Some(Self::Peer),
            "peer-group" => Some(Self::PeerGroup),
            "supervisor" => Some(Self::Supervisor),
            "client" => Some(Self::Client),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Perspective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Perspective {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s).unwrap_or(Self::Other))
    }
}

// ============================================================================
// Scores
// ============================================================================

/// Per-artifact VRAAK score record.
///
/// Five slots for form symmetry, but only relevance, authenticity,
/// topicality and quantity carry independent meaning at the artifact level;
/// variety is an emergent property of a whole row/plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VraakScores {
    pub variety: u8,
    pub relevance: u8,
    pub authenticity: u8,
    pub topicality: u8,
    pub quantity: u8,
}

impl VraakScores {
    /// Clamp a single stored score into the 1..=5 band. The aggregation
    /// engine applies this at read time, so corrupted stored values never
    /// leak into a composite bar.
    pub fn clamp_score(v: u8) -> u8 {
        v.clamp(1, 5)
    }
}

impl Default for VraakScores {
    fn default() -> Self {
        Self {
            variety: 3,
            relevance: 3,
            authenticity: 3,
            topicality: 3,
            quantity: 3,
        }
    }
}

// ============================================================================
// Artifact
// ============================================================================

/// A single piece of learning evidence placed on the week matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    /// 1-based week number; the only field mutated by drag-and-drop.
    /// A week outside the year calendar never joins a visible bucket.
    pub week: u32,
    pub outcome_ids: Vec<String>,
    pub case_ids: Vec<String>,
    pub knowledge_ids: Vec<String>,
    pub kind: ArtifactKind,
    pub perspectives: Vec<Perspective>,
    pub scores: VraakScores,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Artifact {
    /// Whether this artifact is tagged with the given category id, in any of
    /// its three id sets (outcome, case, knowledge).
    pub fn tags_id(&self, id: &str) -> bool {
        self.outcome_ids.iter().any(|o| o == id)
            || self.case_ids.iter().any(|c| c == id)
            || self.knowledge_ids.iter().any(|k| k == id)
    }

}

impl Default for Artifact {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            week: 1,
            outcome_ids: Vec::new(),
            case_ids: Vec::new(),
            knowledge_ids: Vec::new(),
            kind: ArtifactKind::Other,
            perspectives: Vec::new(),
            scores: VraakScores::default(),
            created_at: 0,
            updated_at: 0,
        }
    }
}

// ============================================================================
// Period
// ============================================================================

/// A plan's scope window on the year calendar.
///
/// `FullYear` stands in for an absent or unrecognizable specification; the
/// period resolver maps it to every week of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Period {
    Quarter(u8),
    Semester(u8),
    /// Inclusive [start, end] week-number pair, kept in the order given
    Custom([u32; 2]),
    FullYear,
}

impl Default for Period {
    fn default() -> Self {
        Self::FullYear
    }
}

impl Period {
    /// Tolerant decode from an arbitrary JSON value.
    ///
    /// Anything that isn't a well-formed quarter/semester/custom tag comes
    /// back as `FullYear` rather than an error, so one bad plan record can
    /// never break the whole collection.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let tag = value.get("type").and_then(|t| t.as_str()).unwrap_or("");
        match tag {
            "quarter" => value
                .get("value")
                .and_then(|v| v.as_u64())
                .map(|n| Period::Quarter(n.min(u8::MAX as u64) as u8))
                .unwrap_or(Period::FullYear),
            "semester" => value
                .get("value")
                .and_then(|v| v.as_u64())
                .map(|n| Period::Semester(n.min(u8::MAX as u64) as u8))
                .unwrap_or(Period::FullYear),
            "custom" => {
                let pair = value.get("value").and_then(|v| v.as_array());
                match pair {
                    Some(items) if items.len() == 2 => {
                        let start = items[0].as_u64();
                        let end = items[1].as_u64();
                        match (start, end) {
                            (Some(s), Some(e)) => Period::Custom([s as u32, e as u32]),
                            _ => Period::FullYear,
                        }
                    }
                    _ => Period::FullYear,
                }
            }
            "fullYear" | "fullyear" => Period::FullYear,
            _ => Period::FullYear,
        }
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Period::from_value(&value))
    }
}

// ============================================================================
// Plan
// ============================================================================

/// A named collection of artifacts against one course and one period window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioPlan {
    pub id: String,
    pub name: String,
    /// Academic year label, e.g. "2025-2026"
    pub year: String,
    pub course_id: String,
    /// Denormalized course name for list screens
    pub course_name: String,
    pub period: Period,
    /// Category id (outcome/case/knowledge) -> self-assessed mastery 1..=5
    pub assessments: BTreeMap<String, u8>,
    /// Insertion order, not display order
    pub artifacts: Vec<Artifact>,
    pub created_at: u64,
    pub updated_at: u64,
    pub favorite: bool,
}

impl PortfolioPlan {
    pub fn artifact(&self, id: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    pub fn artifact_mut(&mut self, id: &str) -> Option<&mut Artifact> {
        self.artifacts.iter_mut().find(|a| a.id == id)
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self, now_ms: u64) {
        self.updated_at = now_ms;
    }
}
