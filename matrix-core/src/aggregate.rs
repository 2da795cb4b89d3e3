//! Aggregation engine
//!
//! Classifies artifacts into row/week buckets and derives the composite
//! VRAAK bars, the categorical tallies and the self-assessment means. All
//! functions are pure; "now" is a parameter so recency never reads a clock.

use plan_store::model::{Artifact, VraakScores};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const MS_PER_DAY: u64 = 86_400_000;

/// How many distinct kinds saturate the variety bar
const VARIETY_KIND_TARGET: f64 = 4.0;
/// How many distinct perspectives saturate the variety bar
const VARIETY_PERSPECTIVE_TARGET: f64 = 5.0;
/// Artifact count treated as "full" quantity for one row/aggregate
const QUANTITY_TARGET: f64 = 5.0;

// ============================================================================
// Subset selection
// ============================================================================

/// Which artifacts belong to a row or block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSelector {
    /// Artifacts whose outcome ids contain this id
    Outcome(String),
    /// Artifacts whose case ids contain this id
    Case(String),
    /// Artifacts whose knowledge ids contain this id
    Knowledge(String),
    /// Artifacts tagging any outcome of a collapsed block
    Block(Vec<String>),
}

impl RowSelector {
    fn matches(&self, artifact: &Artifact) -> bool {
        match self {
            Self::Outcome(id) => artifact.outcome_ids.iter().any(|o| o == id),
            Self::Case(id) => artifact.case_ids.iter().any(|c| c == id),
            Self::Knowledge(id) => artifact.knowledge_ids.iter().any(|k| k == id),
            Self::Block(ids) => ids.iter().any(|id| artifact.outcome_ids.contains(id)),
        }
    }
}

/// Artifacts matching a selector within the visible week range.
///
/// An artifact whose week is outside `visible_weeks` (including weeks the
/// calendar does not know) simply never joins a bucket.
pub fn select<'a>(
    artifacts: &'a [Artifact],
    visible_weeks: &[u32],
    selector: &RowSelector,
) -> Vec<&'a Artifact> {
    artifacts
        .iter()
        .filter(|a| visible_weeks.contains(&a.week) && selector.matches(a))
        .collect()
}

/// Same, restricted to one week column.
pub fn select_cell<'a>(
    artifacts: &'a [Artifact],
    week: u32,
    selector: &RowSelector,
) -> Vec<&'a Artifact> {
    artifacts
        .iter()
        .filter(|a| a.week == week && selector.matches(a))
        .collect()
}

// ============================================================================
// VRAAK bars
// ============================================================================

/// Which authenticity formula applies to an aggregate.
///
/// Row-level summaries take the plain mean; block-level summaries take the
/// best evidence per underlying sub-id and average those maxima, so one
/// strong artifact cannot mask untouched outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticityMode {
    RowMean,
    BlockMax(Vec<String>),
}

/// The five composite bars, each in [1, 5].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VraakBars {
    pub variety: f64,
    pub relevance: f64,
    pub authenticity: f64,
    pub topicality: f64,
    pub quantity: f64,
}

impl VraakBars {
    /// The floor state: shown for an empty subset instead of zeros.
    pub fn floor() -> Self {
        Self {
            variety: 1.0,
            relevance: 1.0,
            authenticity: 1.0,
            topicality: 1.0,
            quantity: 1.0,
        }
    }
}

fn clamp_bar(value: f64) -> f64 {
    value.clamp(1.0, 5.0)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

/// Recency score from elapsed days since creation. Fixed staleness buckets.
pub fn recency_score(created_at: u64, now_ms: u64) -> f64 {
    let days = now_ms.saturating_sub(created_at) / MS_PER_DAY;
    match days {
        0..=90 => 5.0,
        91..=180 => 4.0,
        181..=365 => 3.0,
        366..=540 => 2.0,
        _ => 1.0,
    }
}

/// Compute the composite VRAAK bars for an artifact subset.
///
/// The result is clamped to [1, 5] per bar regardless of what the stored
/// per-artifact scores contain.
pub fn vraak_bars(subset: &[&Artifact], mode: &AuthenticityMode, now_ms: u64) -> VraakBars {
    if subset.is_empty() {
        return VraakBars::floor();
    }

    let kinds: BTreeSet<_> = subset.iter().map(|a| a.kind).collect();
    let perspectives: BTreeSet<_> = subset
        .iter()
        .flat_map(|a| a.perspectives.iter().copied())
        .collect();
    let kind_part = (kinds.len() as f64 / VARIETY_KIND_TARGET).min(1.0);
    let perspective_part = (perspectives.len() as f64 / VARIETY_PERSPECTIVE_TARGET).min(1.0);
    let variety = 1.0 + 4.0 * (0.6 * kind_part + 0.4 * perspective_part);

    let relevance = mean(
        subset
            .iter()
            .map(|a| VraakScores::clamp_score(a.scores.relevance) as f64),
    )
    .unwrap_or(1.0);

    let authenticity = match mode {
        AuthenticityMode::RowMean => mean(
            subset
                .iter()
                .map(|a| VraakScores::clamp_score(a.scores.authenticity) as f64),
        )
        .unwrap_or(1.0),
        AuthenticityMode::BlockMax(sub_ids) => block_authenticity(subset, sub_ids),
    };

    let topicality = mean(subset.iter().map(|a| recency_score(a.created_at, now_ms)))
        .unwrap_or(1.0);

    let quantity = 1.0 + 4.0 * (subset.len() as f64 / QUANTITY_TARGET).min(1.0);

    VraakBars {
        variety: clamp_bar(variety),
        relevance: clamp_bar(relevance),
        authenticity: clamp_bar(authenticity),
        topicality: clamp_bar(topicality),
        quantity: clamp_bar(quantity),
    }
}

/// Per sub-id, the best authenticity among artifacts tagging it (default 1
/// when nothing tags it), then the average over sub-ids.
fn block_authenticity(subset: &[&Artifact], sub_ids: &[String]) -> f64 {
    if sub_ids.is_empty() {
        return 1.0;
    }
    let maxima = sub_ids.iter().map(|id| {
        subset
            .iter()
            .filter(|a| a.tags_id(id))
            .map(|a| VraakScores::clamp_score(a.scores.authenticity))
            .max()
            .unwrap_or(1) as f64
    });
    mean(maxima).unwrap_or(1.0)
}

// ============================================================================
// Categorical tallies
// ============================================================================

/// One tally row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterEntry {
    pub key: String,
    pub count: usize,
}

/// Frequency tables for the detail popovers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountersData {
    pub kinds: Vec<CounterEntry>,
    pub perspectives: Vec<CounterEntry>,
}

/// Count artifacts by kind and by perspective.
///
/// Caller-supplied known keys always appear, with an explicit zero when
/// unused, so the full vocabulary stays visible. An artifact without
/// perspectives counts once under the `none` sentinel; one with several
/// counts once per tag. Tables sort by descending count, ties by key.
pub fn counters(
    subset: &[&Artifact],
    known_kinds: &[&str],
    known_perspectives: &[&str],
) -> CountersData {
    let mut kinds: BTreeMap<String, usize> = known_kinds
        .iter()
        .map(|k| (k.to_string(), 0usize))
        .collect();
    let mut perspectives: BTreeMap<String, usize> = known_perspectives
        .iter()
        .map(|p| (p.to_string(), 0usize))
        .collect();

    for artifact in subset {
        *kinds.entry(artifact.kind.as_str().to_string()).or_insert(0) += 1;
        if artifact.perspectives.is_empty() {
            *perspectives
                .entry(plan_store::model::Perspective::NONE_KEY.to_string())
                .or_insert(0) += 1;
        } else {
            for p in &artifact.perspectives {
                *perspectives.entry(p.as_str().to_string()).or_insert(0) += 1;
            }
        }
    }

    CountersData {
        kinds: sorted_entries(kinds),
        perspectives: sorted_entries(perspectives),
    }
}

fn sorted_entries(table: BTreeMap<String, usize>) -> Vec<CounterEntry> {
    let mut entries: Vec<CounterEntry> = table
        .into_iter()
        .map(|(key, count)| CounterEntry { key, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    entries
}

// ============================================================================
// Self-assessment
// ============================================================================

/// Unweighted mean of a section's assessed levels; unassessed sub-ids count
/// as 1 rather than dropping out of the mean.
pub fn section_assessment(assessments: &BTreeMap<String, u8>, sub_ids: &[String]) -> f64 {
    mean(sub_ids.iter().map(|id| {
        assessments
            .get(id)
            .map(|level| (*level).clamp(1, 5))
            .unwrap_or(1) as f64
    }))
    .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_store::model::{ArtifactKind, Perspective};

    fn artifact(id: &str, week: u32) -> Artifact {
        Artifact {
            id: id.into(),
            week,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_subset_floors_every_bar() {
        let bars = vraak_bars(&[], &AuthenticityMode::RowMean, 0);
        assert_eq!(bars, VraakBars::floor());
    }

    #[test]
    fn test_quantity_saturates_at_target() {
        let now = 1_000;
        let arts: Vec<Artifact> = (0..7).map(|i| artifact(&format!("a{i}"), 1)).collect();
        let refs: Vec<&Artifact> = arts.iter().collect();

        let full = vraak_bars(&refs[..5], &AuthenticityMode::RowMean, now);
        assert_eq!(full.quantity, 5.0);
        let over = vraak_bars(&refs, &AuthenticityMode::RowMean, now);
        assert_eq!(over.quantity, 5.0);

        let two = vraak_bars(&refs[..2], &AuthenticityMode::RowMean, now);
        assert!((two.quantity - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_variety_weights_kinds_over_perspectives() {
        let mut a = artifact("a1", 1);
        a.kind = ArtifactKind::Document;
        a.perspectives = vec![Perspective::Teacher];
        let mut b = artifact("a2", 1);
        b.kind = ArtifactKind::Reflection;
        b.perspectives = vec![Perspective::Peer];

        let bars = vraak_bars(&[&a, &b], &AuthenticityMode::RowMean, 0);
        // 2 kinds of 4, 2 perspectives of 5: 1 + 4*(0.6*0.5 + 0.4*0.4)
        assert!((bars.variety - 2.84).abs() < 1e-9);
    }

    #[test]
    fn test_variety_saturation() {
        let kinds = [
            ArtifactKind::Document,
            ArtifactKind::Presentation,
            ArtifactKind::Assessment,
            ArtifactKind::Reflection,
        ];
        let persps = [
            Perspective::SelfReflection,
            Perspective::Teacher,
            Perspective::Peer,
            Perspective::Supervisor,
            Perspective::Client,
        ];
        let arts: Vec<Artifact> = (0..5)
            .map(|i| {
                let mut a = artifact(&format!("a{i}"), 1);
                a.kind = kinds[i.min(3)];
                a.perspectives = vec![persps[i]];
                a
            })
            .collect();
        let refs: Vec<&Artifact> = arts.iter().collect();
        let bars = vraak_bars(&refs, &AuthenticityMode::RowMean, 0);
        assert_eq!(bars.variety, 5.0);
    }

    #[test]
    fn test_block_authenticity_averages_per_sub_id_maxima() {
        let mut strong = artifact("a1", 1);
        strong.outcome_ids = vec!["luk-a".into()];
        strong.scores.authenticity = 5;

        let sub_ids = vec!["luk-a".to_string(), "luk-b".to_string()];
        let bars = vraak_bars(
            &[&strong],
            &AuthenticityMode::BlockMax(sub_ids),
            0,
        );
        // luk-a max 5, luk-b untagged defaults to 1 -> mean 3
        assert!((bars.authenticity - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_mean_authenticity_and_corrupt_score_clamping() {
        let mut a = artifact("a1", 1);
        a.scores.authenticity = 9; // corrupted upstream
        let mut b = artifact("a2", 1);
        b.scores.authenticity = 3;

        let bars = vraak_bars(&[&a, &b], &AuthenticityMode::RowMean, 0);
        assert!((bars.authenticity - 4.0).abs() < 1e-9); // (5 + 3) / 2
    }

    #[test]
    fn test_recency_buckets() {
        let day = MS_PER_DAY;
        let now = 600 * day;
        assert_eq!(recency_score(now - 10 * day, now), 5.0);
        assert_eq!(recency_score(now - 90 * day, now), 5.0);
        assert_eq!(recency_score(now - 91 * day, now), 4.0);
        assert_eq!(recency_score(now - 180 * day, now), 4.0);
        assert_eq!(recency_score(now - 365 * day, now), 3.0);
        assert_eq!(recency_score(now - 366 * day, now), 2.0);
        assert_eq!(recency_score(now - 541 * day, now), 1.0);
        // creation in the future is simply "fresh"
        assert_eq!(recency_score(now + day, now), 5.0);
    }

    #[test]
    fn test_counters_include_known_zero_keys() {
        let mut a = artifact("a1", 1);
        a.kind = ArtifactKind::Document;
        let data = counters(&[&a, &a.clone()], &["document", "recording"], &[]);

        let kind_pairs: Vec<(&str, usize)> = data
            .kinds
            .iter()
            .map(|e| (e.key.as_str(), e.count))
            .collect();
        assert_eq!(kind_pairs, vec![("document", 2), ("recording", 0)]);
    }

    #[test]
    fn test_counters_perspective_sentinel_and_multi_tag() {
        let mut tagged = artifact("a1", 1);
        tagged.perspectives = vec![Perspective::Teacher, Perspective::Peer];
        let untagged = artifact("a2", 1);

        let data = counters(&[&tagged, &untagged], &[], &[]);
        let pairs: Vec<(&str, usize)> = data
            .perspectives
            .iter()
            .map(|e| (e.key.as_str(), e.count))
            .collect();
        // ties broken by ascending key
        assert_eq!(pairs, vec![("none", 1), ("peer", 1), ("teacher", 1)]);
    }

    #[test]
    fn test_select_respects_visibility_and_row_type() {
        let mut on_row = artifact("a1", 5);
        on_row.outcome_ids = vec!["luk-1".into()];
        let mut off_week = artifact("a2", 40);
        off_week.outcome_ids = vec!["luk-1".into()];
        let mut other_row = artifact("a3", 5);
        other_row.case_ids = vec!["luk-1".into()]; // same id, wrong set

        let arts = vec![on_row, off_week, other_row];
        let visible = vec![4, 5, 6];

        let outcome = select(&arts, &visible, &RowSelector::Outcome("luk-1".into()));
        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome[0].id, "a1");

        let case = select(&arts, &visible, &RowSelector::Case("luk-1".into()));
        assert_eq!(case.len(), 1);
        assert_eq!(case[0].id, "a3");

        let block = select(
            &arts,
            &visible,
            &RowSelector::Block(vec!["luk-0".into(), "luk-1".into()]),
        );
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn test_section_assessment_defaults_unassessed_to_one() {
        let mut assessments = BTreeMap::new();
        assessments.insert("luk-1".to_string(), 5u8);

        let ids = vec!["luk-1".to_string(), "luk-2".to_string()];
        assert!((section_assessment(&assessments, &ids) - 3.0).abs() < 1e-9);
        assert_eq!(section_assessment(&assessments, &[]), 1.0);
    }
}
