//! Artifact filtering
//!
//! Two independent multi-select sets (kinds, perspectives) with AND
//! semantics across non-empty categories, plus a dim/hide rendering mode.
//! Cross-filtering restricts the selectable options to combinations that can
//! still match, without ever clearing what the user already picked.

use plan_store::model::{Artifact, ArtifactKind, Perspective};
use plan_store::prefs::{FilterMode, UiPrefs};
use std::collections::BTreeSet;

/// The active filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub kinds: BTreeSet<ArtifactKind>,
    pub perspectives: BTreeSet<Perspective>,
    pub mode: FilterMode,
}

impl FilterState {
    /// Rebuild from the persisted preference blob. Unknown keys (from a
    /// newer app version) are skipped, not errors.
    pub fn from_prefs(prefs: &UiPrefs) -> Self {
        Self {
            kinds: prefs
                .filter_kinds
                .iter()
                .filter_map(|k| ArtifactKind::parse(k))
                .collect(),
            perspectives: prefs
                .filter_perspectives
                .iter()
                .filter_map(|p| Perspective::parse(p))
                .collect(),
            mode: prefs.filter_mode,
        }
    }

    /// Write the selection back onto a preference blob.
    pub fn apply_to_prefs(&self, prefs: &mut UiPrefs) {
        prefs.filter_kinds = self.kinds.iter().map(|k| k.as_str().to_string()).collect();
        prefs.filter_perspectives = self
            .perspectives
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        prefs.filter_mode = self.mode;
    }

    /// Both sets empty means the filter is inactive and everything matches.
    pub fn is_active(&self) -> bool {
        !self.kinds.is_empty() || !self.perspectives.is_empty()
    }

    /// AND across categories: with both sets non-empty an artifact must
    /// match a selected kind AND a selected perspective.
    pub fn matches(&self, artifact: &Artifact) -> bool {
        let kind_ok = self.kinds.is_empty() || self.kinds.contains(&artifact.kind);
        let perspective_ok = self.perspectives.is_empty()
            || artifact
                .perspectives
                .iter()
                .any(|p| self.perspectives.contains(p));
        kind_ok && perspective_ok
    }

    /// Whether the artifact stays in layout. Dim mode keeps everything.
    pub fn keeps_in_layout(&self, artifact: &Artifact) -> bool {
        self.mode == FilterMode::Dim || self.matches(artifact)
    }

    /// Whether the artifact renders at reduced opacity.
    pub fn dims(&self, artifact: &Artifact) -> bool {
        self.mode == FilterMode::Dim && self.is_active() && !self.matches(artifact)
    }

    /// Kinds still reachable under the current perspective selection alone.
    /// Drives the option list; an already-selected but unreachable kind is
    /// marked unavailable by the caller, never removed here.
    pub fn available_kinds(&self, artifacts: &[Artifact]) -> BTreeSet<ArtifactKind> {
        artifacts
            .iter()
            .filter(|a| {
                self.perspectives.is_empty()
                    || a.perspectives.iter().any(|p| self.perspectives.contains(p))
            })
            .map(|a| a.kind)
            .collect()
    }

    /// Perspectives still reachable under the current kind selection alone.
    pub fn available_perspectives(&self, artifacts: &[Artifact]) -> BTreeSet<Perspective> {
        artifacts
            .iter()
            .filter(|a| self.kinds.is_empty() || self.kinds.contains(&a.kind))
            .flat_map(|a| a.perspectives.iter().copied())
            .collect()
    }

    pub fn toggle_kind(&mut self, kind: ArtifactKind) {
        if !self.kinds.remove(&kind) {
            self.kinds.insert(kind);
        }
    }

    pub fn toggle_perspective(&mut self, perspective: Perspective) {
        if !self.perspectives.remove(&perspective) {
            self.perspectives.insert(perspective);
        }
    }

    pub fn clear(&mut self) {
        self.kinds.clear();
        self.perspectives.clear();
    }
}
