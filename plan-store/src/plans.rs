//! Plan collection operations
//!
//! The persisted plan list has full-collection replace semantics: every
//! mutation reads the whole list, changes the one relevant entry and writes
//! the whole list back. This keeps unrelated entries intact under the
//! single-writer-per-tab assumption; it is not transactional across tabs.

use crate::model::PortfolioPlan;
use crate::store::{KeyValueStore, KeyValueStoreExt, PLANS_KEY};
use std::sync::Arc;

/// Read-modify-write access to the persisted plan collection.
#[derive(Clone)]
pub struct PlanStore {
    store: Arc<dyn KeyValueStore>,
}

impl PlanStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All persisted plans; an empty list when nothing (usable) is stored.
    pub fn plans(&self) -> Vec<PortfolioPlan> {
        self.store.read(PLANS_KEY, Vec::new())
    }

    /// Replace the whole collection.
    pub fn save_plans(&self, plans: &[PortfolioPlan]) {
        self.store.write(PLANS_KEY, &plans);
    }

    /// Look up a plan by id.
    pub fn find(&self, plan_id: &str) -> Option<PortfolioPlan> {
        self.plans().into_iter().find(|p| p.id == plan_id)
    }

    /// Insert or replace one plan, keyed by id.
    pub fn upsert(&self, plan: PortfolioPlan) {
        let mut plans = self.plans();
        match plans.iter_mut().find(|p| p.id == plan.id) {
            Some(slot) => *slot = plan,
            None => plans.push(plan),
        }
        self.save_plans(&plans);
    }

    /// Toggle the favorite flag. No-op when the plan does not exist.
    pub fn set_favorite(&self, plan_id: &str, favorite: bool, now_ms: u64) -> bool {
        self.mutate(plan_id, |plan| {
            plan.favorite = favorite;
            plan.touch(now_ms);
        })
    }

    /// Move one artifact to another week and refresh its update timestamp.
    ///
    /// Returns false (silent no-op) when the plan or artifact is gone at
    /// drop time; the drop target always derives from rendered data, so a
    /// miss means a stale render, not a user-facing failure.
    pub fn move_artifact_week(
        &self,
        plan_id: &str,
        artifact_id: &str,
        target_week: u32,
        now_ms: u64,
    ) -> bool {
        let mut plans = self.plans();
        let Some(plan) = plans.iter_mut().find(|p| p.id == plan_id) else {
            tracing::debug!(plan_id, "move target plan missing, skipping");
            return false;
        };
        let Some(artifact) = plan.artifact_mut(artifact_id) else {
            tracing::debug!(plan_id, artifact_id, "move target artifact missing, skipping");
            return false;
        };
        artifact.week = target_week;
        artifact.updated_at = now_ms;
        plan.touch(now_ms);
        self.save_plans(&plans);
        true
    }

    /// Write one self-assessment level (clamped to 1..=5).
    pub fn set_assessment(&self, plan_id: &str, category_id: &str, level: u8, now_ms: u64) -> bool {
        let level = level.clamp(1, 5);
        self.mutate(plan_id, |plan| {
            plan.assessments.insert(category_id.to_string(), level);
            plan.touch(now_ms);
        })
    }

    /// Clear every listed category from the assessment map in one write.
    pub fn reset_assessments(&self, plan_id: &str, category_ids: &[String], now_ms: u64) -> bool {
        self.mutate(plan_id, |plan| {
            for id in category_ids {
                plan.assessments.remove(id);
            }
            plan.touch(now_ms);
        })
    }

    fn mutate(&self, plan_id: &str, apply: impl FnOnce(&mut PortfolioPlan)) -> bool {
        let mut plans = self.plans();
        let Some(plan) = plans.iter_mut().find(|p| p.id == plan_id) else {
            tracing::debug!(plan_id, "plan missing, mutation skipped");
            return false;
        };
        apply(plan);
        self.save_plans(&plans);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Artifact;
    use crate::store::MemoryStore;

    fn store_with_plan() -> (PlanStore, PortfolioPlan) {
        let plan = PortfolioPlan {
            id: "p1".into(),
            name: "Year 2 portfolio".into(),
            artifacts: vec![Artifact {
                id: "a1".into(),
                week: 7,
                ..Default::default()
            }],
            ..Default::default()
        };
        let plans = PlanStore::new(Arc::new(MemoryStore::new()));
        plans.upsert(plan.clone());
        (plans, plan)
    }

    #[test]
    fn test_move_artifact_week() {
        let (plans, _) = store_with_plan();
        assert!(plans.move_artifact_week("p1", "a1", 9, 1000));

        let stored = plans.find("p1").unwrap();
        assert_eq!(stored.artifact("a1").unwrap().week, 9);
        assert_eq!(stored.artifact("a1").unwrap().updated_at, 1000);
        assert_eq!(stored.updated_at, 1000);
    }

    #[test]
    fn test_move_missing_artifact_is_silent_noop() {
        let (plans, before) = store_with_plan();
        assert!(!plans.move_artifact_week("p1", "ghost", 9, 1000));
        assert!(!plans.move_artifact_week("ghost", "a1", 9, 1000));
        assert_eq!(plans.find("p1").unwrap(), before);
    }

    #[test]
    fn test_same_week_move_still_touches_timestamp() {
        let (plans, _) = store_with_plan();
        assert!(plans.move_artifact_week("p1", "a1", 7, 2000));
        let artifact = plans.find("p1").unwrap().artifact("a1").cloned().unwrap();
        assert_eq!(artifact.week, 7);
        assert_eq!(artifact.updated_at, 2000);
    }

    #[test]
    fn test_assessment_write_and_atomic_reset() {
        let (plans, _) = store_with_plan();
        assert!(plans.set_assessment("p1", "luk-1", 4, 10));
        assert!(plans.set_assessment("p1", "luk-2", 9, 11)); // clamped
        let stored = plans.find("p1").unwrap();
        assert_eq!(stored.assessments.get("luk-1"), Some(&4));
        assert_eq!(stored.assessments.get("luk-2"), Some(&5));

        assert!(plans.reset_assessments("p1", &["luk-1".into(), "luk-2".into()], 12));
        assert!(plans.find("p1").unwrap().assessments.is_empty());
    }

    #[test]
    fn test_favorite_toggle() {
        let (plans, _) = store_with_plan();
        assert!(plans.set_favorite("p1", true, 500));
        let stored = plans.find("p1").unwrap();
        assert!(stored.favorite);
        assert_eq!(stored.updated_at, 500);

        assert!(!plans.set_favorite("ghost", true, 501));
    }

    #[test]
    fn test_corrupt_collection_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.put_raw(PLANS_KEY, "][ nonsense");
        let plans = PlanStore::new(store);
        assert!(plans.plans().is_empty());
    }
}
