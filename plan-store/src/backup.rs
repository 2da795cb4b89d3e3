//! Backup and restore documents
//!
//! A backup is one JSON document with a `plans` list plus optional
//! `curriculum` and `years` catalogs. Plan and artifact shapes round-trip
//! losslessly; unknown fields are ignored and missing optional sections are
//! allowed, so documents from newer app versions still import.

use crate::curriculum::{Curriculum, YearCalendar};
use crate::error::{Result, StoreError};
use crate::model::PortfolioPlan;
use crate::store::{KeyValueStore, KeyValueStoreExt, CURRICULUM_KEY, PLANS_KEY, YEARS_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The backup file shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupDocument {
    pub plans: Vec<PortfolioPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curriculum: Option<BTreeMap<String, Curriculum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<BTreeMap<String, YearCalendar>>,
}

/// What an import wrote, for the confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub plan_count: usize,
    pub curriculum_years: usize,
    pub calendar_years: usize,
}

/// Snapshot the store into a backup document.
pub fn export(store: &dyn KeyValueStore) -> BackupDocument {
    let curriculum: BTreeMap<String, Curriculum> = store.read(CURRICULUM_KEY, BTreeMap::new());
    let years: BTreeMap<String, YearCalendar> = store.read(YEARS_KEY, BTreeMap::new());
    BackupDocument {
        plans: store.read(PLANS_KEY, Vec::new()),
        curriculum: (!curriculum.is_empty()).then_some(curriculum),
        years: (!years.is_empty()).then_some(years),
    }
}

/// Serialize a backup document for download.
pub fn export_json(store: &dyn KeyValueStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export(store))?)
}

/// Restore a backup document into the store, replacing the plan collection
/// and any catalog sections the document carries.
pub fn import(store: &dyn KeyValueStore, doc: &BackupDocument) -> ImportSummary {
    store.write(PLANS_KEY, &doc.plans);
    if let Some(curriculum) = &doc.curriculum {
        store.write(CURRICULUM_KEY, curriculum);
    }
    if let Some(years) = &doc.years {
        store.write(YEARS_KEY, years);
    }
    tracing::debug!(plans = doc.plans.len(), "backup imported");
    ImportSummary {
        plan_count: doc.plans.len(),
        curriculum_years: doc.curriculum.as_ref().map_or(0, BTreeMap::len),
        calendar_years: doc.years.as_ref().map_or(0, BTreeMap::len),
    }
}

/// Parse and restore a backup file. This is the one place a storage-shaped
/// error reaches the user: they handed us the document themselves.
pub fn import_json(store: &dyn KeyValueStore, json: &str) -> Result<ImportSummary> {
    let doc: BackupDocument = serde_json::from_str(json)
        .map_err(|err| StoreError::MalformedBackup(err.to_string()))?;
    Ok(import(store, &doc))
}
