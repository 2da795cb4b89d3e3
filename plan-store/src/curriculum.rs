//! Curriculum catalog and year calendars
//!
//! The curriculum provider supplies, per academic year, the outcome blocks
//! (EVL) with their outcomes, the courses with case topics, knowledge
//! domains and per-course exclusion overrides, and the week calendar. All of
//! it is read-mostly reference data under two fixed store keys, keyed by
//! academic year label.

use crate::store::{KeyValueStore, KeyValueStoreExt, CURRICULUM_KEY, YEARS_KEY};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An id/name catalog entry (outcome, case topic or knowledge domain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
}

/// A top-level learning-outcome block grouping several outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EvlBlock {
    pub id: String,
    pub name: String,
    pub outcomes: Vec<CatalogItem>,
}

/// A course with its case topics, knowledge domains and outcome exclusions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub cases: Vec<CatalogItem>,
    pub knowledge_domains: Vec<CatalogItem>,
    /// Block id -> outcome ids this course excludes from that block.
    /// A block without an entry keeps all its outcomes.
    pub evl_overrides: BTreeMap<String, Vec<String>>,
}

/// One academic year's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Curriculum {
    pub blocks: Vec<EvlBlock>,
    pub courses: Vec<Course>,
}

impl Curriculum {
    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }
}

/// One calendar week of an academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WeekInfo {
    pub week: u32,
    /// Period-coding label, e.g. "2.1" marks the first week of quarter 2
    pub code: Option<String>,
    /// "zero" marks transitional weeks that carry no teaching
    pub kind: Option<String>,
    pub is_holiday: bool,
    pub holiday_label: Option<String>,
    pub start_iso: String,
    pub end_iso: Option<String>,
}

impl WeekInfo {
    /// Transitional weeks are dropped before quarter/semester resolution
    pub fn is_zero(&self) -> bool {
        self.kind.as_deref() == Some("zero")
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    /// Calendar range label for column headers, e.g. "1 Sep – 5 Sep".
    /// Falls back to the raw ISO strings when a date does not parse.
    pub fn date_range_label(&self) -> String {
        let start = parse_day_label(&self.start_iso);
        match self.end_iso.as_deref() {
            Some(end_iso) => format!("{} – {}", start, parse_day_label(end_iso)),
            None => start,
        }
    }
}

fn parse_day_label(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(date) => date.format("%-d %b").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Week calendar for one academic year, ascending by week number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct YearCalendar {
    pub weeks: Vec<WeekInfo>,
}

impl YearCalendar {
    pub fn week(&self, number: u32) -> Option<&WeekInfo> {
        self.weeks.iter().find(|w| w.week == number)
    }
}

/// Read access to the per-year catalogs and calendars.
#[derive(Clone)]
pub struct CurriculumProvider {
    store: Arc<dyn KeyValueStore>,
}

impl CurriculumProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Catalog for a year; empty when the year is unknown. An empty catalog
    /// renders as empty sections, never as an error.
    pub fn curriculum_for_year(&self, year: &str) -> Curriculum {
        let all: BTreeMap<String, Curriculum> = self.store.read(CURRICULUM_KEY, BTreeMap::new());
        all.get(year).cloned().unwrap_or_default()
    }

    /// Week calendar for a year; empty when the year is unknown.
    pub fn year_calendar(&self, year: &str) -> YearCalendar {
        let all: BTreeMap<String, YearCalendar> = self.store.read(YEARS_KEY, BTreeMap::new());
        all.get(year).cloned().unwrap_or_default()
    }
}
