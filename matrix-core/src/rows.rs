//! Row model derivation
//!
//! Rows are regenerated from curriculum + course on every render and never
//! persisted. Outcome rows group under their EVL block with the course's
//! exclusion overrides applied; case and knowledge rows come straight from
//! the course.

use plan_store::curriculum::{Course, Curriculum};
use serde::Serialize;

/// A single matrix row (outcome, case topic or knowledge domain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    pub name: String,
}

/// An EVL block with its surviving outcome rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeBlock {
    pub id: String,
    pub name: String,
    pub outcomes: Vec<Row>,
}

impl OutcomeBlock {
    /// Outcome ids of this block, for block-level aggregation.
    pub fn outcome_ids(&self) -> Vec<String> {
        self.outcomes.iter().map(|r| r.id.clone()).collect()
    }
}

/// The complete derived row set for one plan rendering session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RowModel {
    pub outcome_blocks: Vec<OutcomeBlock>,
    pub case_rows: Vec<Row>,
    pub knowledge_rows: Vec<Row>,
}

impl RowModel {
    /// Total number of leaf rows across all sections.
    pub fn row_count(&self) -> usize {
        self.outcome_blocks
            .iter()
            .map(|b| b.outcomes.len())
            .sum::<usize>()
            + self.case_rows.len()
            + self.knowledge_rows.len()
    }

    pub fn block(&self, block_id: &str) -> Option<&OutcomeBlock> {
        self.outcome_blocks.iter().find(|b| b.id == block_id)
    }
}

/// Build the matrix rows for a curriculum and an optional resolved course.
///
/// A missing course degenerates to empty case/knowledge sections; the EVL
/// blocks still render from the year catalog, unfiltered. Ordering is
/// stable: blocks and outcomes as declared in the curriculum, cases and
/// knowledge domains as declared by the course.
pub fn build_rows(curriculum: &Curriculum, course: Option<&Course>) -> RowModel {
    let outcome_blocks = curriculum
        .blocks
        .iter()
        .map(|block| {
            let excluded: &[String] = course
                .and_then(|c| c.evl_overrides.get(&block.id))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            OutcomeBlock {
                id: block.id.clone(),
                name: block.name.clone(),
                outcomes: block
                    .outcomes
                    .iter()
                    .filter(|o| !excluded.contains(&o.id))
                    .map(|o| Row {
                        id: o.id.clone(),
                        name: o.name.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    let catalog_rows = |items: &[plan_store::curriculum::CatalogItem]| {
        items
            .iter()
            .map(|i| Row {
                id: i.id.clone(),
                name: i.name.clone(),
            })
            .collect::<Vec<_>>()
    };

    RowModel {
        outcome_blocks,
        case_rows: course.map(|c| catalog_rows(&c.cases)).unwrap_or_default(),
        knowledge_rows: course
            .map(|c| catalog_rows(&c.knowledge_domains))
            .unwrap_or_default(),
    }
}
