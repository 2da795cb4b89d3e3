//! matrix-core - Week-Matrix Aggregation and Interaction Engine
//!
//! The engine behind the portfolio week matrix: resolves a plan's period to
//! its visible weeks, derives the matrix rows from the curriculum, buckets
//! artifacts per row/week, computes the composite VRAAK quality bars and
//! categorical tallies, and owns the interactive grid state (expand/collapse,
//! density, filter, drag-and-drop, popover geometry).
//!
//! Everything computational is a pure function; the one stateful type is
//! [`MatrixSession`], which mutates the persisted plan collection through
//! the injected store capability and mirrors every write onto its in-memory
//! plan for immediate visual feedback.

// Period resolution
pub mod period;

// Row model derivation
pub mod rows;

// Aggregation engine
pub mod aggregate;

// Score color scale
pub mod color;

// Artifact filtering
pub mod filter;

// Layout budgets and popover geometry
pub mod layout;

// Session state machine
pub mod session;

// Re-export the engine surface
pub use aggregate::{
    counters, recency_score, section_assessment, select, select_cell, vraak_bars,
    AuthenticityMode, CounterEntry, CountersData, RowSelector, VraakBars,
};
pub use color::{fill_percent, score_color, score_hue};
pub use filter::FilterState;
pub use layout::{
    correct_above, density_budget, fit_week_width, place_popover, DensityBudget, Placement, Rect,
    Side, Size, MAX_FIT_WEEK_WIDTH,
};
pub use period::resolve_weeks;
pub use rows::{build_rows, OutcomeBlock, Row, RowModel};
pub use session::{
    DragState, MatrixSession, ScrollSync, SessionStats, SliderState, WeekHeader, CASES_SECTION,
    KNOWLEDGE_SECTION, PAN_THRESHOLD_PX,
};

// Re-export the records the engine operates on
pub use plan_store::model::{Artifact, ArtifactKind, Period, Perspective, PortfolioPlan};
pub use plan_store::prefs::{Density, FilterMode};
