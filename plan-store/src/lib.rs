//! plan-store - Client-Side Persistence for Portfolio Plans
//!
//! Domain records and the persistence collaborators for the portfolio week
//! matrix: a synchronous key -> JSON-document store capability, the plan
//! collection with its read-modify-write operations, the per-year curriculum
//! catalog and week calendars, the UI-preference blob and the backup
//! round-trip document.
//!
//! # Design
//!
//! - **Fail-soft reads.** Corrupt or missing persisted data falls back to a
//!   caller default; nothing above this crate ever sees a parse error from
//!   routine storage access.
//! - **Full-collection replace.** There is no partial update API; every
//!   mutation rewrites the whole plan list. Last write wins, single writer
//!   per browser tab assumed.
//! - **Fully-defaulted records.** Artifacts and plans decode with total
//!   fields (kind defaults to `other`, lists default to empty), so the
//!   aggregation engine drops defensive fallbacks at read time.

// Domain records
pub mod model;

// Storage capability and fixed keys
pub mod store;

// Plan collection operations
pub mod plans;

// Curriculum catalog and year calendars
pub mod curriculum;

// Persisted UI preferences
pub mod prefs;

// Backup/restore documents
pub mod backup;

// Error types
pub mod error;

// Re-export domain records
pub use model::{Artifact, ArtifactKind, Period, Perspective, PortfolioPlan, VraakScores};

// Re-export storage surface
pub use store::{
    KeyValueStore, KeyValueStoreExt, MemoryStore, CURRICULUM_KEY, PLANS_KEY, PREFS_KEY, YEARS_KEY,
};

// Re-export collaborators
pub use backup::{export, export_json, import, import_json, BackupDocument, ImportSummary};
pub use curriculum::{
    CatalogItem, Course, Curriculum, CurriculumProvider, EvlBlock, WeekInfo, YearCalendar,
};
pub use plans::PlanStore;
pub use prefs::{Density, FilterMode, UiPrefs};

// Re-export error types
pub use error::{Result, StoreError};
