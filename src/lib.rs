//! # Dashdeck Core
//!
//! Domain engines for the Dashdeck admin dashboard.
//!
//! This crate holds the data side of the dashboard: the user directory with
//! search, role filter and stable sort; the kanban board with card moves; the
//! month calendar with its per-day event index; overview metrics; and a
//! single [`Session`] container updated through [`Action`]s. It has no
//! dependency on any particular UI.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod seed;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use domain::{
    board::{Board, DragSession, Lane, LaneId},
    calendar::{Calendar, Event, EventDraft, MonthCursor, MonthGrid},
    card::{Card, CardDraft, CardId, Priority},
    collection::{Directory, ViewQuery},
    record::{Record, RecordId, Role},
    sorting::{SortKey, SortOrder, SortState},
};
pub use error::{DashError, Result};
pub use seed::Seed;
pub use state::{Action, Outcome, Session, Theme, View};
pub use storage::{Snapshot, Storage};
