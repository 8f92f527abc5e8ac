//! lance-core library.
//!
//! The data-store layer for the lance work tracker: in-memory entity
//! collections, JSON snapshot persistence, the project-to-client
//! aggregation path, and the restart-safe session timer. The CLI in
//! `lance-cli` is a thin presentation layer over this crate.
//!
//! # Conventions
//!
//! - **Errors**: storage failures degrade to safe defaults and are logged;
//!   only the setup path (config, lock acquisition) returns `Result`.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod repo;
pub mod store;
pub mod timer;
pub mod workspace;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{SnapshotStore, StoreLock};
pub use workspace::Workspace;
