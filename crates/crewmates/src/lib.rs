//! `crewmates` - Create, browse and analyse a crew of crewmates
//!
//! This library provides the crewmate model, a `SQLite`-backed store, and the
//! pure view engine that filters, sorts and aggregates a collection.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod achievements;
pub mod cli;
pub mod config;
pub mod crewmate;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod stats;
pub mod storage;
pub mod transfer;
pub mod view;

pub use achievements::{evaluate, Rank, Scorecard};
pub use config::Config;
pub use crewmate::{Crewmate, CrewmateColor, CrewmateDraft, CrewmateId, CrewmatePatch};
pub use error::{Error, Result};
pub use gallery::Gallery;
pub use logging::init_logging;
pub use stats::Aggregates;
pub use storage::{CrewmateStore, Storage, StorageStats};
pub use view::{CategoryFilter, CollectionView, SortKey, TimeRange, ViewParams};
