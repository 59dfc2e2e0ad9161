//! leadline: sales pipeline operating core.
//!
//! Leads move through a fixed stage chain; every stage carries one open
//! task, and resolving a task is what moves the pipeline. The interesting
//! logic lives in `pipeline` (successor table, title generation, the
//! completion outcome resolver); `db` is the SQLite working store,
//! `services` the business layer, and `commands` the validated boundary a
//! front end talks to.

pub mod commands;
pub mod db;
pub mod error;
pub mod migrations;
pub mod pipeline;
pub mod services;
pub mod state;
pub mod types;
pub mod util;
