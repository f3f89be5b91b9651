//! acqcfg: read station acquisition configs (`acq.cfg`).
//!
//! Parses the hierarchical setting files written by the DAQ, resolves
//! short aliases or dotted paths to settings, and formats their values
//! as one-line text.
//!
//! Layers:
//! - `domain`: config tree, parser, value formatting, alias table
//! - `application`: query service and error context
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing and command handlers

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
