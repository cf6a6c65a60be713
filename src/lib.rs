//! stationfolio - portfolio site tooling.
//!
//! This crate holds the resume dataset the site is built from, the assistant
//! that answers visitor questions about it, and a development server. The
//! animated canvas scenes live in the `stationfolio-viz` crate.

pub mod assistant;
pub mod config;
pub mod gemini;
pub mod resume;
pub mod server;
