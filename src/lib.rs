//! Batch monitor that polls the Companies House API for the population of
//! active UK PLCs, flags those whose annual accounts or confirmation
//! statements are overdue, and cross-references the stragglers against
//! listed-issuer name lists.

pub mod config;
pub mod delivery;
pub mod error;
pub mod issuers;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod telemetry;
