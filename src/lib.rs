// Magpie: bookmark triage for X/Twitter.
//
// This is the library root. Each module corresponds to a major subsystem
// of the triage pipeline.

pub mod agent;
pub mod config;
pub mod enrich;
pub mod ledger;
pub mod pipeline;
pub mod routing;
pub mod source;
pub mod status;
