//! Orchestrator tests through the public API:
//! - XML → XSD → XML round trips
//! - Exact sample shapes for small schemas
//! - Empty, malformed and invalid inputs

pub mod tests_diagnostics;
pub mod tests_round_trip;
pub mod tests_samples;
