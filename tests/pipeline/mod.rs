//! Pipeline tests driven from a multi-threaded runtime.

pub mod tests_single_flight;
