//! CLI command integration tests
//!
//! Run the built binary against temporary asset trees and check stdout,
//! stderr and exit codes.
