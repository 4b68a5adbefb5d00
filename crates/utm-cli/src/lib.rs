//! Operator-facing building blocks shared by the `utm-cli` binaries.

pub mod scenario;
