//! Cross-module tests for vCard marshalling.

mod laws;
