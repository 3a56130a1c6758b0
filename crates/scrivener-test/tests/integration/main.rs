//! End-to-end tests over the public API.

mod conversion;
mod helpers;
mod registry;
