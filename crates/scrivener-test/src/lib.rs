//! Scrivener vCard marshalling - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `scrivener_test::component::` paths.

pub mod component {
    pub use scrivener_core::*;

    pub mod vcard {
        pub use scrivener_rfc::rfc::vcard::*;
    }

    pub mod error {
        pub use scrivener_core::error::*;
        pub use scrivener_rfc::error::*;
    }

    pub mod convert {
        pub use scrivener_app::convert::*;
    }
}
