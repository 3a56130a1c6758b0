//! Conversion pipeline behind the `scrivener` command line tool.

pub mod convert;
