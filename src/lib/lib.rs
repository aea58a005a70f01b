#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends plain and templated email through SendGrid, merging each call with
//! configured defaults.

pub mod domain;
pub mod infrastructure;
