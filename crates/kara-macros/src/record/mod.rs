//! `#[derive(Record)]`.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
