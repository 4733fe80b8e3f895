#![doc(test(attr(deny(warnings))))]

//! Duet Core offers the income ledger, wishlist funding, and pairing
//! primitives that power a two-person household tracker and its CLI.

pub mod cli;
pub mod core;
pub mod domain;
pub mod errors;
pub mod pairing;
pub mod parser;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Duet Core tracing initialized.");
    });
}
