pub mod city;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod record;
pub mod session;
pub mod stats;

pub use error::{ExploreError, Result};

#[cfg(test)]
mod test_support;
