//! Test helpers module
//!
//! Database setup and fake data builders shared by the integration tests.

#![allow(dead_code)]

/// Obtain a test database or return early from the calling test
macro_rules! require_db {
    () => {
        match $crate::helpers::TestDatabase::try_new().await {
            Some(db) => db,
            None => return,
        }
    };
}

pub mod database_helper;
pub mod test_data;

pub use database_helper::*;
pub use test_data::*;
