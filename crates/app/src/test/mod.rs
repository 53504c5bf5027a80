//! Shared test infrastructure

pub(crate) mod context;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
pub(crate) use db::TEST_POOL_SIZE;
