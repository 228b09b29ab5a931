#![allow(dead_code)]

#[allow(unused_imports)]
pub use flw_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
