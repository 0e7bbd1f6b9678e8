mod common;
mod idempotence_tests;
mod properties_tests;
