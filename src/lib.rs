// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can reach `vocabview::vocab::*`, `vocabview::dataset::*` etc.
// Some code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by tests and benchmarks
pub mod dataset;
pub mod speech;
pub mod store;
pub mod vocab;

// Private: required transitively by the presentation layer
mod app;
mod config;
mod event;
mod logging;
mod ui;
