//! Test suites for the dispatcher, its bootstrap, and the line codec.

pub(crate) mod support;
