//! Scenario tests exercising registration, stacks, and the availability
//! pipeline end to end.

mod support;

mod catalog;
mod features;
