//! Example synthetic data generation built with fabricate.
//!
//! Demonstrates the full pipeline: declare typed resources (one of them
//! linking to another), ask the generator for a couple of desired states,
//! and watch dependencies get created first.

pub mod providers;

pub use providers::{TeamResource, UserResource};
