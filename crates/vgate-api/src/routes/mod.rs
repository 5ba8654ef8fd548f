//! # API Route Modules
//!
//! - `schemas`: registry listing and request-body validation endpoints.

pub mod schemas;
