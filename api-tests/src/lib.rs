// api-tests/src/lib.rs
// ============================================================================
// Module: DP API Tests Library
// Description: Shared harness for the statistical-data API acceptance suite.
// Purpose: Provide configuration, store fixtures, and HTTP clients for suites.
// Dependencies: mongodb, neo4rs, reqwest, tracing
// ============================================================================

//! ## Overview
//! This crate hosts the harness used by the acceptance suites in
//! `api-tests/tests`. Suites seed fixture documents into the document store
//! and fixture nodes into the graph store, call the dataset, code-list,
//! filter, import, hierarchy and identity APIs over HTTP, and assert on the
//! responses and on the side effects left in the stores.
//!
//! The services under test run externally; nothing in this crate implements
//! their behaviour.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod docstore;
pub mod fixtures;
pub mod graphstore;
pub mod logging;
