//! Core library for zotproxy
//!
//! This crate implements the **Functional Core** of the zotproxy service,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`zotproxy_core`** (this crate): Pure transformation functions with zero I/O
//! - **`zotproxy`**: Upstream HTTP calls, the HTTP server, and the CLI (the Imperative Shell)
//!
//! Every function here is deterministic and can be tested with fixture data;
//! the shell fetches the flat collection list from the Zotero API and hands it
//! to these functions.
//!
//! # Module Organization
//!
//! - [`collection`]: Collection records and parsing of upstream collection payloads
//! - [`tree`]: Subtree lookup, flattening and nesting over a parent-pointer list
//! - [`bib`]: Aggregation of per-collection bibliography text
//!
//! # Example Usage
//!
//! ```rust
//! use zotproxy_core::collection::Collection;
//! use zotproxy_core::tree::{build_tree, collect_descendants};
//!
//! let collections = vec![
//!     Collection::new("A", "Root", None),
//!     Collection::new("B", "Child", Some("A")),
//! ];
//!
//! let flat = collect_descendants(&collections, "A").unwrap();
//! assert_eq!(flat.len(), 2);
//!
//! let tree = build_tree(&collections, "A").unwrap();
//! assert_eq!(tree.children[0].collection.key, "B");
//! ```

pub mod bib;
pub mod collection;
pub mod tree;
