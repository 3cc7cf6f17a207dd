//! Structural analysis over abstract parse trees.
//!
//! The pipeline is language-agnostic:
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────────┐
//! │ SyntaxNode  │────▶│  extract()   │────▶│ ElementCollection │
//! │ tree        │     │ + NodeTypeMap│     │ (per category)    │
//! └─────────────┘     └──────────────┘     └───────────────────┘
//!                                                  │
//!                              ┌───────────────────┼──────────────┐
//!                              ▼                   ▼              ▼
//!                        ┌───────────┐      ┌───────────┐   ┌──────────┐
//!                        │ hierarchy │      │  slice()  │   │  rules   │
//!                        │  build()  │      │ head/tail │   │  engine  │
//!                        └───────────┘      └───────────┘   └──────────┘
//! ```
//!
//! # Adding a New Language
//!
//! Only a node-type table is needed: add a module under `src/languages/`
//! with a `phf` category map and register it in `languages::LANGUAGES`.

mod element;
mod extract;
pub mod hierarchy;
mod node_map;
mod slice;

pub use element::{category, Element, ElementCollection};
pub use extract::{extract, nesting_depth, FocusRange};
pub use hierarchy::{build_collection, flatten, HierarchyNode};
pub use node_map::{is_nesting, NameSource, NodeTypeMap, ANONYMOUS, NESTING_NODE_TYPES};
pub use slice::{slice, Slice};

/// Build a containment forest from flat elements. See [`hierarchy::build`].
pub use hierarchy::build as build_hierarchy;
