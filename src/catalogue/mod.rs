//! Component catalogue: categories, components and trigger tables.
//!
//! ## Key Types
//!
//! - `Category`: Fixed set of draftable categories
//! - `Component`: Immutable catalogue record, cloned into bags and builds
//! - `TriggerRule`: Swap options and grants reached by holding a component
//! - `Catalogue`: Queryable reference data, built once and shared
//! - `ComponentCatalogue`: The lookup surface the engine depends on

pub mod component;
pub mod registry;

pub use component::{Category, Component, Dependency, DependencyKind};
pub use registry::{Catalogue, CatalogueError, ComponentCatalogue, TriggerRule};
