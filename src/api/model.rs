//! The backend API descriptor and its metadata document.
//!
//! # Responsibilities
//! - Deserialize the `/.api-core` JSON document
//! - Hold the ordered set of edges (named resources) for one backend
//! - Answer plural-name lookups for routing and parsing
//!
//! # Design Decisions
//! - The descriptor is a plain immutable value owned by its forward rule
//! - Edge order is significant and preserved from the metadata document

use serde::{Deserialize, Serialize};

/// One named resource type within a backend API's schema.
///
/// The plural name is what appears in URLs and route patterns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEdge {
    /// Singular name (e.g. "widget").
    pub name: String,

    /// Plural name used for routing (e.g. "widgets").
    pub plural_name: String,
}

/// The machine-readable description a backend serves at `/.api-core`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetadata {
    /// Optional human-readable name for the backend.
    #[serde(default)]
    pub name: Option<String>,

    /// Ordered set of edges the backend exposes.
    #[serde(default)]
    pub edges: Vec<ApiEdge>,
}

/// Immutable descriptor of one registered backend API.
#[derive(Debug, Clone)]
pub struct Api {
    name: Option<String>,
    edges: Vec<ApiEdge>,
}

impl Api {
    /// Build a descriptor from a fetched metadata document.
    pub fn from_metadata(metadata: ApiMetadata) -> Self {
        Self {
            name: metadata.name,
            edges: metadata.edges,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn edges(&self) -> &[ApiEdge] {
        &self.edges
    }

    /// Look up an edge by its plural (routing) name.
    pub fn edge_by_plural(&self, plural_name: &str) -> Option<&ApiEdge> {
        self.edges.iter().find(|e| e.plural_name == plural_name)
    }

    /// Plural names in registration order.
    pub fn plural_names(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(|e| e.plural_name.as_str())
    }
}
