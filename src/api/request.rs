//! Typed requests parsed from URL path segments.
//!
//! # Responsibilities
//! - Map `/widgets/7/...` onto the backend's edge set
//! - Produce a typed `ApiRequest` or a status-coded `ApiError`
//!
//! # Design Decisions
//! - Segments alternate collection / entry: an edge plural name optionally
//!   followed by an id
//! - An empty path parses successfully to zero segments; the forward rule
//!   turns that into a 404

use axum::http::StatusCode;

use crate::api::error::ApiError;
use crate::api::model::Api;

/// One step of a parsed request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A collection endpoint (e.g. `/widgets`).
    Collection { edge: String },

    /// A single entry within a collection (e.g. `/widgets/7`).
    Entry { edge: String, id: String },
}

/// The parsed path of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequestPath {
    pub segments: Vec<PathSegment>,
}

/// A request parsed against one backend's schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: ApiRequestPath,
}

impl Api {
    /// Parse a sequence of URL path segments into a typed request.
    ///
    /// A segment that is not one of this backend's plural edge names yields
    /// a status-coded error that is surfaced to the client verbatim.
    pub fn parse_request(&self, route: &[&str]) -> Result<ApiRequest, ApiError> {
        let mut segments = Vec::new();
        let mut parts = route.iter();

        while let Some(part) = parts.next() {
            let edge = self.edge_by_plural(part).ok_or_else(|| {
                ApiError::edge(StatusCode::BAD_REQUEST, format!("Unknown resource: {part}"))
            })?;

            match parts.next() {
                Some(id) => segments.push(PathSegment::Entry {
                    edge: edge.name.clone(),
                    id: (*id).to_string(),
                }),
                None => segments.push(PathSegment::Collection {
                    edge: edge.name.clone(),
                }),
            }
        }

        Ok(ApiRequest {
            path: ApiRequestPath { segments },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::{ApiEdge, ApiMetadata};

    fn widget_api() -> Api {
        Api::from_metadata(ApiMetadata {
            name: Some("widget-api".into()),
            edges: vec![ApiEdge {
                name: "widget".into(),
                plural_name: "widgets".into(),
            }],
        })
    }

    #[test]
    fn test_entry_request_parses_edge_and_id() {
        let request = widget_api().parse_request(&["widgets", "7"]).unwrap();
        assert_eq!(
            request.path.segments,
            vec![PathSegment::Entry {
                edge: "widget".into(),
                id: "7".into(),
            }]
        );
    }

    #[test]
    fn test_collection_request_parses_single_segment() {
        let request = widget_api().parse_request(&["widgets"]).unwrap();
        assert_eq!(
            request.path.segments,
            vec![PathSegment::Collection {
                edge: "widget".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_segment_is_a_status_coded_error() {
        let err = widget_api().parse_request(&["sprockets"]).unwrap_err();
        match err {
            ApiError::Edge { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Unknown resource: sprockets");
            }
            _ => panic!("expected edge error"),
        }
    }

    #[test]
    fn test_empty_route_parses_to_zero_segments() {
        let request = widget_api().parse_request(&[]).unwrap();
        assert!(request.path.segments.is_empty());
    }
}
