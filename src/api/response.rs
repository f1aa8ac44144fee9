//! Response envelopes
//!
//! Every success body is `{success, message, data?}`; list endpoints add a
//! `pagination` block.

use serde::Serialize;

use crate::domain::{Page, Pagination};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn from_page(page: Page<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: page.items,
            pagination: page.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageRequest;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2], "ok")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "ok");
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_paginated_envelope_shape() {
        let request = PageRequest::new(Some(2), Some(5), 100).unwrap();
        let page = Page::new(vec!["a"], 6, request);
        let body = serde_json::to_value(PaginatedResponse::from_page(page, "listed")).unwrap();

        assert_eq!(body["pagination"]["current"], 2);
        assert_eq!(body["pagination"]["total"], 6);
        assert_eq!(body["pagination"]["totalPages"], 2);
        assert_eq!(body["data"], serde_json::json!(["a"]));
    }
}
