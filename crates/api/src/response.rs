//! Success envelope shared by all JSON handlers.

use serde::Serialize;

/// `{ "success": true, "message"?: ..., "count"?: ..., "data"?: ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::data(data)
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            count: Some(items.len()),
            ..Self::data(items)
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_includes_count() {
        let value = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(value, json!({"success": true, "count": 3, "data": [1, 2, 3]}));
    }

    #[test]
    fn test_message_only() {
        let value = serde_json::to_value(ApiResponse::message("Event deleted successfully")).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "Event deleted successfully"})
        );
    }

    #[test]
    fn test_with_message_and_data() {
        let value = serde_json::to_value(ApiResponse::with_message("Created", json!({"id": 1})))
            .unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "Created", "data": {"id": 1}})
        );
    }
}
