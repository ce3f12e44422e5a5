use serde::{Deserialize, Serialize};

/// Shape of every response body: `{success, message?, data?, error?}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    pub fn confirmation(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error,
        }
    }
}

/// Body of create and update requests. Both fields are optional here so that
/// absence is reported with the API's own message rather than a parse error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_members_are_omitted() {
        let body = serde_json::to_value(Envelope::confirmation("User deleted successfully")).unwrap();
        assert_eq!(
            body,
            json!({"success": true, "message": "User deleted successfully"})
        );

        let body = serde_json::to_value(Envelope::success(vec![1, 2])).unwrap();
        assert_eq!(body, json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn failure_carries_optional_detail() {
        let body = serde_json::to_value(Envelope::failure("Failed to fetch users", None)).unwrap();
        assert_eq!(body, json!({"success": false, "message": "Failed to fetch users"}));

        let body =
            serde_json::to_value(Envelope::failure("Failed", Some("timeout".into()))).unwrap();
        assert_eq!(body["error"], "timeout");
    }
}
