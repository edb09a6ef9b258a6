//! Runner DTOs
//!
//! The list page returned by the server and the two request bodies the
//! client sends. Request bodies carry no identifiers and no server-assigned
//! fields.

use serde::{Deserialize, Serialize};

use crate::domain::runner::{Runner, null_as_default};

/// One page of runners
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerList {
    /// 1-based page number
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: u32,

    /// Total number of runners as reported by the server
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u32,

    /// Requested page length
    #[serde(rename = "pagelen", default, deserialize_with = "null_as_default")]
    pub page_length: u32,

    /// Runners on this page, in server order
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<Runner>,
}

impl RunnerList {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Find a runner on this page by name
    pub fn find_by_name(&self, name: &str) -> Option<&Runner> {
        self.values.iter().find(|r| r.name == name)
    }
}

impl IntoIterator for RunnerList {
    type Item = Runner;
    type IntoIter = std::vec::IntoIter<Runner>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Request to create a runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRunnerRequest {
    pub name: String,
    pub labels: Vec<String>,
}

/// Request to change a runner's status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_runner_list() {
        let json = r#"{
            "page": 1,
            "values": [{
                "uuid": "{b6d86128-0946-4fc8-90bc-6e501c0e869c}",
                "name": "test",
                "labels": ["self.hosted", "linux"],
                "state": {
                    "status": "UNREGISTERED",
                    "updated_on": "2024-11-16T09:55:35.926932702Z",
                    "cordoned": false
                },
                "created_on": "2024-11-16T09:55:35.926685218Z",
                "updated_on": "2024-11-16T09:55:35.926685218Z",
                "oauth_client": {
                    "id": "randomid",
                    "token_endpoint": "https://auth.atlassian.com/oauth/token",
                    "audience": "api.atlassian.com"
                }
            }],
            "size": 1,
            "pagelen": 1
        }"#;

        let list: RunnerList = serde_json::from_str(json).unwrap();
        assert_eq!(list.page, 1);
        assert_eq!(list.size, 1);
        assert_eq!(list.page_length, 1);
        assert_eq!(list.len(), 1);
        assert!(list.find_by_name("test").is_some());
        assert!(list.find_by_name("other").is_none());
    }

    #[test]
    fn test_decode_empty_page() {
        let list: RunnerList =
            serde_json::from_str(r#"{"page": 1, "values": null, "size": 0}"#).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.page_length, 0);
    }

    #[test]
    fn test_post_runner_request_shape() {
        let req = PostRunnerRequest {
            name: "autoscaled-1".to_string(),
            labels: vec!["self.hosted".to_string(), "linux".to_string()],
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "autoscaled-1", "labels": ["self.hosted", "linux"]})
        );
    }

    #[test]
    fn test_status_update_request_shape() {
        let req = StatusUpdateRequest {
            status: "DISABLED".to_string(),
        };

        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"status":"DISABLED"}"#
        );
    }
}
