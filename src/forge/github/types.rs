use serde::{Deserialize, Serialize};

use crate::forge::request::BranchRef;

#[derive(Debug, Deserialize)]
pub struct RefObject {
    pub sha: String,
}

/// Response of the git refs endpoints.
#[derive(Debug, Deserialize)]
pub struct RefResponse {
    #[serde(rename = "ref")]
    pub reference: String,
    pub object: RefObject,
}

impl RefResponse {
    pub fn into_branch_ref(self) -> BranchRef {
        let name = self
            .reference
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.reference)
            .to_string();

        BranchRef {
            name,
            target_sha: self.object.sha,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContentQuery {
    #[serde(rename = "ref")]
    pub reference: String,
}
