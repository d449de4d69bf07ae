use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub url: String,
}
