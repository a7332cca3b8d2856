//! Court domain entity

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: String,
    pub name: String,
    /// Surface or setting, e.g. `hard`, `clay`, `indoor`
    pub court_type: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Court {
    pub fn new(id: impl Into<String>, name: impl Into<String>, court_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            court_type: court_type.into(),
            is_active: true,
        }
    }
}
