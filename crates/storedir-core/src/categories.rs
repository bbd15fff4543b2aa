use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// A store category as returned by `GET /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
