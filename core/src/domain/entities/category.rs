//! Article categories, optionally nested under a parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Unique URL slug
    pub slug: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category fields supplied on insert; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub now: DateTime<Utc>,
}

impl NewCategory {
    pub fn into_category(self, id: i64) -> Category {
        Category {
            id,
            name: self.name,
            slug: self.slug,
            parent_id: self.parent_id,
            created_at: self.now,
            updated_at: self.now,
        }
    }
}
