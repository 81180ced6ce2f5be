//! Step identity and metadata

use serde::{Deserialize, Serialize};

/// Caller-assigned identifier of a step. Navigation destinations share this id space.
pub type ItemId = i32;

/// Identifier of a group of steps that can be removed together.
pub type GroupId = i32;

/// One step of the wizard.
///
/// Items are immutable once added to a menu. Identity is the `id`: two items
/// with the same id compare equal regardless of their other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepItem {
    pub id: ItemId,
    #[serde(default, rename = "group")]
    pub group_id: GroupId,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub title: String,
}

impl StepItem {
    pub fn new(group_id: GroupId, id: ItemId, order: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            group_id,
            order,
            title: title.into(),
        }
    }
}

impl PartialEq for StepItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StepItem {}
