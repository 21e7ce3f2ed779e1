// ── Category domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use crate::reorder::Orderable;

/// Product category. Categories form a shallow tree (`parent_id`) and
/// carry a display position within their sibling scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    /// 0-based display position among siblings.
    pub position: u32,
    pub parent_id: Option<EntityId>,
    pub image_url: Option<String>,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Orderable for Category {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}
