//! Notifications addressed to users of a family tree.
//!
//! Each producer (invitations, events, stories, photos, relationships) owns
//! one payload variant carrying only its own fields. Delivery is somebody
//! else's problem; this crate only models and stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::person::PersonId;

/// The typed payload of a notification. The variant name is the `kind`
/// discriminant stored alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum NotificationPayload {
  Invitation {
    tree_id:    Uuid,
    inviter_id: String,
  },
  Event {
    event_id: Uuid,
  },
  Story {
    story_id:  Uuid,
    author_id: String,
  },
  Photo {
    photo_ids:   Vec<Uuid>,
    uploader_id: String,
  },
  Relationship {
    relationship_id: Uuid,
    member_ids:      [PersonId; 2],
    added_by:        String,
  },
}

impl NotificationPayload {
  /// Discriminant string; must match the serde tags above.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Invitation { .. } => "invitation",
      Self::Event { .. } => "event",
      Self::Story { .. } => "story",
      Self::Photo { .. } => "photo",
      Self::Relationship { .. } => "relationship",
    }
  }

  /// Serialise the inner fields (without the tag) for storage.
  pub fn to_json(&self) -> crate::Result<serde_json::Value> {
    let full = serde_json::to_value(self)?;
    Ok(full.get("data").cloned().unwrap_or(serde_json::Value::Null))
  }

  /// Rebuild from a stored discriminant and payload.
  pub fn from_parts(kind: &str, data: serde_json::Value) -> crate::Result<Self> {
    let wrapped = serde_json::json!({ "kind": kind, "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub id:         Uuid,
  pub user_id:    String,
  pub title:      String,
  pub message:    String,
  pub payload:    NotificationPayload,
  pub is_read:    bool,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::FamilyStore::record_notification`].
#[derive(Debug, Clone)]
pub struct NewNotification {
  pub user_id: String,
  pub title:   String,
  pub message: String,
  pub payload: NotificationPayload,
}
