use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AnnouncementBody, AnnouncementId};

/// News item shown above the advisor list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub body: AnnouncementBody,
    pub published_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAnnouncement {
    pub body: AnnouncementBody,
    pub published_at: NaiveDateTime,
}
