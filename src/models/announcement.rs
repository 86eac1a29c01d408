//! Diesel models for news announcements.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::announcement::{
    Announcement as DomainAnnouncement, NewAnnouncement as DomainNewAnnouncement,
};
use crate::domain::types::{AnnouncementBody, AnnouncementId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::announcements)]
pub struct Announcement {
    pub id: i32,
    pub body: String,
    pub published_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::announcements)]
pub struct NewAnnouncement<'a> {
    pub body: &'a str,
    pub published_at: NaiveDateTime,
}

impl TryFrom<Announcement> for DomainAnnouncement {
    type Error = TypeConstraintError;

    fn try_from(value: Announcement) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AnnouncementId::try_from(value.id)?,
            body: AnnouncementBody::new(value.body)?,
            published_at: value.published_at,
        })
    }
}

impl<'a> From<&'a DomainNewAnnouncement> for NewAnnouncement<'a> {
    fn from(value: &'a DomainNewAnnouncement) -> Self {
        Self {
            body: value.body.as_str(),
            published_at: value.published_at,
        }
    }
}
