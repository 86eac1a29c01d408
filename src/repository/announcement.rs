use diesel::prelude::*;

use crate::domain::announcement::{Announcement, NewAnnouncement};
use crate::models::announcement::{
    Announcement as DbAnnouncement, NewAnnouncement as DbNewAnnouncement,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{AnnouncementReader, AnnouncementWriter, DieselRepository};
use crate::schema::announcements;

impl AnnouncementReader for DieselRepository {
    fn latest_announcement(&self) -> RepositoryResult<Option<Announcement>> {
        let mut conn = self.conn()?;

        let latest = announcements::table
            .order((announcements::published_at.desc(), announcements::id.desc()))
            .first::<DbAnnouncement>(&mut conn)
            .optional()?;

        Ok(latest.map(Announcement::try_from).transpose()?)
    }
}

impl AnnouncementWriter for DieselRepository {
    fn create_announcement(
        &self,
        announcement: &NewAnnouncement,
    ) -> RepositoryResult<Announcement> {
        let mut conn = self.conn()?;

        let insertable: DbNewAnnouncement = announcement.into();
        let created = diesel::insert_into(announcements::table)
            .values(&insertable)
            .get_result::<DbAnnouncement>(&mut conn)?;

        Ok(Announcement::try_from(created)?)
    }
}
