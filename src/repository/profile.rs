use diesel::prelude::*;

use crate::domain::profile::{
    NewProfile as DomainNewProfile, Profile as DomainProfile, UpdateProfile as DomainUpdateProfile,
};
use crate::models::profile::{
    NewProfile as DbNewProfile, Profile as DbProfile, UpdateProfile as DbUpdateProfile,
};
use crate::repository::{DieselRepository, ProfileReader, ProfileWriter};
use crate::repository::errors::RepositoryResult;

impl ProfileReader for DieselRepository {
    fn get_profile_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProfile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let profile = profiles::table
            .filter(profiles::id.eq(id))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        Ok(profile.map(DomainProfile::from))
    }

    fn get_profile_by_sub(&self, sub: &str) -> RepositoryResult<Option<DomainProfile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let profile = profiles::table
            .filter(profiles::sub.eq(sub))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        Ok(profile.map(DomainProfile::from))
    }

    fn get_profile_by_email(&self, email: &str) -> RepositoryResult<Option<DomainProfile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let profile = profiles::table
            .filter(profiles::email.eq(email))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        Ok(profile.map(DomainProfile::from))
    }
}

impl ProfileWriter for DieselRepository {
    fn create_profile(&self, new_profile: &DomainNewProfile) -> RepositoryResult<DomainProfile> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let insertable = DbNewProfile::from(new_profile);

        let created = diesel::insert_into(profiles::table)
            .values(&insertable)
            .get_result::<DbProfile>(&mut conn)?;

        Ok(created.into())
    }

    fn update_profile(
        &self,
        profile_id: i32,
        updates: &DomainUpdateProfile,
    ) -> RepositoryResult<DomainProfile> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProfile::from(updates);

        let target = profiles::table.filter(profiles::id.eq(profile_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbProfile>(&mut conn)?;

        Ok(updated.into())
    }
}
