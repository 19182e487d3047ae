use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::hub::HubSettings as DomainHubSettings,
    models::hub::{HubSettings as DbHubSettings, SaveHubSettings},
    repository::{DieselRepository, HubReader, HubWriter},
};

impl HubReader for DieselRepository {
    fn get_hub_settings(&self, hub_id: i32) -> RepositoryResult<Option<DomainHubSettings>> {
        use crate::schema::hub_settings;

        let mut conn = self.conn()?;
        let settings = hub_settings::table
            .filter(hub_settings::hub_id.eq(hub_id))
            .first::<DbHubSettings>(&mut conn)
            .optional()?;

        Ok(settings.map(Into::into))
    }
}

impl HubWriter for DieselRepository {
    fn save_hub_settings(&self, settings: &DomainHubSettings) -> RepositoryResult<DomainHubSettings> {
        use crate::schema::hub_settings;

        let mut conn = self.conn()?;
        let payload = SaveHubSettings::from(settings);

        let saved = diesel::insert_into(hub_settings::table)
            .values(&payload)
            .on_conflict(hub_settings::hub_id)
            .do_update()
            .set(&payload)
            .get_result::<DbHubSettings>(&mut conn)?;

        Ok(saved.into())
    }
}
