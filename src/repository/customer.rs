use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::customer::{
        Customer as DomainCustomer, CustomerListQuery, LeadSource as DomainLeadSource,
        NewCustomer as DomainNewCustomer, NewLeadSource as DomainNewLeadSource, normalize_phone,
    },
    models::customer::{
        Customer as DbCustomer, LeadSource as DbLeadSource, NewCustomer as DbNewCustomer,
        NewLeadSource as DbNewLeadSource,
    },
    repository::{CustomerReader, CustomerWriter, DieselRepository, SourceReader, SourceWriter},
};

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainCustomer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::id.eq(id))
            .filter(customers::hub_id.eq(hub_id))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn get_customer_by_email(
        &self,
        email: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCustomer>> {
        use crate::schema::customers;

        let normalized_email = email.trim().to_lowercase();

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::email.eq(normalized_email))
            .filter(customers::hub_id.eq(hub_id))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn get_customer_by_phone(
        &self,
        phone: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCustomer>> {
        use crate::schema::customers;

        let normalized_phone = normalize_phone(phone);
        if normalized_phone.is_empty() {
            return Ok(None);
        }

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::phone.eq(normalized_phone))
            .filter(customers::hub_id.eq(hub_id))
            .order(customers::id.asc())
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCustomer>)> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let mut count_query = customers::table
            .filter(customers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                customers::name
                    .like(pattern.clone())
                    .or(customers::email.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = customers::table
            .filter(customers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                customers::name
                    .like(pattern.clone())
                    .or(customers::email.like(pattern)),
            );
        }

        items = items.order(customers::created_at.desc());

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_customers = items.load::<DbCustomer>(&mut conn)?;

        if db_customers.is_empty() {
            return Ok((total, Vec::new()));
        }

        Ok((total, db_customers.into_iter().map(Into::into).collect()))
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(
        &self,
        new_customer: &DomainNewCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let db_new = DbNewCustomer::from(new_customer);

        let created = diesel::insert_into(customers::table)
            .values(&db_new)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(created.into())
    }
}

impl SourceReader for DieselRepository {
    fn list_lead_sources(
        &self,
        hub_id: i32,
        public_only: bool,
    ) -> RepositoryResult<Vec<DomainLeadSource>> {
        use crate::schema::lead_sources;

        let mut conn = self.conn()?;
        let mut query = lead_sources::table
            .filter(lead_sources::hub_id.eq(hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if public_only {
            query = query.filter(lead_sources::is_public.eq(true));
        }

        let sources = query
            .order(lead_sources::name.asc())
            .load::<DbLeadSource>(&mut conn)?;

        Ok(sources.into_iter().map(Into::into).collect())
    }

    fn find_lead_source(
        &self,
        hub_id: i32,
        name: &str,
    ) -> RepositoryResult<Option<DomainLeadSource>> {
        use crate::schema::lead_sources;

        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        // The name column collates NOCASE.
        let mut conn = self.conn()?;
        let source = lead_sources::table
            .filter(lead_sources::hub_id.eq(hub_id))
            .filter(lead_sources::name.eq(name))
            .first::<DbLeadSource>(&mut conn)
            .optional()?;

        Ok(source.map(Into::into))
    }
}

impl SourceWriter for DieselRepository {
    fn create_lead_source(
        &self,
        new_source: &DomainNewLeadSource,
    ) -> RepositoryResult<DomainLeadSource> {
        use crate::schema::lead_sources;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(lead_sources::table)
            .values(&DbNewLeadSource::from(new_source))
            .get_result::<DbLeadSource>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_lead_source(&self, source_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{customers, lead_sources};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let deleted = diesel::delete(
                lead_sources::table
                    .filter(lead_sources::id.eq(source_id))
                    .filter(lead_sources::hub_id.eq(hub_id)),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::update(customers::table.filter(customers::source_id.eq(source_id)))
                .set(customers::source_id.eq(None::<i32>))
                .execute(conn)?;

            Ok(())
        })
    }
}
