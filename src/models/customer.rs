use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, LeadSource as DomainLeadSource, NewCustomer as DomainNewCustomer,
    NewLeadSource as DomainNewLeadSource,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub source_id: Option<i32>,
}

impl From<Customer> for DomainCustomer {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            source_id: value.source_id,
        }
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(value: &'a DomainNewCustomer) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            email: value.email.as_str(),
            phone: value.phone.as_deref(),
            source_id: value.source_id,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::lead_sources)]
pub struct LeadSource {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::lead_sources)]
pub struct NewLeadSource<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub is_public: bool,
}

impl From<LeadSource> for DomainLeadSource {
    fn from(value: LeadSource) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            is_public: value.is_public,
        }
    }
}

impl<'a> From<&'a DomainNewLeadSource> for NewLeadSource<'a> {
    fn from(value: &'a DomainNewLeadSource) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            is_public: value.is_public,
        }
    }
}
