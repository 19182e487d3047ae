use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::catalog::{
    InventoryItem as DomainInventoryItem, NewInventoryItem as DomainNewInventoryItem,
    NewResidenceSize as DomainNewResidenceSize, ResidenceSize as DomainResidenceSize,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::inventory_items)]
pub struct InventoryItem {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub weight_lbs: f64,
    pub volume_cf: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::inventory_items)]
pub struct NewInventoryItem<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub weight_lbs: f64,
    pub volume_cf: f64,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::residence_sizes)]
pub struct ResidenceSize {
    pub id: i32,
    pub hub_id: i32,
    pub size_description: String,
    pub size_type: String,
    pub weight_lbs: f64,
    pub volume_cf: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::residence_sizes)]
pub struct NewResidenceSize<'a> {
    pub hub_id: i32,
    pub size_description: &'a str,
    pub size_type: &'a str,
    pub weight_lbs: f64,
    pub volume_cf: Option<f64>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::estimate_inventory_items)]
pub struct NewEstimateInventoryItem {
    pub estimate_id: i32,
    pub inventory_item_id: i32,
    pub quantity: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::estimate_residence_sizes)]
pub struct NewEstimateResidenceSize {
    pub estimate_id: i32,
    pub residence_size_id: i32,
    pub quantity: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::estimate_additional_services)]
pub struct NewEstimateAdditionalService {
    pub estimate_id: i32,
    pub additional_service_id: i32,
    pub quantity: i32,
}

impl From<InventoryItem> for DomainInventoryItem {
    fn from(value: InventoryItem) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            weight_lbs: value.weight_lbs,
            volume_cf: value.volume_cf,
        }
    }
}

impl<'a> From<&'a DomainNewInventoryItem> for NewInventoryItem<'a> {
    fn from(value: &'a DomainNewInventoryItem) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            weight_lbs: value.weight_lbs,
            volume_cf: value.volume_cf,
        }
    }
}

impl From<ResidenceSize> for DomainResidenceSize {
    fn from(value: ResidenceSize) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            size_description: value.size_description,
            size_type: value.size_type,
            weight_lbs: value.weight_lbs,
            volume_cf: value.volume_cf,
        }
    }
}

impl<'a> From<&'a DomainNewResidenceSize> for NewResidenceSize<'a> {
    fn from(value: &'a DomainNewResidenceSize) -> Self {
        Self {
            hub_id: value.hub_id,
            size_description: value.size_description.as_str(),
            size_type: value.size_type.as_str(),
            weight_lbs: value.weight_lbs,
            volume_cf: value.volume_cf,
        }
    }
}
