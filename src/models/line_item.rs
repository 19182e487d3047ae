use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::line_item::{
    LineItem as DomainLineItem, LineItemKind, NewLineItem as DomainNewLineItem,
};
use crate::models::estimate::Estimate;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::estimate_line_items)]
#[diesel(belongs_to(Estimate, foreign_key = estimate_id))]
pub struct EstimateLineItem {
    pub id: i32,
    pub estimate_id: i32,
    pub item_type: String,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_cost: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::estimate_line_items)]
pub struct NewEstimateLineItem<'a> {
    pub estimate_id: i32,
    pub item_type: &'a str,
    pub description: Option<&'a str>,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_cost: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::estimate_line_items, treat_none_as_null = true)]
pub struct LineItemDetails<'a> {
    pub description: Option<&'a str>,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_cost: f64,
    pub updated_at: NaiveDateTime,
}

impl From<EstimateLineItem> for DomainLineItem {
    fn from(value: EstimateLineItem) -> Self {
        Self {
            id: value.id,
            estimate_id: value.estimate_id,
            // Unknown kinds are kept as manual rows so they are never dropped.
            kind: value.item_type.parse().unwrap_or(LineItemKind::Additional),
            description: value.description,
            quantity: value.quantity,
            unit_price: value.unit_price,
            total_cost: value.total_cost,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewEstimateLineItem<'a> {
    pub fn from_domain(estimate_id: i32, value: &'a DomainNewLineItem) -> Self {
        Self {
            estimate_id,
            item_type: value.kind.as_str(),
            description: value.description.as_deref(),
            quantity: value.quantity,
            unit_price: value.unit_price,
            total_cost: value.total_cost,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainLineItem> for LineItemDetails<'a> {
    fn from(value: &'a DomainLineItem) -> Self {
        Self {
            description: value.description.as_deref(),
            quantity: value.quantity,
            unit_price: value.unit_price,
            total_cost: value.total_cost,
            updated_at: value.updated_at,
        }
    }
}
