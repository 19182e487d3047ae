use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{UnknownVariant, round_cents};

/// Category of a cost breakdown row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    /// Crew hours.
    Labor,
    /// Truck flat fee.
    Truck,
    /// Fuel surcharge.
    Fuel,
    /// Selected additional service.
    Service,
    /// Operator-entered charge that survives recalculation.
    Additional,
}

impl LineItemKind {
    /// Generated rows are rebuilt on every recalculation.
    pub fn is_generated(self) -> bool {
        !matches!(self, Self::Additional)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Labor => "labor",
            Self::Truck => "truck",
            Self::Fuel => "fuel",
            Self::Service => "service",
            Self::Additional => "additional",
        }
    }
}

impl FromStr for LineItemKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "labor" => Ok(Self::Labor),
            "truck" => Ok(Self::Truck),
            "fuel" => Ok(Self::Fuel),
            "service" => Ok(Self::Service),
            "additional" => Ok(Self::Additional),
            other => Err(UnknownVariant::new("line item type", other)),
        }
    }
}

/// Domain representation of a single cost row of an estimate.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LineItem {
    /// Unique identifier of the row.
    pub id: i32,
    /// Estimate the row belongs to.
    pub estimate_id: i32,
    #[serde(rename = "item_type")]
    pub kind: LineItemKind,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    /// Amount of the row in dollars.
    pub total_cost: f64,
    /// Timestamp for when the row was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the row.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a cost row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub kind: LineItemKind,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_cost: f64,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewLineItem {
    /// Build a row whose total is `quantity * unit_price` rounded to cents.
    pub fn new(kind: LineItemKind, quantity: f64, unit_price: f64) -> Self {
        Self {
            kind,
            description: None,
            quantity,
            unit_price,
            total_cost: round_cents(quantity * unit_price),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Use an explicit total instead of the product of quantity and price.
    pub fn with_total(mut self, total_cost: f64) -> Self {
        self.total_cost = round_cents(total_cost);
        self
    }
}

/// Patch data applied when editing a manual cost row.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateLineItem {
    pub description: Option<Option<String>>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    /// Explicit total; derived from quantity and price when omitted.
    pub total_cost: Option<f64>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateLineItem {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateLineItem {
    pub fn new() -> Self {
        Self {
            description: None,
            quantity: None,
            unit_price: None,
            total_cost: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(Into::into));
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn total_cost(mut self, total_cost: f64) -> Self {
        self.total_cost = Some(total_cost);
        self
    }

    /// Apply the patch to a stored row.
    pub fn apply_to(&self, item: &mut LineItem) {
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit_price) = self.unit_price {
            item.unit_price = unit_price;
        }
        item.total_cost = match self.total_cost {
            Some(total) => round_cents(total),
            None if self.quantity.is_some() || self.unit_price.is_some() => {
                round_cents(item.quantity * item.unit_price)
            }
            None => item.total_cost,
        };
        item.updated_at = self.updated_at;
    }
}

/// Totals derived from the full set of cost rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineItemTotals {
    /// Sum of every row.
    pub total: f64,
    /// Sum of `service` and `additional` rows.
    pub additional_services: f64,
}

impl LineItemTotals {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Self {
        let mut totals = Self::default();
        for item in items {
            totals.total += item.total_cost;
            if matches!(item.kind, LineItemKind::Service | LineItemKind::Additional) {
                totals.additional_services += item.total_cost;
            }
        }
        totals.total = round_cents(totals.total);
        totals.additional_services = round_cents(totals.additional_services);
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: LineItemKind, total_cost: f64) -> LineItem {
        let now = chrono::Local::now().naive_utc();
        LineItem {
            id: 1,
            estimate_id: 1,
            kind,
            description: None,
            quantity: 1.0,
            unit_price: total_cost,
            total_cost,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_line_item_rounds_total() {
        let line = NewLineItem::new(LineItemKind::Fuel, 15.0, 3.5);
        assert_eq!(line.total_cost, 52.5);

        let line = NewLineItem::new(LineItemKind::Additional, 3.0, 0.3333);
        assert_eq!(line.total_cost, 1.0);
    }

    #[test]
    fn totals_split_extras() {
        let items = vec![
            item(LineItemKind::Labor, 100.0),
            item(LineItemKind::Service, 40.0),
            item(LineItemKind::Additional, 12.5),
        ];
        let totals = LineItemTotals::from_items(&items);
        assert_eq!(totals.total, 152.5);
        assert_eq!(totals.additional_services, 52.5);
    }

    #[test]
    fn update_recomputes_total_from_price() {
        let mut row = item(LineItemKind::Additional, 10.0);
        UpdateLineItem::new().quantity(3.0).apply_to(&mut row);
        assert_eq!(row.total_cost, 30.0);

        UpdateLineItem::new().total_cost(25.0).apply_to(&mut row);
        assert_eq!(row.total_cost, 25.0);
    }
}
