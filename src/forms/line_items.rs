use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::line_item::{LineItemKind, NewLineItem, UpdateLineItem};
use crate::forms::optional_inline;

const DESCRIPTION_MAX_LEN: u64 = 512;

pub type LineItemFormResult<T> = Result<T, LineItemFormError>;

#[derive(Debug, Error)]
pub enum LineItemFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    #[error("nothing to update")]
    EmptyUpdate,
}

fn finite(value: f64, field: &'static str) -> LineItemFormResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LineItemFormError::NotFinite(field))
    }
}

fn default_quantity() -> f64 {
    1.0
}

/// Manual charge or discount added by an operator.
#[derive(Debug, Deserialize, Validate)]
pub struct AddLineItemForm {
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Negative prices record discounts.
    pub unit_price: f64,
    /// Explicit total; `quantity * unit_price` when omitted.
    #[serde(default)]
    pub total_cost: Option<f64>,
}

impl AddLineItemForm {
    pub fn into_new_line_item(self) -> LineItemFormResult<NewLineItem> {
        self.validate()?;

        let quantity = finite(self.quantity, "quantity")?;
        let unit_price = finite(self.unit_price, "unit_price")?;

        let mut item = NewLineItem::new(LineItemKind::Additional, quantity, unit_price);
        if let Some(description) = optional_inline(self.description) {
            item = item.with_description(description);
        }
        if let Some(total_cost) = self.total_cost {
            item = item.with_total(finite(total_cost, "total_cost")?);
        }
        Ok(item)
    }
}

/// Partial edit of a manual line item.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditLineItemForm {
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

impl EditLineItemForm {
    pub fn into_update_line_item(self) -> LineItemFormResult<UpdateLineItem> {
        self.validate()?;

        if self.description.is_none()
            && self.quantity.is_none()
            && self.unit_price.is_none()
            && self.total_cost.is_none()
        {
            return Err(LineItemFormError::EmptyUpdate);
        }

        let mut update = UpdateLineItem::new();
        if let Some(description) = self.description {
            update = update.description(optional_inline(Some(description)));
        }
        if let Some(quantity) = self.quantity {
            update = update.quantity(finite(quantity, "quantity")?);
        }
        if let Some(unit_price) = self.unit_price {
            update = update.unit_price(finite(unit_price, "unit_price")?);
        }
        if let Some(total_cost) = self.total_cost {
            update = update.total_cost(finite(total_cost, "total_cost")?);
        }
        Ok(update)
    }
}
