use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::customer::{CustomerListQuery, NewCustomer};
use crate::forms::{optional_inline, sanitize_inline_text};

pub type CustomerFormResult<T> = Result<T, CustomerFormError>;

#[derive(Debug, Error)]
pub enum CustomerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("name cannot be empty")]
    EmptyName,
}

/// Customer entered by an operator.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCustomerForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub phone: Option<String>,
    /// Lead source name, matched without regard to case.
    #[validate(length(max = 64))]
    #[serde(default)]
    pub source: Option<String>,
}

impl AddCustomerForm {
    /// Source name with blanks treated as absent.
    pub fn source_name(&self) -> Option<String> {
        optional_inline(self.source.clone())
    }

    pub fn into_new_customer(self, hub_id: i32) -> CustomerFormResult<NewCustomer> {
        self.validate()?;
        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(CustomerFormError::EmptyName);
        }
        let mut customer = NewCustomer::new(hub_id, name, self.email);
        if let Some(phone) = self.phone {
            customer = customer.with_phone(phone);
        }
        Ok(customer)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CustomerListParams {
    #[validate(length(max = 128))]
    #[serde(default)]
    pub search: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page: Option<usize>,
}

impl CustomerListParams {
    pub fn into_query(self, hub_id: i32) -> CustomerFormResult<CustomerListQuery> {
        self.validate()?;
        let mut query = CustomerListQuery::new(hub_id)
            .paginate(self.page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE);
        if let Some(search) = optional_inline(self.search) {
            query = query.search(search);
        }
        Ok(query)
    }
}
