use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a customer that belongs to a hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Unique identifier of the customer.
    pub id: i32,
    /// Hub identifier that owns the customer.
    pub hub_id: i32,
    /// Human-friendly display name of the customer.
    pub name: String,
    /// Primary email address stored in lowercase for comparisons.
    pub email: String,
    /// Optional phone number with formatting characters removed.
    pub phone: Option<String>,
    /// Lead source the customer came from.
    pub source_id: Option<i32>,
}

/// Payload required to insert a new customer for a hub.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    /// Hub identifier that owns the customer.
    pub hub_id: i32,
    /// Human-friendly display name of the customer.
    pub name: String,
    /// Primary email address stored in lowercase for comparisons.
    pub email: String,
    /// Optional phone number with formatting characters removed.
    pub phone: Option<String>,
    pub source_id: Option<i32>,
}

impl NewCustomer {
    /// Build a new customer payload while normalising the email to lowercase.
    #[must_use]
    pub fn new(hub_id: i32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into().trim().to_string(),
            email: email.into().trim().to_lowercase(),
            phone: None,
            source_id: None,
        }
    }

    #[must_use]
    pub fn with_source_id(mut self, source_id: i32) -> Self {
        self.source_id = Some(source_id);
        self
    }

    /// Attach a phone number, keeping only digits and a leading `+`.
    #[must_use]
    pub fn with_phone(mut self, phone: impl AsRef<str>) -> Self {
        let phone = normalize_phone(phone.as_ref());
        self.phone = (!phone.is_empty()).then_some(phone);
        self
    }
}

/// Strip spaces, dashes and brackets from a phone number.
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let mut normalized = String::with_capacity(trimmed.len());
    for (index, ch) in trimmed.chars().enumerate() {
        if ch.is_ascii_digit() || (index == 0 && ch == '+') {
            normalized.push(ch);
        }
    }
    normalized
}

/// Channel a customer heard about the hub through, e.g. "Google" or "Referral".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadSource {
    pub id: i32,
    pub hub_id: i32,
    /// Display name, unique per hub regardless of case.
    pub name: String,
    /// Offered in the public quote form dropdown.
    pub is_public: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLeadSource {
    pub hub_id: i32,
    pub name: String,
    pub is_public: bool,
}

impl NewLeadSource {
    #[must_use]
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into().trim().to_string(),
            is_public: true,
        }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_public = false;
        self
    }
}

/// Query definition used to list customers for a hub.
#[derive(Debug, Clone)]
pub struct CustomerListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional search term matched against name and email.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
    /// Construct a query that targets all customers belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_customer_normalises_contacts() {
        let customer = NewCustomer::new(1, " Ann ", " Ann@Example.COM ").with_phone("+1 (555) 010-2030");
        assert_eq!(customer.name, "Ann");
        assert_eq!(customer.email, "ann@example.com");
        assert_eq!(customer.phone.as_deref(), Some("+15550102030"));

        let customer = NewCustomer::new(1, "Bob", "bob@example.com").with_phone(" - ");
        assert_eq!(customer.phone, None);
    }
}
