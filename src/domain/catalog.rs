use serde::{Deserialize, Serialize};

/// Household item with a typical weight and volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    /// Unique identifier of the item.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    pub name: String,
    pub weight_lbs: f64,
    pub volume_cf: f64,
}

/// Payload required to add an item to the inventory catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub hub_id: i32,
    pub name: String,
    pub weight_lbs: f64,
    pub volume_cf: f64,
}

impl NewInventoryItem {
    pub fn new(hub_id: i32, name: impl Into<String>, weight_lbs: f64, volume_cf: f64) -> Self {
        Self {
            hub_id,
            name: name.into().trim().to_string(),
            weight_lbs,
            volume_cf,
        }
    }
}

/// Residence preset such as "2 bedroom apartment" with its typical load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResidenceSize {
    /// Unique identifier of the preset.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Label shown to customers, also used to match intake submissions.
    pub size_description: String,
    /// Grouping such as `house_bedrooms` or `apartment`.
    pub size_type: String,
    pub weight_lbs: f64,
    /// Volume when tracked; otherwise derived from the weight.
    pub volume_cf: Option<f64>,
}

/// Payload required to add a residence preset.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResidenceSize {
    pub hub_id: i32,
    pub size_description: String,
    pub size_type: String,
    pub weight_lbs: f64,
    pub volume_cf: Option<f64>,
}

impl NewResidenceSize {
    pub fn new(
        hub_id: i32,
        size_description: impl Into<String>,
        size_type: impl Into<String>,
        weight_lbs: f64,
    ) -> Self {
        Self {
            hub_id,
            size_description: size_description.into().trim().to_string(),
            size_type: size_type.into().trim().to_string(),
            weight_lbs,
            volume_cf: None,
        }
    }

    pub fn with_volume(mut self, volume_cf: f64) -> Self {
        self.volume_cf = Some(volume_cf);
        self
    }
}

/// Quantity of a catalog entry attached to an estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    /// Catalog identifier.
    pub id: i32,
    pub quantity: i32,
}

/// One weighted line contributing to the load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadLine {
    pub quantity: i32,
    pub weight_lbs: f64,
    pub volume_cf: Option<f64>,
}

/// One selected additional service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceLine {
    pub additional_service_id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub movers_required: i32,
}

/// Catalog selections of an estimate, joined with their catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EstimateSizing {
    pub inventory: Vec<LoadLine>,
    pub residence_sizes: Vec<LoadLine>,
    pub services: Vec<ServiceLine>,
}
