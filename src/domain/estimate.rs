use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::UnknownVariant;
use crate::domain::line_item::{LineItem, NewLineItem};
use crate::domain::stop::{NewStop, Stop, StopChange, StopCoordinates};

/// Sizing strategy used to derive the workload of an estimate.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EstimateMethod {
    /// Weight is the sum of itemised inventory lines.
    #[default]
    Inventory,
    /// Weight is the sum of residence size presets.
    Size,
    /// Hours are entered by the operator and weight is not derived.
    Hourly,
}

impl EstimateMethod {
    /// Whether hours and crew size are derived from the total weight.
    pub fn is_weight_driven(self) -> bool {
        !matches!(self, Self::Hourly)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Size => "size",
            Self::Hourly => "hourly",
        }
    }
}

impl FromStr for EstimateMethod {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "inventory" => Ok(Self::Inventory),
            "size" => Ok(Self::Size),
            "hourly" => Ok(Self::Hourly),
            other => Err(UnknownVariant::new("estimate method", other)),
        }
    }
}

/// Sales lifecycle of an estimate.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimateStatus {
    /// Freshly captured lead that nobody has priced yet.
    #[default]
    #[serde(rename = "new lead")]
    NewLead,
    /// Priced estimate that was sent to the customer.
    #[serde(rename = "estimate")]
    Estimate,
    /// Customer accepted and the move is scheduled.
    #[serde(rename = "booked")]
    Booked,
    /// Move has been performed and invoiced.
    #[serde(rename = "closed")]
    Closed,
    /// Customer or operator cancelled the job.
    #[serde(rename = "cancelled")]
    Cancelled,
    /// Lead went to a competitor or stopped responding.
    #[serde(rename = "lost")]
    Lost,
}

impl EstimateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewLead => "new lead",
            Self::Estimate => "estimate",
            Self::Booked => "booked",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
            Self::Lost => "lost",
        }
    }

    /// Terminal statuses cannot be left once reached.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled | Self::Lost)
    }

    /// Check whether the estimate may move from `self` to `next`.
    ///
    /// Open statuses move freely between each other and may be cancelled or
    /// lost at any time. Only a booked estimate can be closed.
    pub fn can_transition_to(self, next: EstimateStatus) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Closed => self == Self::Booked,
            _ => true,
        }
    }
}

impl FromStr for EstimateStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new lead" => Ok(Self::NewLead),
            "estimate" => Ok(Self::Estimate),
            "booked" => Ok(Self::Booked),
            "closed" => Ok(Self::Closed),
            "cancelled" => Ok(Self::Cancelled),
            "lost" => Ok(Self::Lost),
            other => Err(UnknownVariant::new("estimate status", other)),
        }
    }
}

impl fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of property being moved.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    #[default]
    House,
    Apartment,
    Commercial,
    Storage,
}

impl MoveType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Commercial => "commercial",
            Self::Storage => "storage",
        }
    }

    /// Residence size types the quote form offers for this move, in display order.
    pub fn residence_size_types(self) -> &'static [&'static str] {
        match self {
            Self::House => &["house_bedrooms", "house_sqft"],
            Self::Apartment => &["apartment"],
            Self::Storage => &["storage"],
            Self::Commercial => &[],
        }
    }
}

impl FromStr for MoveType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "house" => Ok(Self::House),
            "apartment" => Ok(Self::Apartment),
            "commercial" => Ok(Self::Commercial),
            "storage" => Ok(Self::Storage),
            other => Err(UnknownVariant::new("move type", other)),
        }
    }
}

/// Scope of work requested by the customer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveService {
    #[default]
    #[serde(rename = "moving")]
    Moving,
    #[serde(rename = "packing")]
    Packing,
    #[serde(rename = "moving and packing")]
    MovingAndPacking,
    #[serde(rename = "junk removal")]
    JunkRemoval,
    #[serde(rename = "labor only")]
    LaborOnly,
}

impl MoveService {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Moving => "moving",
            Self::Packing => "packing",
            Self::MovingAndPacking => "moving and packing",
            Self::JunkRemoval => "junk removal",
            Self::LaborOnly => "labor only",
        }
    }
}

impl FromStr for MoveService {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "moving" => Ok(Self::Moving),
            "packing" => Ok(Self::Packing),
            "moving and packing" => Ok(Self::MovingAndPacking),
            "junk removal" => Ok(Self::JunkRemoval),
            "labor only" => Ok(Self::LaborOnly),
            other => Err(UnknownVariant::new("move service", other)),
        }
    }
}

/// A figure that is either derived by the pricing engine or pinned by an operator.
///
/// Pinned values survive every recalculation until they are released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Computed<T> {
    Auto(T),
    Manual(T),
}

impl<T: Copy> Computed<T> {
    /// Rebuild from the stored value and its override flag.
    pub fn from_parts(value: T, overridden: bool) -> Self {
        if overridden {
            Self::Manual(value)
        } else {
            Self::Auto(value)
        }
    }

    pub fn value(&self) -> T {
        match self {
            Self::Auto(value) | Self::Manual(value) => *value,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual(_))
    }

    /// Replace an automatic value with `derive()`; manual values are returned untouched.
    pub fn recompute(self, derive: impl FnOnce() -> T) -> Self {
        match self {
            Self::Manual(value) => Self::Manual(value),
            Self::Auto(_) => Self::Auto(derive()),
        }
    }

    /// Hand the field back to the engine, keeping the last value until the next run.
    pub fn release(self) -> Self {
        Self::Auto(self.value())
    }
}

impl<T: Default> Default for Computed<T> {
    fn default() -> Self {
        Self::Auto(T::default())
    }
}

/// Estimate fields that an operator may pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateField {
    TotalWeight,
    TotalVolume,
    EstimatedHours,
    NumberOfMovers,
    NumberOfTrucks,
    DistanceMiles,
    DepotTravelTime,
    MoveTravelTime,
    TotalMoveTime,
    LaborCost,
    TruckCost,
    FuelCost,
    TotalCost,
}

impl EstimateField {
    pub const ALL: [EstimateField; 13] = [
        Self::TotalWeight,
        Self::TotalVolume,
        Self::EstimatedHours,
        Self::NumberOfMovers,
        Self::NumberOfTrucks,
        Self::DistanceMiles,
        Self::DepotTravelTime,
        Self::MoveTravelTime,
        Self::TotalMoveTime,
        Self::LaborCost,
        Self::TruckCost,
        Self::FuelCost,
        Self::TotalCost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TotalWeight => "total_weight",
            Self::TotalVolume => "total_volume",
            Self::EstimatedHours => "estimated_hours",
            Self::NumberOfMovers => "number_of_movers",
            Self::NumberOfTrucks => "number_of_trucks",
            Self::DistanceMiles => "distance_miles",
            Self::DepotTravelTime => "depot_travel_time",
            Self::MoveTravelTime => "move_travel_time",
            Self::TotalMoveTime => "total_move_time",
            Self::LaborCost => "labor_cost",
            Self::TruckCost => "truck_cost",
            Self::FuelCost => "fuel_cost",
            Self::TotalCost => "total_cost",
        }
    }

    /// Counts of people and vehicles are whole numbers.
    pub fn is_integral(self) -> bool {
        matches!(self, Self::NumberOfMovers | Self::NumberOfTrucks)
    }
}

impl FromStr for EstimateField {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownVariant::new("estimate field", value))
    }
}

/// Operator action on a single pinnable field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FigureEdit {
    /// Store the value and mark the field as overridden.
    Pin(f64),
    /// Clear the override flag so the next recalculation derives the value.
    Release,
}

/// Every computed figure of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EstimateFigures {
    /// Total weight of the load in pounds.
    pub total_weight: Computed<f64>,
    /// Total volume of the load in cubic feet.
    pub total_volume: Computed<f64>,
    /// Labor hours rounded up to the quarter hour.
    pub estimated_hours: Computed<f64>,
    /// Crew size.
    pub number_of_movers: Computed<i32>,
    /// Truck count.
    pub number_of_trucks: Computed<i32>,
    /// Driving distance between the stops in miles.
    pub distance_miles: Computed<f64>,
    /// Hours spent driving from and back to the depot.
    pub depot_travel_time: Computed<f64>,
    /// Hours spent driving between the stops.
    pub move_travel_time: Computed<f64>,
    /// Labor hours plus travel hours.
    pub total_move_time: Computed<f64>,
    pub labor_cost: Computed<f64>,
    pub truck_cost: Computed<f64>,
    pub fuel_cost: Computed<f64>,
    /// Selected services plus manual additional line items; always derived.
    pub additional_services_cost: f64,
    pub total_cost: Computed<f64>,
}

impl EstimateFigures {
    /// Apply an operator edit to one field.
    pub fn apply(&mut self, field: EstimateField, edit: FigureEdit) {
        fn edit_f64(slot: &mut Computed<f64>, edit: FigureEdit) {
            *slot = match edit {
                FigureEdit::Pin(value) => Computed::Manual(value),
                FigureEdit::Release => slot.release(),
            };
        }
        fn edit_i32(slot: &mut Computed<i32>, edit: FigureEdit) {
            *slot = match edit {
                FigureEdit::Pin(value) => Computed::Manual(value.round() as i32),
                FigureEdit::Release => slot.release(),
            };
        }

        match field {
            EstimateField::TotalWeight => edit_f64(&mut self.total_weight, edit),
            EstimateField::TotalVolume => edit_f64(&mut self.total_volume, edit),
            EstimateField::EstimatedHours => edit_f64(&mut self.estimated_hours, edit),
            EstimateField::NumberOfMovers => edit_i32(&mut self.number_of_movers, edit),
            EstimateField::NumberOfTrucks => edit_i32(&mut self.number_of_trucks, edit),
            EstimateField::DistanceMiles => edit_f64(&mut self.distance_miles, edit),
            EstimateField::DepotTravelTime => edit_f64(&mut self.depot_travel_time, edit),
            EstimateField::MoveTravelTime => edit_f64(&mut self.move_travel_time, edit),
            EstimateField::TotalMoveTime => edit_f64(&mut self.total_move_time, edit),
            EstimateField::LaborCost => edit_f64(&mut self.labor_cost, edit),
            EstimateField::TruckCost => edit_f64(&mut self.truck_cost, edit),
            EstimateField::FuelCost => edit_f64(&mut self.fuel_cost, edit),
            EstimateField::TotalCost => edit_f64(&mut self.total_cost, edit),
        }
    }

    pub fn is_manual(&self, field: EstimateField) -> bool {
        match field {
            EstimateField::TotalWeight => self.total_weight.is_manual(),
            EstimateField::TotalVolume => self.total_volume.is_manual(),
            EstimateField::EstimatedHours => self.estimated_hours.is_manual(),
            EstimateField::NumberOfMovers => self.number_of_movers.is_manual(),
            EstimateField::NumberOfTrucks => self.number_of_trucks.is_manual(),
            EstimateField::DistanceMiles => self.distance_miles.is_manual(),
            EstimateField::DepotTravelTime => self.depot_travel_time.is_manual(),
            EstimateField::MoveTravelTime => self.move_travel_time.is_manual(),
            EstimateField::TotalMoveTime => self.total_move_time.is_manual(),
            EstimateField::LaborCost => self.labor_cost.is_manual(),
            EstimateField::TruckCost => self.truck_cost.is_manual(),
            EstimateField::FuelCost => self.fuel_cost.is_manual(),
            EstimateField::TotalCost => self.total_cost.is_manual(),
        }
    }
}

/// Domain representation of a moving estimate together with its children.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Estimate {
    /// Unique identifier of the estimate.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional reference to the customer requesting the move.
    pub customer_id: Option<i32>,
    /// Sizing strategy.
    pub method: EstimateMethod,
    /// Current lifecycle status.
    pub status: EstimateStatus,
    pub move_type: MoveType,
    pub move_service: MoveService,
    /// Requested moving day.
    pub move_date: Option<NaiveDate>,
    /// Optional notes supplied by the operator or the customer.
    pub notes: Option<String>,
    /// Derived and pinned figures.
    pub figures: EstimateFigures,
    /// Stops ordered by sequence.
    pub stops: Vec<Stop>,
    /// Cost breakdown rows.
    pub line_items: Vec<LineItem>,
    /// Timestamp for when the estimate record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the estimate record.
    pub updated_at: NaiveDateTime,
}

impl Estimate {
    /// Sum of the manual `additional` line items.
    pub fn manual_additional_total(&self) -> f64 {
        self.line_items
            .iter()
            .filter(|item| !item.kind.is_generated())
            .map(|item| item.total_cost)
            .sum()
    }
}

/// Payload required to insert a new estimate for a hub.
#[derive(Debug, Clone)]
pub struct NewEstimate {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional reference to the customer requesting the move.
    pub customer_id: Option<i32>,
    pub method: EstimateMethod,
    pub status: EstimateStatus,
    pub move_type: MoveType,
    pub move_service: MoveService,
    pub move_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Initial figures, usually all automatic.
    pub figures: EstimateFigures,
    /// Stops inserted in the given order.
    pub stops: Vec<NewStop>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewEstimate {
    /// Build a new estimate payload with the current timestamp.
    pub fn new(hub_id: i32, move_type: MoveType, move_service: MoveService) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            customer_id: None,
            method: EstimateMethod::default(),
            status: EstimateStatus::default(),
            move_type,
            move_service,
            move_date: None,
            notes: None,
            figures: EstimateFigures::default(),
            stops: Vec::new(),
            updated_at: now,
        }
    }

    pub fn with_customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_method(mut self, method: EstimateMethod) -> Self {
        self.method = method;
        self
    }

    /// Override the default `new lead` status.
    pub fn with_status(mut self, status: EstimateStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_move_date(mut self, move_date: NaiveDate) -> Self {
        self.move_date = Some(move_date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Pin an initial figure.
    pub fn with_figure(mut self, field: EstimateField, value: f64) -> Self {
        self.figures.apply(field, FigureEdit::Pin(value));
        self
    }

    /// Append a stop; stops keep their insertion order.
    pub fn with_stop(mut self, stop: NewStop) -> Self {
        self.stops.push(stop);
        self
    }
}

/// Patch data applied when updating an existing estimate.
#[derive(Debug, Clone)]
pub struct UpdateEstimate {
    pub customer_id: Option<Option<i32>>,
    pub method: Option<EstimateMethod>,
    pub status: Option<EstimateStatus>,
    pub move_type: Option<MoveType>,
    pub move_service: Option<MoveService>,
    pub move_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
    /// Pins and releases applied in order.
    pub figures: Vec<(EstimateField, FigureEdit)>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateEstimate {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateEstimate {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            customer_id: None,
            method: None,
            status: None,
            move_type: None,
            move_service: None,
            move_date: None,
            notes: None,
            figures: Vec::new(),
            updated_at: now,
        }
    }

    pub fn customer_id(mut self, customer_id: Option<i32>) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn method(mut self, method: EstimateMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn status(mut self, status: EstimateStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn move_type(mut self, move_type: MoveType) -> Self {
        self.move_type = Some(move_type);
        self
    }

    pub fn move_service(mut self, move_service: MoveService) -> Self {
        self.move_service = Some(move_service);
        self
    }

    pub fn move_date(mut self, move_date: Option<NaiveDate>) -> Self {
        self.move_date = Some(move_date);
        self
    }

    /// Update the notes, using `None` to clear an existing value.
    pub fn notes(mut self, notes: Option<impl Into<String>>) -> Self {
        self.notes = Some(notes.map(|value| value.into()));
        self
    }

    /// Pin `field` to `value`.
    pub fn pin(mut self, field: EstimateField, value: f64) -> Self {
        self.figures.push((field, FigureEdit::Pin(value)));
        self
    }

    /// Release a previously pinned field.
    pub fn release(mut self, field: EstimateField) -> Self {
        self.figures.push((field, FigureEdit::Release));
        self
    }

    /// Whether the patch touches any computed figure.
    pub fn changes_figures(&self) -> bool {
        !self.figures.is_empty() || self.method.is_some()
    }

    /// Apply the patch to an estimate loaded from storage.
    pub fn apply_to(&self, estimate: &mut Estimate) {
        if let Some(customer_id) = self.customer_id {
            estimate.customer_id = customer_id;
        }
        if let Some(method) = self.method {
            estimate.method = method;
        }
        if let Some(status) = self.status {
            estimate.status = status;
        }
        if let Some(move_type) = self.move_type {
            estimate.move_type = move_type;
        }
        if let Some(move_service) = self.move_service {
            estimate.move_service = move_service;
        }
        if let Some(move_date) = self.move_date {
            estimate.move_date = move_date;
        }
        if let Some(notes) = &self.notes {
            estimate.notes = notes.clone();
        }
        for (field, edit) in &self.figures {
            estimate.figures.apply(*field, *edit);
        }
        estimate.updated_at = self.updated_at;
    }
}

/// Outcome of a recalculation, written atomically.
#[derive(Debug, Clone)]
pub struct EstimateCommit {
    /// Structural stop edit that triggered the recalculation.
    pub stop_change: Option<StopChange>,
    /// Stored stops that were geocoded during the run.
    pub located: Vec<StopCoordinates>,
    pub figures: EstimateFigures,
    /// Replacement for every generated line item.
    pub line_items: Vec<NewLineItem>,
    /// When false the stored figures and generated line items are left alone.
    pub reprice: bool,
    /// Timestamp captured when the commit was built.
    pub updated_at: NaiveDateTime,
}

impl EstimateCommit {
    pub fn new(figures: EstimateFigures, line_items: Vec<NewLineItem>) -> Self {
        Self {
            stop_change: None,
            located: Vec::new(),
            figures,
            line_items,
            reprice: true,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Stores stop edits and coordinates only, for estimates that cannot be
    /// priced yet.
    pub fn unpriced(figures: EstimateFigures) -> Self {
        Self {
            reprice: false,
            ..Self::new(figures, Vec::new())
        }
    }

    pub fn with_stop_change(mut self, change: StopChange) -> Self {
        self.stop_change = Some(change);
        self
    }

    pub fn with_located(mut self, located: Vec<StopCoordinates>) -> Self {
        self.located = located;
        self
    }
}

/// Query definition used to list estimates for a hub.
#[derive(Debug, Clone)]
pub struct EstimateListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional status filter.
    pub status: Option<EstimateStatus>,
    /// Optional customer identifier filter.
    pub customer_id: Option<i32>,
    /// Optional search term that matches the notes.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl EstimateListQuery {
    /// Construct a query that targets all estimates belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            status: None,
            customer_id: None,
            search: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: EstimateStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
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
    fn recompute_keeps_manual_values() {
        let pinned = Computed::Manual(5000.0);
        assert_eq!(pinned.recompute(|| 1.0), Computed::Manual(5000.0));

        let derived = Computed::Auto(0.0);
        assert_eq!(derived.recompute(|| 1.0), Computed::Auto(1.0));
    }

    #[test]
    fn release_returns_field_to_engine() {
        let mut figures = EstimateFigures::default();
        figures.apply(EstimateField::NumberOfMovers, FigureEdit::Pin(3.0));
        assert_eq!(figures.number_of_movers, Computed::Manual(3));
        assert!(figures.is_manual(EstimateField::NumberOfMovers));

        figures.apply(EstimateField::NumberOfMovers, FigureEdit::Release);
        assert_eq!(figures.number_of_movers, Computed::Auto(3));
        assert!(!figures.is_manual(EstimateField::NumberOfMovers));
    }

    #[test]
    fn status_strings_match_storage_format() {
        for status in [
            EstimateStatus::NewLead,
            EstimateStatus::Estimate,
            EstimateStatus::Booked,
            EstimateStatus::Closed,
            EstimateStatus::Cancelled,
            EstimateStatus::Lost,
        ] {
            assert_eq!(status.as_str().parse::<EstimateStatus>(), Ok(status));
        }
        assert_eq!(
            serde_json::to_string(&EstimateStatus::NewLead).unwrap(),
            "\"new lead\""
        );
        assert!("open".parse::<EstimateStatus>().is_err());
    }

    #[test]
    fn terminal_statuses_are_final() {
        assert!(EstimateStatus::NewLead.can_transition_to(EstimateStatus::Estimate));
        assert!(EstimateStatus::Estimate.can_transition_to(EstimateStatus::Lost));
        assert!(EstimateStatus::Booked.can_transition_to(EstimateStatus::Closed));
        assert!(!EstimateStatus::NewLead.can_transition_to(EstimateStatus::Closed));
        assert!(!EstimateStatus::Closed.can_transition_to(EstimateStatus::Booked));
        assert!(!EstimateStatus::Cancelled.can_transition_to(EstimateStatus::NewLead));
        assert!(EstimateStatus::Lost.can_transition_to(EstimateStatus::Lost));
    }

    #[test]
    fn field_names_parse() {
        for field in EstimateField::ALL {
            assert_eq!(field.as_str().parse::<EstimateField>(), Ok(field));
        }
        assert!("additional_services_cost".parse::<EstimateField>().is_err());
    }

    #[test]
    fn update_applies_pins_in_order() {
        let now = chrono::Local::now().naive_utc();
        let mut estimate = Estimate {
            id: 1,
            hub_id: 1,
            customer_id: None,
            method: EstimateMethod::Inventory,
            status: EstimateStatus::NewLead,
            move_type: MoveType::House,
            move_service: MoveService::Moving,
            move_date: None,
            notes: None,
            figures: EstimateFigures::default(),
            stops: Vec::new(),
            line_items: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        UpdateEstimate::new()
            .pin(EstimateField::TotalWeight, 5000.0)
            .pin(EstimateField::TotalCost, 10.0)
            .release(EstimateField::TotalCost)
            .notes(Some("fragile"))
            .apply_to(&mut estimate);

        assert_eq!(estimate.figures.total_weight, Computed::Manual(5000.0));
        assert_eq!(estimate.figures.total_cost, Computed::Auto(10.0));
        assert_eq!(estimate.notes.as_deref(), Some("fragile"));
    }
}
