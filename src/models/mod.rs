pub mod catalog;
pub mod customer;
pub mod estimate;
pub mod hub;
pub mod line_item;
pub mod rates;
pub mod stop;
