pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod form;
pub mod keys;
pub mod listing;
pub mod preferences;
pub mod receipts;
pub mod session;
pub mod wizard;
