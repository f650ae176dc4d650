//! Interaction core for a catalog browser: a list of entries with a live
//! preview pane, driven by pointer hover on desktop and by a rotating picker
//! on touch devices.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod media;
pub mod models;
pub mod navigator;
pub mod selection;

pub use catalog::{Catalog, CatalogOrder};
pub use config::NavigatorConfig;
pub use navigator::{CatalogNavigator, Environment, NavigationLog, NavigationSink, NavigatorView};
