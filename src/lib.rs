//! Brand Console Library
//!
//! Client-side core of the brand management console: validation rules, the
//! REST API client, the brand list controller and the create/edit forms. The
//! `brand-console` binary is a terminal front end over these pieces.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod api;
pub mod config;
pub mod controller;
pub mod display;
pub mod errors;
pub mod form;
pub mod models;
pub mod notifier;
pub mod validation;

pub use api::{BrandApi, HttpBrandApi};
pub use config::AppConfig;
pub use controller::{BrandListController, Confirm, DeleteOutcome, FetchHandle, FetchOutcome};
pub use errors::ServiceError;
pub use form::{BrandForm, FormMode, SubmitOutcome};
pub use notifier::{ConsoleNotifier, MemoryNotifier, Notification, NotificationKind, Notifier};
pub use validation::{validate_brand_form, BrandFormValues, FormErrors, FormField};
