#![doc = "The `questlog` library crate."]
#![doc = ""]
#![doc = "Core business logic, domain models, the credential refresh authority,"]
#![doc = "routing configuration, outbound mail, and error handling for the"]
#![doc = "questlog backend. The main binary (`main.rs`) uses this crate to"]
#![doc = "construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod models;
pub mod routes;
