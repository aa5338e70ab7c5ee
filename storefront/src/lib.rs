// storefront/src/lib.rs

//! Storefront: product catalog and order placement over a document store.
//!
//! Request flow: `web` (actix-web routes and handlers) → `services`
//! (products, orders, stats) → `store` (a [`store::DocumentStore`] backend).
//! The store handle is built once at startup and injected into every service
//! through [`state::AppState`].

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod web;
