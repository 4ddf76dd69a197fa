//! Grove - service of record for the eco-living platform
//!
//! Grove backs the eco-living app with server-side accounts, a credits
//! ledger, an action-proof review queue, a marketplace, a mock
//! waste-pickup dispatcher, and a chat/image-classification proxy over
//! a hosted generative model.
//!
//! ## Services
//!
//! - **Auth**: registration, login, JWT sessions, admin allow-list
//! - **Ledger**: per-user credits/tasks/purchases/pickups aggregate
//! - **Review**: pending proofs resolved once, approval credits points
//! - **Catalog**: admin-managed sustainability actions
//! - **Market**: fixed item catalog spending earned credits
//! - **AI gateway**: chat and trash classification via a hosted model

pub mod ai;
pub mod auth;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{GroveError, Result};
