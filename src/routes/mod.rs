//! HTTP routes for Grove

pub mod actions;
pub mod auth_routes;
pub mod chat;
pub mod classify;
pub mod health;
pub mod helpers;
pub mod market;
pub mod pickup;
pub mod stats;
pub mod submissions;

pub use actions::{handle_action_create, handle_action_delete, handle_actions_list};
pub use auth_routes::{handle_login, handle_me, handle_register};
pub use chat::{handle_chat, handle_chat_clear, handle_chat_history};
pub use classify::handle_classify;
pub use health::{health_check, readiness_check, version_info};
pub use market::{handle_market_items, handle_market_purchase};
pub use pickup::{handle_pickup_confirm, handle_pickup_quote};
pub use stats::{handle_admin_credits, handle_stats};
pub use submissions::{handle_submission_create, handle_submission_review, handle_submissions_list};
