pub mod auth;
pub mod health;
pub mod payment_intents;
pub mod payments;
pub mod swagger;
pub mod users;
pub mod work_sheets;
