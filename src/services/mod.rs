pub mod auth_service;
pub mod stripe_service;

pub use auth_service::{Claims, TokenService};
pub use stripe_service::{PaymentGateway, StripeGateway};
