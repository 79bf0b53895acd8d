//! Business logic services for the Weather Dashboard

pub mod auth;
pub mod dashboard;
pub mod location;
pub mod saved_locations;
pub mod subscriptions;

pub use auth::{AuthService, AuthUser, IssuedSession};
pub use dashboard::{DashboardContext, DashboardService, DashboardView};
pub use location::LocationResolver;
pub use saved_locations::SavedLocationService;
pub use subscriptions::SubscriptionService;
