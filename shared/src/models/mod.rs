//! Domain models for the Weather Dashboard

mod location;
mod subscription;
mod user;
mod weather;

pub use location::*;
pub use subscription::*;
pub use user::*;
pub use weather::*;
