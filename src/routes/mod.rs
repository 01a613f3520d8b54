//! HTTP route handlers grouped by resource.
//!
//! Each submodule exposes typed Rocket handlers annotated with `#[openapi]`
//! so `rocket_okapi` can derive an OpenAPI document automatically. Session
//! enforcement happens in the request guards the handlers take as arguments,
//! never in the handler bodies.

pub mod health;
pub(crate) mod helpers;
pub mod items;
pub mod lists;
pub mod params;
pub mod users;
