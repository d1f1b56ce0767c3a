mod admin;
mod auth;
mod counselor;
pub mod dto;
mod extract;
pub mod home;
mod principal;
mod profile;
mod registration;
pub mod response;
mod router;
mod scope;
mod simulation;
mod students;
mod universities;
pub mod validation;

pub use router::{AppState, create_router};
