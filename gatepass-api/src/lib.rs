pub mod admin;
pub mod auth;
pub mod banks;
pub mod bookings;
pub mod cli;
pub mod client;
pub mod error;
pub mod events;
pub mod organizer;
pub mod state;

pub use client::ApiClient;
pub use error::ApiError;
pub use state::AppState;
