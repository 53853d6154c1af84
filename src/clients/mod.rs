pub mod hevy;
pub mod models;
