//! Repositories for database operations

pub mod user;
pub mod vehicle;

pub use user::UserRepository;
pub use vehicle::VehicleRepository;
