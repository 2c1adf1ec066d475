pub mod health;
pub mod shield;
