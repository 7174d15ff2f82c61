pub mod activities;
pub mod activity_data_access;
pub mod health;
