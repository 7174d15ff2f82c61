pub mod retry;
pub mod usecases;
