pub mod gateway;
pub mod presenter;
