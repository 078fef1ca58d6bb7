pub mod dom;
pub mod health_check;
pub mod runner;
