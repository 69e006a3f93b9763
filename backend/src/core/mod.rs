pub mod app;
pub mod input;
pub mod models;
pub mod record;
pub mod registry;
pub mod storage;
