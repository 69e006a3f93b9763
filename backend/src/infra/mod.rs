pub mod covers;
pub mod json_store;
pub mod terminal;
pub mod web;
