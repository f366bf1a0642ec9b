pub mod app;
pub mod braille;
pub mod choropleth;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod export;
pub mod geo;
pub mod map;
pub mod ui;
