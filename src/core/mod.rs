// Core module definitions for the GPU toggle control panel

pub mod actions;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod status;
pub mod templates;
