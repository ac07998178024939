//! Library crate for kaboo-ledger, exposing modules for the binary and integration tests.

pub mod config;
pub mod console;
pub mod dao;
pub mod dto;
pub mod error;
pub mod services;
pub mod state;
