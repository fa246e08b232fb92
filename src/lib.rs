// src/lib.rs

//! Transmog set catalog backend library.

pub mod api;
pub mod classify;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod services;
pub mod storage;
