//! Patient emergency information service.
//!
//! A scanned QR token is resolved into a patient's emergency profile through
//! `POST /api/emergency/verify-qr`, backed by either Postgres or a local
//! SQLite file depending on environment configuration. The `scan` module
//! holds the client-side scan session that drives an external camera scanner
//! and calls the endpoint.

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod scan;
