//! fitlog: backend for a fitness-tracking application.
//!
//! Users register and log in, author workout routines and meals, and
//! combine them into dated journal entries. Documents live in SQLite; each
//! user row carries denormalized backreference arrays of the ids it
//! authored, maintained by best-effort dual writes with no cross-row
//! transactions.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
