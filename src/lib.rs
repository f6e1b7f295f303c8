// SPDX-License-Identifier: MIT

//! FitSpark sync backend.
//!
//! This crate provides the batch jobs behind the FitSpark fitness app:
//! pulling Google Fit activity data for connected users and aggregating
//! team leaderboards from the daily activity logs.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::GoogleFitClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub fit: GoogleFitClient,
}
