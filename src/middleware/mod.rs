// SPDX-License-Identifier: MIT

//! Middleware for the HTTP trigger surface.

pub mod auth;
