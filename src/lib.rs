//! Grade engine for student records
//!
//! This crate computes final grades from weighted component scores, keeps
//! enrollment records with their derived grades consistent, and aggregates
//! them into GPAs, course averages and rankings. An axum HTTP API and a
//! chatbot data-lookup layer sit on top.

#![warn(missing_docs)]

pub mod api;
pub mod assistant;
pub mod calculation;
pub mod config;
pub mod error;
pub mod gradebook;
pub mod models;
pub mod repository;
pub mod validation;
