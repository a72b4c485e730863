//! # Timetable Rust Backend
//!
//! Timetable generation and conflict-resolution engine for a school
//! administration system.
//!
//! Given a class's teacher/subject assignments and teacher availability
//! constraints, the engine produces a weekly schedule of (day, period) slots
//! with no double-bookings, validates persisted schedules for violations, and
//! auto-resolves detected conflicts by relocating or removing slots. The
//! engine is best-effort: it never guarantees a fully assigned schedule, but
//! it always reports exactly what could not be placed.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) shared by the engine and the API
//! - [`models`]: Pure domain data (days, slots, schedules, restricted periods)
//! - [`db`]: Repository trait and storage backends
//! - [`engine`]: Generation, validation and conflict-resolution logic
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! All storage access goes through the [`db::TimetableRepository`] trait, so
//! the constraint-checking and selection logic stays deterministic and
//! unit-testable without a live store. Every run builds its own in-memory
//! context upfront; the engine holds no shared mutable state between runs.

pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
