//! Trivy Gateway - Synchronous container-image scanning API
//!
//! Accepts a container image reference over HTTP, runs the external Trivy
//! scanner against it under a hard wall-clock and memory budget, normalizes
//! the raw report into a stable response schema, and returns it synchronously.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── domain/           # Value objects, entities, errors, scanner trait
//! ├── application/      # Validation, orchestration, normalization
//! ├── infrastructure/   # Trivy subprocess executor + report wire types
//! ├── presentation/     # axum controllers, DTOs, error mapping, routes
//! └── config/           # Layered configuration with validation
//! ```
//!
//! The service is stateless across invocations: every request owns its own
//! scratch storage and scanner subprocess, and nothing survives the
//! request/response cycle except configuration loaded once at startup.

mod app;

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::create_app;
pub use config::Config;
pub use logging::init_tracing;
