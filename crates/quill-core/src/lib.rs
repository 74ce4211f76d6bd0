//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! Entities, ports, and the content-query pipeline (visibility, pagination,
//! tag similarity, full-text search). No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;
pub mod query;
pub mod service;

pub use error::DomainError;
pub use service::BlogService;
