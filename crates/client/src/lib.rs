//! `learnhub-client`: the REST collaborator and the flows built on it.
//!
//! Wires the session store (`learnhub-auth`) and the form schemas
//! (`learnhub-validation`) to the backend over HTTP.

pub mod catalog;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod models;
pub mod services;

pub use catalog::CourseCatalog;
pub use config::ClientConfig;
pub use error::ApiError;
pub use flows::{AuthFlow, FormFailure, SubmitGate};
pub use http::ApiClient;
