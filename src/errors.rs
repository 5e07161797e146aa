//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`FieldError`] covers every failure mode:
//! - Configuration parsing and validation
//! - Render-device resource allocation
//! - GPU initialization (with the `gpu` feature)
//!
//! Most of these never reach a human: the field is purely decorative, so the
//! lifecycle layer logs the error and simply does not render.
//!
//! ```rust,ignore
//! use cubefield::errors::{FieldError, Result};
//!
//! fn load() -> Result<FieldConfig> {
//!     FieldConfig::from_json_file("field.json")
//! }
//! ```

use thiserror::Error;

use crate::renderer::ResourceKind;

/// The main error type for the cube field.
#[derive(Error, Debug)]
pub enum FieldError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// The device refused to allocate another resource.
    #[error("Resource budget exceeded while creating {kind:?} (limit: {limit})")]
    ResourceBudgetExceeded {
        /// Kind of resource that was being created
        kind: ResourceKind,
        /// The configured budget
        limit: usize,
    },

    /// A frame referenced a resource the device no longer owns.
    #[error("Unknown or released resource: {0}")]
    UnknownResource(String),

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// The host could not attach, create or present the surface.
    #[error("Surface error: {0}")]
    SurfaceError(String),

    // ========================================================================
    // GPU Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[cfg(feature = "gpu")]
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[cfg(feature = "gpu")]
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),
}

/// Alias for `Result<T, FieldError>`.
pub type Result<T> = std::result::Result<T, FieldError>;
