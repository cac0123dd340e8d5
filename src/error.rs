//! Error types for the particle field.
//!
//! Failure to draw is never surfaced from the simulation itself (a field
//! without a surface simply stays idle). These errors cover the native host:
//! GPU setup, window creation, configuration loading, and snapshot export.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter(wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter(e) => write!(f, "No compatible GPU adapter found: {}", e),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::NoAdapter(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when loading or validating a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid JSON for a config.
    Parse(serde_json::Error),
    /// A value is out of its allowed range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when running the field in a window or headless.
#[derive(Debug)]
pub enum FieldError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Configuration could not be loaded.
    Config(ConfigError),
    /// Snapshot could not be encoded or written.
    Snapshot(image::ImageError),
    /// Command line arguments were malformed.
    Usage(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            FieldError::Window(e) => write!(f, "Failed to create window: {}", e),
            FieldError::Gpu(e) => write!(f, "GPU error: {}", e),
            FieldError::Config(e) => write!(f, "{}", e),
            FieldError::Snapshot(e) => write!(f, "Failed to write snapshot: {}", e),
            FieldError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::EventLoop(e) => Some(e),
            FieldError::Window(e) => Some(e),
            FieldError::Gpu(e) => Some(e),
            FieldError::Config(e) => Some(e),
            FieldError::Snapshot(e) => Some(e),
            FieldError::Usage(_) => None,
        }
    }
}

impl From<winit::error::EventLoopError> for FieldError {
    fn from(e: winit::error::EventLoopError) -> Self {
        FieldError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for FieldError {
    fn from(e: winit::error::OsError) -> Self {
        FieldError::Window(e)
    }
}

impl From<GpuError> for FieldError {
    fn from(e: GpuError) -> Self {
        FieldError::Gpu(e)
    }
}

impl From<ConfigError> for FieldError {
    fn from(e: ConfigError) -> Self {
        FieldError::Config(e)
    }
}

impl From<image::ImageError> for FieldError {
    fn from(e: image::ImageError) -> Self {
        FieldError::Snapshot(e)
    }
}
