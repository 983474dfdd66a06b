//! Error types for the native preview.
//!
//! The browser build has no fallible setup: a missing canvas or context
//! just means no backdrop (see [`InitSkip`](crate::animator::InitSkip)).
//! The native preview can fail to open a window, find a GPU or read its
//! config file.

use std::fmt;

/// Why the preview could not get a drawable GPU surface.
#[derive(Debug)]
pub enum GpuError {
    Surface(wgpu::CreateSurfaceError),
    NoAdapter,
    /// The adapter reported no formats or alpha modes for the window.
    IncompatibleSurface,
    Device(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::Surface(e) => write!(f, "cannot create a surface for the window: {}", e),
            GpuError::NoAdapter => f.write_str("no GPU adapter can present to the window"),
            GpuError::IncompatibleSurface => {
                f.write_str("the window surface has no usable format on this adapter")
            }
            GpuError::Device(e) => write!(f, "cannot open the GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::Surface(e) => Some(e),
            GpuError::Device(e) => Some(e),
            GpuError::NoAdapter | GpuError::IncompatibleSurface => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::Surface(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::Device(e)
    }
}

/// Anything that stops the preview from starting or keeps it from running.
#[derive(Debug)]
pub enum PreviewError {
    EventLoop(winit::error::EventLoopError),
    Window(winit::error::OsError),
    Gpu(GpuError),
    /// Config file could not be read.
    ConfigIo(std::io::Error),
    /// Config file is not valid JSON for [`PreviewConfig`](crate::config::PreviewConfig).
    ConfigParse(serde_json::Error),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewError::EventLoop(e) => write!(f, "event loop failed: {}", e),
            PreviewError::Window(e) => write!(f, "cannot open the preview window: {}", e),
            PreviewError::Gpu(e) => fmt::Display::fmt(e, f),
            PreviewError::ConfigIo(e) => write!(f, "cannot read the preview config: {}", e),
            PreviewError::ConfigParse(e) => write!(f, "preview config is not valid: {}", e),
        }
    }
}

impl std::error::Error for PreviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreviewError::EventLoop(e) => Some(e),
            PreviewError::Window(e) => Some(e),
            PreviewError::Gpu(e) => Some(e),
            PreviewError::ConfigIo(e) => Some(e),
            PreviewError::ConfigParse(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for PreviewError {
    fn from(e: winit::error::EventLoopError) -> Self {
        PreviewError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for PreviewError {
    fn from(e: winit::error::OsError) -> Self {
        PreviewError::Window(e)
    }
}

impl From<GpuError> for PreviewError {
    fn from(e: GpuError) -> Self {
        PreviewError::Gpu(e)
    }
}

impl From<std::io::Error> for PreviewError {
    fn from(e: std::io::Error) -> Self {
        PreviewError::ConfigIo(e)
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(e: serde_json::Error) -> Self {
        PreviewError::ConfigParse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_errors_keep_their_source() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PreviewError::from(parse);
        assert!(err.to_string().starts_with("preview config is not valid"));
        assert!(err.source().is_some());
    }

    #[test]
    fn gpu_errors_wrap_into_preview_errors() {
        let err = PreviewError::from(GpuError::NoAdapter);
        assert_eq!(err.to_string(), GpuError::NoAdapter.to_string());
        assert!(err.source().is_some());
    }
}
