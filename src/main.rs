//! `pagefx-preview`: the particle backdrop in a native window.
//!
//! ```text
//! pagefx-preview [config.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see resize and frame-rate logging.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), pagefx::PreviewError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading preview config from {}", path);
            pagefx::PreviewConfig::from_json(&std::fs::read_to_string(path)?)?
        }
        None => pagefx::PreviewConfig::default(),
    };
    pagefx::window::run(config)
}

// The browser build starts from `pagefx::web::start`.
#[cfg(target_arch = "wasm32")]
fn main() {}
