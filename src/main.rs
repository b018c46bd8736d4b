//! # Voxel Streaming Entry Point
//!
//! Runs the library's headless demo walk. Set `VOXEL_STREAMING_CONFIG` to a JSON
//! file to override the streaming parameters and `RUST_LOG` to pick a log level.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() -> anyhow::Result<()> {
    voxel_streaming::run()
}
