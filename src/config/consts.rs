/// Bind channels to the hardware engine whenever it can serve one.
pub const DEFAULT_PREFER_HARDWARE: bool = true;
/// Log filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";
