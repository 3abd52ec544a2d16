use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Builds the log filter, falling back to `info` when `directives` does not parse.
pub fn env_filter(directives: &str) -> EnvFilter {
	EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a stderr subscriber. Binaries whose stdout carries protocol output rely on this.
pub fn init_tracing(directives: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(env_filter(directives))
		.with_writer(std::io::stderr)
		.init();
}
