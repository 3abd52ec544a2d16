use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = recall_anki_bridge::Args::parse();
	recall_anki_bridge::run(args).await
}
