use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = roomscout_api::Args::parse();
	roomscout_api::run(args).await
}
