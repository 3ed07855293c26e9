use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = driva_api::Args::parse();
	driva_api::run(args).await
}
