use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    glassify::init_logger();
    glassify::run(glassify::cli::Cli::parse()).await
}
