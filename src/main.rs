use clap::Parser;

use crosswalk_loader::interfaces::cli::{run, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(count) => println!("Loaded {} rows into crosswalk.", count),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
