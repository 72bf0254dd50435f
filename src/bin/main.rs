use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moviecanon-server")]
#[command(about = "Voting and detail-generation API for the movie canon", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "moviecanon-server.yaml")]
    config: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "moviecanon_rs=debug,tower_http=debug"
    } else {
        "moviecanon_rs=info,tower_http=info"
    };

    let json_layer = args.json_logs.then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!args.json_logs).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();

    if let Err(e) = moviecanon_rs::run(&args.config, args.debug).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
