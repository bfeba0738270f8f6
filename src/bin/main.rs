use clap::Parser;
use music_recommender::config::{Config, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "music-recommender")]
#[command(about = "Track recommendation server", long_about = None)]
struct Args {
    /// Config file. Defaults to music-recommender.yaml if it exists.
    #[arg(short, long)]
    config: Option<String>,
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    config.debug_logs = args.debug;

    let default_filter = if args.debug {
        "music_recommender=debug,tower_http=debug"
    } else {
        "music_recommender=info,tower_http=info"
    };
    let json = config.logformat == LogFormat::Json;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    if let Some(ref path) = args.config {
        tracing::info!("Using config file: {}", path);
    }

    if let Err(e) = music_recommender::run(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
