use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use threadline::core::config::{self, CliOverrides};
use threadline::tui;

#[derive(Parser)]
#[command(name = "threadline", about = "Browse and reply to a threaded comment section")]
struct Args {
    /// Post whose comments to show
    #[arg(short, long)]
    post: Option<u64>,

    /// Comment backend base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Post author, highlighted as OP
    #[arg(long)]
    op: Option<String>,

    /// Show the built-in sample thread instead of fetching one
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to threadline.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("threadline.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        config::ThreadlineConfig::default()
    });
    let cli = CliOverrides {
        base_url: args.base_url,
        post_id: args.post,
        post_author: args.op,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Threadline starting up: post {} from {}",
        resolved.post_id,
        resolved.base_url
    );

    tui::run(resolved, args.demo)
}
