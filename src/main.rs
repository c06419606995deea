// src/main.rs

use cncwatch::{cli, load_config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("cncwatch error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let cfg = load_config(&args)?;

    let level = logging::resolve_level(args.log_level, cfg.log_level());
    let log_file = if args.no_log_file {
        None
    } else {
        args.log_file.clone().or_else(|| cfg.log_file().map(|p| p.to_path_buf()))
    };
    logging::init_logging(level, log_file.as_deref())?;

    run(args, cfg).await
}
