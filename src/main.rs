// src/main.rs

use silentcmd::config::load_defaults;
use silentcmd::engine::system_engine;
use silentcmd::types::EXIT_INTERNAL_ERROR;
use silentcmd::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("silentcmd error: {err:?}");
            EXIT_INTERNAL_ERROR
        }
    };
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    let defaults = load_defaults(args.defaults.as_deref())?;
    logging::init_logging(args.log_level, defaults.log_level.as_deref())?;

    let engine = system_engine();
    Ok(run(&args, &defaults, &engine).await)
}
