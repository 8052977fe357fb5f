use campus_events::campus::{
    app::App,
    backend::HttpBackend,
    models::{Args, Config},
    run_tool::run,
    token_store::FileTokenStore,
};

use std::process::ExitCode;

use clap::Parser;
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config: Config = match Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Json::file(&args.config_json_path))
        .merge(Env::prefixed("CAMPUS_"))
        .extract()
    {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Read config from {}",
        std::path::absolute(&args.config_json_path)
            .unwrap_or_else(|_| args.config_json_path.clone())
            .display()
    );

    /* Build the client once and bring back any stored session */
    let backend = HttpBackend::new(reqwest::Client::new(), &config.api_url);
    let store = FileTokenStore::new(&config.token_path);
    let mut app = App::new(backend, store);
    app.start().await;

    /* Carry out the command */
    match run(&mut app, args.command, chrono::Utc::now()).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output.trim_end());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
