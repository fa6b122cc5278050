use anyhow::Result;
use clap::Parser;
use question_solver::app::App;
use question_solver::config::Config;
use question_solver::web;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "question-solver")]
#[command(about = "Serve the AI question solver page")]
struct CliArgs {
    /// Address the page is served on.
    #[arg(long, env = "SOLVER_BIND", default_value = "127.0.0.1:8501")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "question_solver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = Arc::new(App::new(&config));
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Serving question solver on http://{}", listener.local_addr()?);

    axum::serve(listener, web::router(app)).await?;
    Ok(())
}
