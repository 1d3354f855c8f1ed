use anyhow::anyhow;
use clap::Parser;
use kickstart::server::{AppService, HttpServer};
use kickstart::{logging, App, AppConfig};
use std::sync::Arc;
use tracing::info;

/// Kickstart starter-kit web server
#[derive(Parser)]
#[command(name = "kickstart", about = "Kickstart MVC starter kit server", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080, env = "PORT")]
    port: u16,

    /// Enable debug-level logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Print the routing table at startup
    #[arg(long, default_value_t = false)]
    dump_routes: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_env();
    let _log_guard = logging::init(&config.log_dir, cli.verbose);

    let mut app = App::new(config)?;
    app.get("/", "Home@index")?;
    app.get("/about", "Home@about")?;
    app.get("/api/stats", "Home@stats")?;

    if cli.dump_routes {
        app.router().dump_routes();
    }

    let addr = format!("{}:{}", cli.host, cli.port);
    info!(addr = %addr, "Starting HTTP server");

    let handle = HttpServer(AppService::new(Arc::new(app))).start(&addr)?;
    handle
        .join()
        .map_err(|_| anyhow!("server thread panicked"))?;

    Ok(())
}
