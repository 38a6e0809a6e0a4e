use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

mod auth;
mod backend;
mod config;
mod error;
mod license;
mod logging;
mod models;
mod password;
mod resource;
mod startup;
mod utils;
mod validation;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "taxi-service")]
#[command(about = "A taxi fleet management server")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    // Load configuration from specified file or fall back to defaults
    let mut app_config = if args.config == "config.yaml" && !std::path::Path::new("config.yaml").exists() {
        println!("⚠️  No config.yaml found, using default configuration:");
        println!("   - In-memory SQLite database");
        println!("   - Anonymous access (no authentication)");
        println!("   - API mounted at /api\n");
        AppConfig::default_config()
    } else {
        AppConfig::load_from_file(&args.config)
            .map_err(|e| format!("Failed to load configuration: {}", e))?
    };

    // Command line arguments win over the config file
    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = args.host {
        app_config.server.host = host;
    }

    let backend = startup::setup_backend(&app_config).await?;

    let app_config_arc = Arc::new(app_config.clone());
    let app = startup::build_router(backend, app_config_arc);

    let host: std::net::IpAddr = app_config.server.host.parse().unwrap_or_else(|_| {
        eprintln!(
            "Invalid host address: {}, using 127.0.0.1",
            app_config.server.host
        );
        [127, 0, 0, 1].into()
    });
    let addr = SocketAddr::from((host, app_config.server.port));

    let base_path = app_config.api.resolved_base_path();
    println!("🚕 Taxi service listening on {}", addr);
    match app_config.api.auth.auth_type.as_str() {
        "bearer" => {
            if let Some(token) = &app_config.api.auth.token {
                println!(
                    "   🔒 Authentication: Bearer token (***{})",
                    &token[token.len().saturating_sub(3)..]
                );
            }
        }
        "basic" => {
            if let Some(basic) = &app_config.api.auth.basic {
                println!("   🔒 Authentication: HTTP Basic (user: {})", basic.username);
            }
        }
        _ => {
            println!("   🔓 Authentication: Anonymous access");
        }
    }
    println!("   👤 Drivers: {}/drivers", base_path);
    println!("   🚗 Cars:    {}/cars", base_path);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
