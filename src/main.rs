use portfolio_leads::config::AppConfig;
use portfolio_leads::server::serve;

#[tokio::main]
async fn main() -> portfolio_leads::error::Result<()> {
    // Install rustls crypto provider before any TLS usage
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Warning: a rustls crypto provider was already installed");
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export LEADS_OWNER_EMAIL=you@example.com");
        std::process::exit(1);
    });

    eprintln!("📬 Portfolio Leads v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Relay: http://{}/send_email", config.listen_addr());
    eprintln!("   Chat API: http://{}/api/chat/sessions", config.listen_addr());
    eprintln!("   Contact API: http://{}/api/contact", config.listen_addr());
    eprintln!("   Leads file: {}", config.leads_file.display());
    eprintln!(
        "   SMTP: {}",
        config
            .smtp
            .as_ref()
            .map_or_else(|| "disabled (log only)".to_string(), |s| s.host.clone())
    );

    serve(&config).await
}
