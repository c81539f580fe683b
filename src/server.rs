//! Wiring — builds the relay, dialogue manager and merged router from config.

use std::sync::Arc;

use axum::Router;

use crate::config::AppConfig;
use crate::contact::{ContactRouteState, contact_routes};
use crate::dialogue::{
    CannedResponder, ChatRouteState, DialogueManager, chat_routes, spawn_idle_sweep,
};
use crate::error::Result;
use crate::relay::{
    HttpRelay, LeadDesk, LeadRelay, LeadStore, LogMailer, Mailer, RelayRouteState, SmtpMailer,
    relay_routes,
};

/// Everything the binary needs to serve.
pub struct App {
    pub router: Router,
    pub manager: Arc<DialogueManager>,
    pub desk: Arc<LeadDesk>,
}

/// Assemble the application.
pub fn build_app(config: &AppConfig) -> Result<App> {
    let mailer: Arc<dyn Mailer> = match config.smtp.clone() {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "SMTP delivery enabled");
            Arc::new(SmtpMailer::new(smtp))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, lead emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let store = Arc::new(LeadStore::new(config.leads_file.clone()));
    let desk = Arc::new(LeadDesk::new(store, mailer, config.owner.clone()));

    let relay: Arc<dyn LeadRelay> = match config.relay_url {
        Some(ref url) => {
            tracing::info!(endpoint = %url, "Chat leads go to external relay");
            Arc::new(HttpRelay::new(url.clone(), config.relay_timeout)?)
        }
        None => Arc::clone(&desk) as Arc<dyn LeadRelay>,
    };

    let responder = Arc::new(CannedResponder::new(config.fallback_reply.clone()));
    let manager = DialogueManager::new(Arc::clone(&relay), responder);

    let router = relay_routes(RelayRouteState {
        desk: Arc::clone(&desk),
    })
    .merge(chat_routes(ChatRouteState {
        manager: Arc::clone(&manager),
    }))
    .merge(contact_routes(ContactRouteState { relay }));

    Ok(App {
        router,
        manager,
        desk,
    })
}

/// Build the app, start the idle sweep and serve until the listener fails.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let app = build_app(config)?;
    let _sweep_handle = spawn_idle_sweep(Arc::clone(&app.manager), config.session_idle_timeout);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    tracing::info!(addr = %config.listen_addr(), "Lead server started");
    axum::serve(listener, app.router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{DEFAULT_FALLBACK_REPLY, OwnerConfig};
    use crate::error::Error;

    fn test_config(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig {
            bind: "127.0.0.1".into(),
            port: 0,
            leads_file: dir.path().join("leads.json"),
            relay_url: None,
            relay_timeout: Duration::from_secs(1),
            owner: OwnerConfig {
                email: "owner@example.com".into(),
                name: "Owner".into(),
            },
            session_idle_timeout: Duration::from_secs(60),
            fallback_reply: DEFAULT_FALLBACK_REPLY.into(),
            smtp: None,
        }
    }

    #[tokio::test]
    async fn builds_with_external_relay() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            relay_url: Some("http://127.0.0.1:1/send_email".into()),
            ..test_config(&dir)
        };
        let app = build_app(&config).unwrap();
        assert!(app.manager.is_empty().await);
    }

    #[tokio::test]
    async fn occupied_port_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = AppConfig {
            port: taken.local_addr().unwrap().port(),
            ..test_config(&dir)
        };

        let err = serve(&config).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)), "{err}");
    }
}
