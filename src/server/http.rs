//! HTTP server implementation
//!
//! hyper http1 with TokioIo; one `(method, path)` match routes every
//! request to its handler.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::ai::GenerativeModel;
use crate::auth::JwtValidator;
use crate::config::Args;
use crate::db::Stores;
use crate::routes;
use crate::routes::helpers::{cors_preflight, not_found, BoxBody};
use crate::types::GroveError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Admin email allow-list, lowercased
    pub admin_emails: Vec<String>,
    /// Session token generator/validator
    pub jwt: JwtValidator,
    /// Store handles; absent when MongoDB is unavailable in dev mode
    stores: Option<Stores>,
    /// Model backend; absent when no API key is configured in dev mode
    model: Option<Arc<dyn GenerativeModel>>,
}

impl AppState {
    pub fn new(
        args: Args,
        stores: Option<Stores>,
        model: Option<Arc<dyn GenerativeModel>>,
    ) -> Result<Self, GroveError> {
        let jwt = JwtValidator::new(args.jwt_secret(), args.jwt_expiry_seconds)?;
        let admin_emails = args.admin_email_list();

        Ok(Self {
            args,
            admin_emails,
            jwt,
            stores,
            model,
        })
    }

    /// The store handles, or the "not initialized" failure
    pub fn stores(&self) -> Result<&Stores, GroveError> {
        self.stores
            .as_ref()
            .ok_or_else(|| GroveError::Database("Store not initialized".into()))
    }

    /// The model backend, or a configuration failure
    pub fn model(&self) -> Result<&Arc<dyn GenerativeModel>, GroveError> {
        self.model
            .as_ref()
            .ok_or_else(|| GroveError::Model("Model backend not configured".into()))
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), GroveError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Grove listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - missing backends degrade to 503");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        // Liveness and readiness probes
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            to_boxed(routes::health_check(Arc::clone(&state)))
        }
        (Method::GET, "/ready") | (Method::GET, "/readyz") => {
            to_boxed(routes::readiness_check(Arc::clone(&state)))
        }
        (Method::GET, "/version") => to_boxed(routes::version_info()),

        // Authentication
        (Method::POST, "/auth/register") => routes::handle_register(req, state).await,
        (Method::POST, "/auth/login") => routes::handle_login(req, state).await,
        (Method::GET, "/auth/me") => routes::handle_me(req, state).await,

        // Ledger
        (Method::GET, "/api/stats") => routes::handle_stats(req, state).await,
        (Method::POST, "/api/admin/credits") => routes::handle_admin_credits(req, state).await,

        // Action catalog
        (Method::GET, "/api/actions") => routes::handle_actions_list(req, state).await,
        (Method::POST, "/api/admin/actions") => routes::handle_action_create(req, state).await,
        (Method::DELETE, p) if p.starts_with("/api/admin/actions/") => {
            let id = p.trim_start_matches("/api/admin/actions/").to_string();
            routes::handle_action_delete(req, state, &id).await
        }

        // Submissions and review
        (Method::POST, "/api/submissions") => routes::handle_submission_create(req, state).await,
        (Method::GET, "/api/admin/submissions") => {
            routes::handle_submissions_list(req, state).await
        }
        (Method::POST, p)
            if p.starts_with("/api/admin/submissions/") && p.ends_with("/review") =>
        {
            let id = p
                .trim_start_matches("/api/admin/submissions/")
                .trim_end_matches("/review")
                .to_string();
            routes::handle_submission_review(req, state, &id).await
        }

        // Marketplace
        (Method::GET, "/api/market/items") => routes::handle_market_items(req, state).await,
        (Method::POST, "/api/market/purchase") => {
            routes::handle_market_purchase(req, state).await
        }

        // Waste pickup
        (Method::POST, "/api/pickup/quote") => routes::handle_pickup_quote(req, state).await,
        (Method::POST, "/api/pickup/confirm") => routes::handle_pickup_confirm(req, state).await,

        // Chat and classification
        (Method::POST, "/api/chat") => routes::handle_chat(req, state).await,
        (Method::GET, "/api/chat/history") => routes::handle_chat_history(req, state).await,
        (Method::DELETE, "/api/chat/history") => routes::handle_chat_clear(req, state).await,
        (Method::POST, "/api/classify") => routes::handle_classify(req, state).await,

        // CORS preflight
        (Method::OPTIONS, _) => cors_preflight(),

        _ => not_found(&path),
    };

    Ok(response)
}

fn to_boxed(response: Response<Full<Bytes>>) -> Response<BoxBody> {
    response.map(|body| body.map_err(|never| match never {}).boxed())
}
