//! Shared state for the page handlers.

use std::sync::Arc;
use std::time::Duration;

use super::session_cookie::SessionCookie;
use crate::application::{LoginHandler, LogoutHandler, RegisterHandler};
use crate::config::{AppConfig, PredictEncoding};
use crate::ports::{MlBackend, SessionStore, TemplateRenderer};

/// Per-deployment settings the handlers read.
#[derive(Debug, Clone)]
pub struct FrontendSettings {
    pub cookie: SessionCookie,
    pub session_ttl: Duration,
    pub predict_encoding: PredictEncoding,
    pub max_upload_bytes: usize,
    /// Inbound body limit for multipart routes
    pub body_limit: usize,
    pub request_timeout: Duration,
}

impl FrontendSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cookie: SessionCookie::from_config(&config.session, config.is_production()),
            session_ttl: config.session.ttl(),
            predict_encoding: config.backend.predict_encoding,
            max_upload_bytes: config.upload.max_file_bytes,
            body_limit: config.upload.body_limit(),
            request_timeout: config.server.request_timeout(),
        }
    }

    pub fn with_predict_encoding(mut self, encoding: PredictEncoding) -> Self {
        self.predict_encoding = encoding;
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self.body_limit = bytes.saturating_add(1024 * 1024);
        self
    }
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            cookie: SessionCookie::default(),
            session_ttl: Duration::from_secs(86_400),
            predict_encoding: PredictEncoding::default(),
            max_upload_bytes: 10 << 20,
            body_limit: (10 << 20) + (1024 * 1024),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn MlBackend>,
    pub sessions: Arc<dyn SessionStore>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub settings: Arc<FrontendSettings>,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn MlBackend>,
        sessions: Arc<dyn SessionStore>,
        renderer: Arc<dyn TemplateRenderer>,
        settings: FrontendSettings,
    ) -> Self {
        Self {
            backend,
            sessions,
            renderer,
            settings: Arc::new(settings),
        }
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(
            self.backend.clone(),
            self.sessions.clone(),
            self.settings.session_ttl,
        )
    }

    pub fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(self.backend.clone())
    }

    pub fn logout_handler(&self) -> LogoutHandler {
        LogoutHandler::new(self.sessions.clone())
    }
}
