use crate::error::ClientError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Method, Url};
use shared::{
    Direction, DirectionRequest, Envelope, GameSnapshot, DIRECTION_PATH, HIGHSCORE_PATH,
    PAUSE_PATH, RESTART_PATH, START_PATH, STATE_PATH, UPDATE_PATH,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Request/response calls against the game server's fixed API.
///
/// Every method performs exactly one exchange and has no side effect beyond it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn start(&self) -> Result<GameSnapshot, ClientError>;
    async fn restart(&self) -> Result<GameSnapshot, ClientError>;
    async fn toggle_pause(&self) -> Result<GameSnapshot, ClientError>;
    async fn set_direction(&self, direction: Direction) -> Result<GameSnapshot, ClientError>;
    async fn tick(&self) -> Result<GameSnapshot, ClientError>;
    async fn fetch_state(&self) -> Result<GameSnapshot, ClientError>;
    async fn high_score(&self) -> Result<u32, ClientError>;
}

/// An intent that passed gating and is ready to go over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Start,
    Restart,
    TogglePause,
    SetDirection(Direction),
    Tick,
    Sync,
    HighScore,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Start => "start",
            Request::Restart => "restart",
            Request::TogglePause => "toggle_pause",
            Request::SetDirection(_) => "set_direction",
            Request::Tick => "tick",
            Request::Sync => "sync",
            Request::HighScore => "high_score",
        }
    }

    /// Requests that change the session lifecycle and are debounced against each other.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Request::Start | Request::Restart | Request::TogglePause)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Snapshot(GameSnapshot),
    HighScore(u32),
}

/// A finished exchange, handed back to the frame loop.
#[derive(Debug)]
pub struct Completion {
    pub request: Request,
    pub result: Result<Response, ClientError>,
}

pub async fn execute(transport: &dyn Transport, request: Request) -> Completion {
    let result = match request {
        Request::Start => transport.start().await.map(Response::Snapshot),
        Request::Restart => transport.restart().await.map(Response::Snapshot),
        Request::TogglePause => transport.toggle_pause().await.map(Response::Snapshot),
        Request::SetDirection(direction) => transport
            .set_direction(direction)
            .await
            .map(Response::Snapshot),
        Request::Tick => transport.tick().await.map(Response::Snapshot),
        Request::Sync => transport.fetch_state().await.map(Response::Snapshot),
        Request::HighScore => transport.high_score().await.map(Response::HighScore),
    };

    Completion { request, result }
}

pub struct HttpTransport {
    http: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        session_cookie: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let base = Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        if let Some(session) = session_cookie {
            headers.insert(COOKIE, HeaderValue::from_str(&format!("session={session}"))?);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(HttpTransport { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn exchange(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<DirectionRequest>,
    ) -> Result<Envelope, ClientError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ClientError::transport(operation, e))?;

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::transport(operation, e))?;
        let http_status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::transport(operation, e))?;

        debug!("{} -> HTTP {} ({} bytes)", operation, http_status, text.len());

        // Error envelopes arrive with 4xx statuses too, so the body decides.
        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| {
            ClientError::transport(operation, format!("HTTP {http_status}: {e}"))
        })?;

        if !envelope.is_success() {
            return Err(ClientError::Rejected {
                operation,
                status: envelope.status,
                message: envelope.message,
            });
        }

        Ok(envelope)
    }

    async fn snapshot(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<DirectionRequest>,
    ) -> Result<GameSnapshot, ClientError> {
        let envelope = self.exchange(operation, method, path, body).await?;
        let snapshot = envelope
            .game_state
            .ok_or_else(|| ClientError::transport(operation, "envelope has no game_state"))?;
        snapshot
            .validate()
            .map_err(|e| ClientError::transport(operation, e))?;
        Ok(snapshot)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn start(&self) -> Result<GameSnapshot, ClientError> {
        self.snapshot("start", Method::POST, START_PATH, None).await
    }

    async fn restart(&self) -> Result<GameSnapshot, ClientError> {
        self.snapshot("restart", Method::POST, RESTART_PATH, None).await
    }

    async fn toggle_pause(&self) -> Result<GameSnapshot, ClientError> {
        self.snapshot("toggle_pause", Method::POST, PAUSE_PATH, None).await
    }

    async fn set_direction(&self, direction: Direction) -> Result<GameSnapshot, ClientError> {
        self.snapshot(
            "set_direction",
            Method::POST,
            DIRECTION_PATH,
            Some(DirectionRequest { direction }),
        )
        .await
    }

    async fn tick(&self) -> Result<GameSnapshot, ClientError> {
        self.snapshot("tick", Method::POST, UPDATE_PATH, None).await
    }

    async fn fetch_state(&self) -> Result<GameSnapshot, ClientError> {
        self.snapshot("sync", Method::GET, STATE_PATH, None).await
    }

    async fn high_score(&self) -> Result<u32, ClientError> {
        let envelope = self
            .exchange("high_score", Method::GET, HIGHSCORE_PATH, None)
            .await?;
        envelope
            .highscore
            .ok_or_else(|| ClientError::transport("high_score", "envelope has no highscore"))
    }
}

/// Runs exchanges on the tokio runtime and queues their completions for the frame loop.
pub struct Dispatcher {
    runtime: Handle,
    transport: Arc<dyn Transport>,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
}

impl Dispatcher {
    pub fn new(runtime: Handle, transport: Arc<dyn Transport>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            transport,
            completions_tx,
            completions_rx,
        }
    }

    pub fn dispatch(&self, request: Request) {
        debug!("Dispatching {}", request.name());

        let transport = Arc::clone(&self.transport);
        let tx = self.completions_tx.clone();
        self.runtime.spawn(async move {
            let completion = execute(transport.as_ref(), request).await;
            // The receiver only goes away when the window closes.
            let _ = tx.send(completion);
        });
    }

    /// Completions in the order their exchanges finished.
    pub fn drain(&mut self) -> Vec<Completion> {
        let mut completed = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            completed.push(completion);
        }
        completed
    }
}
