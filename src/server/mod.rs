//! Development server with live reload
//!
//! Pages are rendered per request from the content store, so edits to posts
//! show up on the next load without a rebuild.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::{header, HeaderMap, Request, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::error::NewsletterError;
use crate::newsletter::{Newsletter, SubscribeOutcome};
use crate::templates::{PageMeta, SubscribeForm, TemplateRenderer};
use crate::theme::{ThemeMode, ThemeState};
use crate::views::{DetailState, PostDetailView, PostListView};
use crate::Site;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Number of featured posts shown on the landing page
const HOME_FEATURED: usize = 3;

/// Shared state for all handlers
pub struct AppState {
    config: SiteConfig,
    store: Arc<dyn ContentStore>,
    renderer: TemplateRenderer,
    theme: ThemeState,
    newsletter: Newsletter,
    static_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl AppState {
    pub fn new(
        config: SiteConfig,
        store: Arc<dyn ContentStore>,
        newsletter: Newsletter,
        static_dir: PathBuf,
    ) -> Result<Self> {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Ok(Self {
            theme: ThemeState::new(config.default_theme),
            renderer: TemplateRenderer::new()?,
            config,
            store,
            newsletter,
            static_dir,
            reload_tx,
            live_reload: false,
        })
    }

    /// Inject the reload script into every rendered page
    pub fn with_live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    fn meta<'a>(&'a self, path: &'a str) -> PageMeta<'a> {
        PageMeta {
            config: &self.config,
            path,
            theme: self.theme.current(),
        }
    }

    fn page(&self, status: StatusCode, html: String) -> Response {
        let html = if self.live_reload {
            inject_live_reload(&html)
        } else {
            html
        };
        (status, Html(html)).into_response()
    }
}

/// Handler error: logged and answered with a plain 500
struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

type HandlerResult = std::result::Result<Response, AppError>;

/// Build the site router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/about", get(about_handler))
        .route("/blog", get(blog_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/subscribe", get(subscribe_page).post(subscribe_handler))
        .route("/theme", post(theme_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let store: Arc<dyn ContentStore> = Arc::new(site.store());
    let newsletter = Newsletter::open(&site.config.newsletter, &site.base_dir)?;
    let state = AppState::new(
        site.config.clone(),
        store,
        newsletter,
        site.static_dir.clone(),
    )?
    .with_live_reload(watch);
    let reload_tx = state.reload_tx.clone();
    let app = router(Arc::new(state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("{} running at {}", site.config.title, url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let watched = vec![
            site.content_dir.clone(),
            site.static_dir.clone(),
            site.base_dir.join("_config.yml"),
        ];
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(watched, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch content and static files and tell connected pages to reload
fn watch_and_reload(paths: Vec<PathBuf>, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for path in &paths {
        if !path.exists() {
            continue;
        }
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".git")
                            && !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                    })
                    .collect();

                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }
                // Nobody listening is fine
                let _ = reload_tx.send(());
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

async fn home_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    let mut view = PostListView::new();
    view.load(state.store.as_ref()).await;
    let page = view.page(&state.config);
    let featured: Vec<_> = page.featured.into_iter().take(HOME_FEATURED).collect();

    let html = state.renderer.render_home(&state.meta("/"), &featured)?;
    Ok(state.page(StatusCode::OK, html))
}

async fn about_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    let html = state.renderer.render_about(&state.meta("/about"))?;
    Ok(state.page(StatusCode::OK, html))
}

async fn blog_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    let mut view = PostListView::new();
    view.load(state.store.as_ref()).await;

    let html = state
        .renderer
        .render_blog(&state.meta("/blog"), &view.page(&state.config))?;
    Ok(state.page(StatusCode::OK, html))
}

async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    uri: Uri,
) -> HandlerResult {
    let (mut view, _) = PostDetailView::mount(slug);
    view.load(state.store.as_ref()).await;

    let status = match view.state() {
        DetailState::NotFound => StatusCode::NOT_FOUND,
        DetailState::Failed => StatusCode::INTERNAL_SERVER_ERROR,
        DetailState::Ready(_) | DetailState::Loading => StatusCode::OK,
    };
    let html = state
        .renderer
        .render_post(&state.meta(uri.path()), view.state())?;
    Ok(state.page(status, html))
}

async fn subscribe_page(State(state): State<Arc<AppState>>) -> HandlerResult {
    let html = state
        .renderer
        .render_subscribe(&state.meta("/subscribe"), &SubscribeForm::default())?;
    Ok(state.page(StatusCode::OK, html))
}

#[derive(Debug, Deserialize)]
struct SubscribeRequest {
    #[serde(default)]
    email: String,
}

async fn subscribe_handler(
    State(state): State<Arc<AppState>>,
    Form(request): Form<SubscribeRequest>,
) -> HandlerResult {
    let (status, form) = match state.newsletter.subscribe(&request.email).await {
        Ok(outcome) => {
            let message = match outcome {
                SubscribeOutcome::Subscribed => state.newsletter.welcome_message().to_string(),
                SubscribeOutcome::AlreadySubscribed => "You're already subscribed.".to_string(),
            };
            let form = SubscribeForm {
                message: Some(message),
                subscribed: true,
                ..Default::default()
            };
            (StatusCode::OK, form)
        }
        Err(e) => {
            let status = match e {
                NewsletterError::EmptyEmail | NewsletterError::InvalidEmail(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                NewsletterError::Disabled => StatusCode::FORBIDDEN,
                NewsletterError::Storage(_) => {
                    tracing::error!("Failed to store subscriber: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let form = SubscribeForm {
                email: request.email,
                error: Some(e.to_string()),
                ..Default::default()
            };
            (status, form)
        }
    };

    let html = state
        .renderer
        .render_subscribe(&state.meta("/subscribe"), &form)?;
    Ok(state.page(status, html))
}

#[derive(Debug, Deserialize)]
struct ThemeRequest {
    mode: Option<String>,
}

/// Switch the colour theme, then go back to the page the request came from
async fn theme_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(request): Form<ThemeRequest>,
) -> Response {
    let mode = match request.mode.as_deref().filter(|m| !m.is_empty()) {
        Some(raw) => match raw.parse::<ThemeMode>() {
            Ok(mode) => {
                state.theme.set(mode);
                mode
            }
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        },
        None => state.theme.toggle(),
    };
    tracing::debug!("Theme is now {}", mode);

    // Only the path of the referer is kept so the redirect stays on this site
    let back = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Uri>().ok())
        .map(|uri| uri.path().to_string())
        .filter(|p| p.starts_with('/'))
        .unwrap_or_else(|| "/".to_string());

    Redirect::to(&back).into_response()
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve files from the static directory, or the not-found page
async fn fallback_handler(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> HandlerResult {
    let path = request.uri().path().to_string();

    let mut service = ServeDir::new(&state.static_dir);
    let response = match service.try_call(request).await {
        Ok(response) => response,
        Err(_) => return Ok((StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()),
    };

    if response.status() != StatusCode::NOT_FOUND {
        return Ok(response.into_response());
    }

    let html = state.renderer.render_not_found(&state.meta(&path))?;
    Ok(state.page(StatusCode::NOT_FOUND, html))
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
