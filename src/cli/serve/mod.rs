//! Preview server with live reload support.
//!
//! | Route        | Response                                   |
//! |--------------|--------------------------------------------|
//! | `GET /`      | page shell around the current rendering    |
//! | `GET /ping`  | current version token (text/plain)         |
//! | other paths  | 404                                        |
//!
//! `HEAD` is answered like `GET` without a body; other methods get 405.

mod lifecycle;
mod response;


use crate::{
    actor::Coordinator,
    cache::Shell,
    config::ServeConfig,
    embed::serve::{LIVERELOAD_JS, LivereloadVars, PageVars},
    log,
    reload::RenderSlot,
};
use anyhow::{Context, Result};
use crossbeam::channel;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Number of request handler threads.
const REQUEST_THREADS: usize = 4;

/// Everything a request handler needs, shared by all handlers.
pub struct ServeContext {
    slot: Arc<RenderSlot>,
    shell: Shell,
    title: String,
    stylesheet: String,
    /// Inline polling script, empty when live reload is off
    reload_script: String,
}

impl ServeContext {
    pub fn new(
        slot: Arc<RenderSlot>,
        shell: Shell,
        title: impl Into<String>,
        serve: &ServeConfig,
        live_reload: bool,
    ) -> Self {
        let reload_script = if live_reload {
            LIVERELOAD_JS.render(&LivereloadVars {
                poll_ms: serve.poll_interval_ms,
            })
        } else {
            String::new()
        };

        Self {
            slot,
            shell,
            title: title.into(),
            stylesheet: serve.stylesheet.clone(),
            reload_script,
        }
    }

    /// Full page for one consistent snapshot of the render state.
    ///
    /// The page carries the token of the content it shows, so an edit
    /// published before the first poll still triggers a reload.
    pub fn render_page(&self) -> String {
        let state = self.slot.snapshot();
        let version = state.version.token();
        self.shell.render_page(&PageVars {
            title: &self.title,
            stylesheet: &self.stylesheet,
            content: &state.html,
            version: &version,
            reload_script: &self.reload_script,
        })
    }

    pub fn version_token(&self) -> String {
        self.slot.version().token()
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server without starting the request loop
///
/// Registers the server with the Ctrl+C handler so it can be unblocked.
pub fn bind_server(serve: &ServeConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(serve.interface, serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    Ok(BoundServer {
        server,
        addr,
        shutdown_rx,
    })
}

impl BoundServer {
    /// URL to open in a browser. Wildcard interfaces map to localhost.
    pub fn url(&self) -> String {
        browse_url(self.addr)
    }

    /// Start the request loop (blocking).
    ///
    /// `actors` is `None` when live reload is off or the watcher failed.
    pub fn run(self, ctx: ServeContext, actors: Option<Coordinator>) -> Result<()> {
        let actor_handle = lifecycle::spawn_actors(actors, self.shutdown_rx);
        run_request_loop(&self.server, Arc::new(ctx))?;
        lifecycle::wait_for_shutdown(actor_handle);
        Ok(())
    }
}

fn browse_url(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("http://localhost:{}", addr.port())
    } else {
        format!("http://{addr}")
    }
}

fn run_request_loop(server: &Server, ctx: Arc<ServeContext>) -> Result<()> {
    // Handlers only read a snapshot, so a small pool is enough
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let ctx = Arc::clone(&ctx);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &ctx) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// What a request URL asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Page,
    Version,
    NotFound,
}

impl Route {
    fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        match path {
            "/" => Self::Page,
            "/ping" => Self::Version,
            _ => Self::NotFound,
        }
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    if crate::core::is_shutdown() || !crate::core::is_serving() {
        return response::respond_unavailable(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    match Route::from_url(request.url()) {
        Route::Page => response::respond_page(request, ctx.render_page()),
        Route::Version => response::respond_version(request, ctx.version_token()),
        Route::NotFound => response::respond_not_found(request),
    }
}
