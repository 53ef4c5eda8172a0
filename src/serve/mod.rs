//! HTTP server for a markdown site.
//!
//! Built on `tiny_http`:
//!
//! - Rendered pages from the published template snapshots
//! - Static file serving from `static/`
//! - Periodic template reload on a background thread
//! - Graceful shutdown on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Main Thread   │     │ Reloader Thread  │
//! │ (accept loop)   │     │ (every interval) │
//! └────────┬────────┘     └────────┬─────────┘
//!          │ spawn                 │
//!          ▼                       ▼
//!   Request threads          load + publish
//!   view() + render                │
//!          │                       │
//!          └──────► SnapshotStore ◄┘
//! ```

mod handler;
pub mod reply;
pub mod route;

pub use handler::Handler;

use crate::{config::SiteConfig, log, site::Site};
use anyhow::{Context, Result, anyhow};
use reply::{Body, Reply};
use std::{
    io::Cursor,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    thread,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Load the site and serve it until Ctrl+C.
///
/// This function:
/// 1. Loads every template collection (fails before binding if any is broken)
/// 2. Binds to the configured interface and port (with auto-retry on port conflict)
/// 3. Sets up Ctrl+C handler for graceful shutdown
/// 4. Starts the background reloader
/// 5. Handles each request on its own thread
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let site = Site::open(&config.root)
        .with_context(|| format!("Failed to load site at {}", config.root.display()))?;
    let site = Arc::new(site);

    let interface: IpAddr = config.serve.interface.parse()?;
    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    site.start_reloader(config.reload_interval())
        .context("Failed to start template reloader")?;
    log!("serve"; "serving {} at http://{}", site.root().display(), addr);

    let handler = Handler::new(Arc::clone(&site), config.serve.alias_static);
    for request in server.incoming_requests() {
        let handler = handler.clone();
        let spawned = thread::Builder::new()
            .name("request".into())
            .spawn(move || handle_request(request, &handler));
        if let Err(e) = spawned {
            log!("serve"; "failed to spawn request thread: {e}");
        }
    }

    site.stop_reloader();
    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some((port, e)),
        }
    }

    Err(match last_error {
        Some((port, e)) => anyhow!(
            "Failed to bind after {} attempts (ports {}-{}): {}",
            max_retries,
            base_port,
            port,
            e
        ),
        None => anyhow!("No ports to try from {base_port}"),
    })
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request(request: Request, handler: &Handler) {
    let remote = request
        .remote_addr()
        .map_or_else(|| "-".to_owned(), ToString::to_string);
    let method = request.method().to_string();
    let url = request.url().to_owned();
    log!("serve"; "{remote} {method} {url}");

    let reply = handler.handle(&method, &url);
    if let Err(e) = respond(request, reply) {
        log!("serve"; "request error: {e}");
    }
}

/// Send a [`Reply`], streaming file bodies.
fn respond(request: Request, reply: Reply) -> Result<()> {
    let mut headers: Vec<Header> = Header::from_bytes("Content-Type", reply.content_type)
        .ok()
        .into_iter()
        .collect();
    if let Some(location) = reply.location {
        headers.extend(Header::from_bytes("Location", location).ok());
    }

    let status = StatusCode(reply.status);
    match reply.body {
        Body::Bytes(bytes) => {
            let len = bytes.len();
            request.respond(Response::new(status, headers, Cursor::new(bytes), Some(len), None))?;
        }
        Body::File(file) => {
            let len = file
                .metadata()
                .ok()
                .and_then(|meta| usize::try_from(meta.len()).ok());
            request.respond(Response::new(status, headers, file, len, None))?;
        }
    }
    Ok(())
}
