//! Static file server for previewing a built site.
//!
//! Serves the output directory as-is: no rebuilds, no live reload. `/` and
//! directory URLs resolve to their `index.html`. Anything that does not map
//! to a file under the served root, including `..` traversal, is a 404.

use crate::config::ServeConfig;
use percent_encoding::percent_decode_str;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{debug, info, warn};

pub const INDEX_FILE: &str = "index.html";
const PLAIN_TEXT: &str = "text/plain; charset=utf-8";
const NOT_FOUND_BODY: &[u8] = b"404 Not Found";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot bind {addr}: {message}")]
    Bind { addr: String, message: String },
    #[error("Nothing to serve: {0} does not exist (run `mdsite build` first)")]
    MissingRoot(PathBuf),
}

/// Serve `root` until the process is stopped.
pub fn serve(root: &Path, config: &ServeConfig) -> Result<(), ServeError> {
    if !root.is_dir() {
        return Err(ServeError::MissingRoot(root.to_path_buf()));
    }

    let addr = format!("{}:{}", config.interface, config.port);
    let server = Server::http(&addr).map_err(|e| ServeError::Bind {
        addr: addr.clone(),
        message: e.to_string(),
    })?;
    info!(url = %format!("http://{addr}"), dir = %root.display(), "serving");

    for request in server.incoming_requests() {
        if let Err(error) = handle_request(request, root) {
            warn!(%error, "failed to send response");
        }
    }
    Ok(())
}

/// Answer one request from the files under `root`.
pub fn handle_request(request: Request, root: &Path) -> std::io::Result<()> {
    let url = request.url().to_string();
    match resolve_path(&url, root) {
        Some(path) => {
            let body = fs::read(&path)?;
            debug!(%url, file = %path.display(), "200");
            send(request, 200, content_type(&path), body)
        }
        None => {
            debug!(%url, "404");
            send(request, 404, PLAIN_TEXT, NOT_FOUND_BODY.to_vec())
        }
    }
}

fn send(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> std::io::Result<()> {
    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    if let Ok(header) = Header::from_bytes("Content-Type", content_type) {
        response = response.with_header(header);
    }
    request.respond(response)
}

/// Map a request URL to a file under `root`.
///
/// Returns `None` for missing files, directories without an index, and any
/// path that would leave `root` (`..` segments or symlinks pointing out).
pub fn resolve_path(url: &str, root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);
    if Path::new(&clean)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }

    let canonical = root.join(&clean).canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }
    let index = canonical.join(INDEX_FILE);
    index.is_file().then_some(index)
}

/// Percent-decode, drop the query string and strip surrounding slashes.
fn normalize_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    decoded.trim_matches('/').to_string()
}

/// `Content-Type` for a served file, by extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
