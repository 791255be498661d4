//! Loopback HTTP server hosting the sandboxed preview frame.
//!
//! The host page embeds `/frame` in an iframe carrying the sandbox policy and
//! polls `/version` to reload the frame whenever the surface changes.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::export::{EXPORT_FILE_NAME, HTML_CONTENT_TYPE};
use crate::preview::PreviewSurface;
use crate::sandbox::SandboxPolicy;
use crate::types::{GeneratedDocument, Locale};
use crate::Error;

const HOST_PAGE: &str = r#"<!DOCTYPE html>
<html lang="__LANG__">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Bytez Code Test</title>
<style>
html,body{margin:0;height:100%;background:#111827}
iframe{display:block;width:100%;height:100%;border:0;background:#fff}
</style>
</head>
<body>
<iframe id="preview" title="Game Preview" sandbox="__SANDBOX__" src="/frame"></iframe>
<script>
let revision = null;
async function poll() {
  try {
    const res = await fetch('/version', { cache: 'no-store' });
    const next = (await res.text()).trim();
    if (revision !== null && next !== revision) {
      const frame = document.getElementById('preview');
      frame.src = '/frame?r=' + next;
      frame.focus();
    }
    revision = next;
  } catch (e) {}
  setTimeout(poll, 1000);
}
poll();
</script>
</body>
</html>
"#;

const PLACEHOLDER_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="margin:0;height:100vh;display:flex;align-items:center;justify-content:center;background:#111827;color:#6b7280;font-family:sans-serif">
<p style="font-size:1.5rem;font-weight:500">__TEXT__</p>
</body>
</html>
"#;

#[derive(Debug, Default)]
struct SurfaceContent {
    frame: Option<String>,
    source: String,
    revision: u64,
}

/// Preview surface shared between the session owner and the server tasks.
#[derive(Debug, Clone, Default)]
pub struct SharedSurface {
    inner: Arc<Mutex<SurfaceContent>>,
}

impl SharedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceContent> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// What the frame is currently showing, if anything.
    pub fn frame(&self) -> Option<String> {
        self.lock().frame.clone()
    }

    /// Incremented on every load or blank.
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Publish the current program text for `/download`.
    pub fn set_source(&self, document: &GeneratedDocument) {
        self.lock().source = document.as_str().to_string();
    }

    pub fn source(&self) -> String {
        self.lock().source.clone()
    }
}

impl PreviewSurface for SharedSurface {
    fn load(&mut self, document: &str) {
        let mut content = self.lock();
        content.frame = Some(document.to_string());
        content.revision += 1;
    }

    fn blank(&mut self) {
        let mut content = self.lock();
        content.frame = None;
        content.revision += 1;
    }
}

/// A complete HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    fn not_found() -> Self {
        Self::new(404, "text/plain; charset=utf-8", "Not Found")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            404 => "Not Found",
            405 => "Method Not Allowed",
            _ => "Error",
        }
    }

    /// Serialize as an HTTP/1.1 response that closes the connection.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason());
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str(&format!(
            "Content-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n",
            self.body.len()
        ));

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// What every connection task needs to answer requests.
#[derive(Debug, Clone)]
pub struct PreviewContext {
    pub surface: SharedSurface,
    pub policy: SandboxPolicy,
    pub locale: Locale,
}

impl PreviewContext {
    /// Answer a request for `path` (query string ignored).
    pub fn route(&self, method: &str, path: &str) -> HttpResponse {
        if method != "GET" && method != "HEAD" {
            return HttpResponse::new(405, "text/plain; charset=utf-8", "Method Not Allowed")
                .with_header("Allow", "GET, HEAD");
        }

        let path = path.split('?').next().unwrap_or("/");
        match path {
            "/" => HttpResponse::new(200, HTML_CONTENT_TYPE, self.host_page()),
            "/frame" => {
                let body = self
                    .surface
                    .frame()
                    .unwrap_or_else(|| self.placeholder_page());
                HttpResponse::new(200, HTML_CONTENT_TYPE, body)
                    .with_header("Content-Security-Policy", self.policy.csp_header())
            }
            "/version" => HttpResponse::new(
                200,
                "text/plain; charset=utf-8",
                self.surface.revision().to_string(),
            ),
            "/download" => {
                let source = self.surface.source();
                if source.trim().is_empty() {
                    return HttpResponse::not_found();
                }
                HttpResponse::new(200, HTML_CONTENT_TYPE, source).with_header(
                    "Content-Disposition",
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                )
            }
            _ => HttpResponse::not_found(),
        }
    }

    fn host_page(&self) -> String {
        let lang = match self.locale {
            Locale::English => "en",
            Locale::Portuguese => "pt-BR",
        };
        HOST_PAGE
            .replace("__LANG__", lang)
            .replace("__SANDBOX__", &self.policy.attribute())
    }

    fn placeholder_page(&self) -> String {
        PLACEHOLDER_PAGE.replace("__TEXT__", self.locale.preview_placeholder())
    }
}

/// Listener serving one preview context.
pub struct PreviewServer {
    listener: TcpListener,
    context: Arc<PreviewContext>,
}

impl PreviewServer {
    pub async fn bind(addr: impl ToSocketAddrs, context: PreviewContext) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            context: Arc::new(context),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the listener fails.
    pub async fn run(self) -> Result<(), Error> {
        log::info!("Preview server listening on http://{}", self.local_addr()?);

        loop {
            let (stream, peer) = self.listener.accept().await?;
            let context = Arc::clone(&self.context);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, &context).await {
                    log::debug!("Connection from {peer} failed: {e}");
                }
            });
        }
    }
}

async fn handle_connection(mut stream: TcpStream, context: &PreviewContext) -> std::io::Result<()> {
    let mut buf = vec![0u8; 8192];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);

    // Request line: "GET /path?query HTTP/1.1"
    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        return Ok(());
    }

    let response = context.route(parts[0], parts[1]);
    log::trace!("{} {} -> {}", parts[0], parts[1], response.status);

    let mut bytes = response.to_bytes();
    if parts[0] == "HEAD" {
        bytes.truncate(bytes.len() - response.body.len());
    }
    stream.write_all(&bytes).await?;
    stream.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PreviewContext {
        PreviewContext {
            surface: SharedSurface::new(),
            policy: SandboxPolicy::preview(),
            locale: Locale::English,
        }
    }

    #[test]
    fn test_host_page_embeds_sandboxed_frame() {
        let response = context().route("GET", "/");
        let body = String::from_utf8(response.body).unwrap();

        assert_eq!(response.status, 200);
        assert!(body.contains(
            r#"sandbox="allow-scripts allow-same-origin allow-pointer-lock allow-forms allow-modals""#
        ));
        assert!(body.contains(r#"src="/frame""#));
        assert!(body.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn test_frame_shows_placeholder_then_document() {
        let context = context();
        let response = context.route("GET", "/frame");
        assert!(String::from_utf8(response.body.clone())
            .unwrap()
            .contains("Your game will appear here"));
        assert_eq!(
            response.header("content-security-policy"),
            Some("sandbox allow-scripts allow-same-origin allow-pointer-lock allow-forms allow-modals")
        );

        let mut surface = context.surface.clone();
        surface.load("<!DOCTYPE html><html>game</html>");
        let response = context.route("GET", "/frame?r=1");
        assert_eq!(response.body, b"<!DOCTYPE html><html>game</html>".to_vec());
        assert_eq!(context.route("GET", "/version").body, b"1".to_vec());

        surface.blank();
        assert_eq!(context.route("GET", "/version").body, b"2".to_vec());
        assert!(surface.frame().is_none());
    }

    #[test]
    fn test_download_serves_source_as_attachment() {
        let context = context();
        assert_eq!(context.route("GET", "/download").status, 404);

        context
            .surface
            .set_source(&GeneratedDocument::new("<html>saved</html>"));
        let response = context.route("GET", "/download");
        assert_eq!(response.status, 200);
        assert_eq!(response.header("Content-Type"), Some(HTML_CONTENT_TYPE));
        assert_eq!(
            response.header("Content-Disposition"),
            Some("attachment; filename=\"meu-jogo-bytez.html\"")
        );
        assert_eq!(response.body, b"<html>saved</html>".to_vec());
    }

    #[test]
    fn test_unknown_routes_and_methods() {
        let context = context();
        assert_eq!(context.route("GET", "/nope").status, 404);
        assert_eq!(context.route("POST", "/").status, 405);
    }

    #[test]
    fn test_response_serialization() {
        let bytes = HttpResponse::new(200, "text/plain", "hi").to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.ends_with("\r\n\r\nhi"));
    }

    #[tokio::test]
    async fn test_server_answers_over_tcp() {
        let context = context();
        let mut surface = context.surface.clone();
        surface.load("<!DOCTYPE html><html>live</html>");

        let server = PreviewServer::bind("127.0.0.1:0", context).await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let body = reqwest::get(format!("http://{addr}/frame"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "<!DOCTYPE html><html>live</html>");
    }
}
