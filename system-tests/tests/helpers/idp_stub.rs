// system-tests/tests/helpers/idp_stub.rs
// ============================================================================
// Module: Identity Provider Stub
// Description: Local HTTP server standing in for identity-provider endpoints.
// Purpose: Serve discovery, realm info, SAML metadata, and redirects offline.
// Dependencies: tiny_http, serde_json
// ============================================================================

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use serde_json::Value;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Canned response for one route.
#[derive(Clone, Debug)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub location: Option<String>,
    pub body: String,
}

impl StubResponse {
    /// 200 with a JSON body.
    pub fn json(value: &Value) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json"),
            location: None,
            body: value.to_string(),
        }
    }

    /// 200 with a SAML metadata body.
    pub fn saml_metadata(entity_id: &str) -> Self {
        Self {
            status: 200,
            content_type: Some("application/samlmetadata+xml"),
            location: None,
            body: format!(
                "<md:EntityDescriptor xmlns:md=\"urn:oasis:names:tc:SAML:2.0:metadata\" \
                 entityID=\"{entity_id}\"/>"
            ),
        }
    }

    /// 302 to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: 302,
            content_type: None,
            location: Some(location.into()),
            body: String::new(),
        }
    }

    /// Bare status with a plain-text body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            location: None,
            body: format!("status {status}"),
        }
    }
}

/// Route table keyed by request path (query strings are ignored).
pub type Routes = BTreeMap<String, StubResponse>;

/// Running stub; shuts down on drop.
pub struct IdpStub {
    base_url: String,
    server: Arc<Server>,
    join: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl IdpStub {
    /// Binds an ephemeral port and serves the routes built from the base URL.
    pub fn spawn(routes: impl FnOnce(&str) -> Routes) -> io::Result<Self> {
        let server = Server::http("127.0.0.1:0").map_err(io::Error::other)?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| io::Error::other("stub bound to a non-IP address"))?;
        let base_url = format!("http://{addr}");
        let routes = routes(&base_url);
        let server = Arc::new(server);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let join = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            thread::spawn(move || serve(&server, &routes, &requests))
        };
        Ok(Self {
            base_url,
            server,
            join: Some(join),
            requests,
        })
    }

    /// Returns the stub base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map_or_else(|_| Vec::new(), |paths| paths.clone())
    }
}

impl Drop for IdpStub {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

fn serve(server: &Server, routes: &Routes, requests: &Mutex<Vec<String>>) {
    for request in server.incoming_requests() {
        let path = request.url().split('?').next().unwrap_or_default().to_string();
        if let Ok(mut seen) = requests.lock() {
            seen.push(path.clone());
        }
        let stub = routes.get(&path).cloned().unwrap_or_else(|| StubResponse::status(404));
        let mut response = Response::from_string(stub.body).with_status_code(stub.status);
        if let Some(content_type) = stub.content_type
            && let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
        {
            response = response.with_header(header);
        }
        if let Some(location) = stub.location
            && let Ok(header) = Header::from_bytes(&b"Location"[..], location.as_bytes())
        {
            response = response.with_header(header);
        }
        let _ = request.respond(response);
    }
}
