use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use quickprint_core::{parse_callback_params, CallbackParams};
use quickprint_logging::{qp_debug, qp_info, qp_warn};
use thiserror::Error;
use tiny_http::{Response, Server};

const RECEIVED_BODY: &str = "Print result received. You can return to QuickPrint.";

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("failed to listen on {addr}: {message}")]
    Bind { addr: String, message: String },
    #[error("listener on {0} has no IP address")]
    NoIpAddress(String),
    #[error("failed to start listener thread: {0}")]
    Thread(#[from] std::io::Error),
}

/// Local HTTP endpoint the agent navigates to after printing.
pub struct CallbackListener {
    server: Arc<Server>,
    local_addr: SocketAddr,
    thread: Option<JoinHandle<()>>,
}

impl CallbackListener {
    /// Listens on `addr` and calls `on_callback` for every request to `path`.
    pub fn bind<F>(addr: &str, path: &str, on_callback: F) -> Result<Self, ListenError>
    where
        F: Fn(CallbackParams) + Send + 'static,
    {
        let server = Server::http(addr).map_err(|err| ListenError::Bind {
            addr: addr.to_string(),
            message: err.to_string(),
        })?;
        let local_addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| ListenError::NoIpAddress(addr.to_string()))?;
        let server = Arc::new(server);
        let path = path.to_string();

        let worker = server.clone();
        let thread = thread::Builder::new()
            .name("quickprint-callback".to_string())
            .spawn(move || serve(&worker, &path, on_callback))?;

        qp_info!("Callback listener on http://{}", local_addr);
        Ok(Self {
            server,
            local_addr,
            thread: Some(thread),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn serve<F>(server: &Server, path: &str, on_callback: F)
where
    F: Fn(CallbackParams),
{
    for request in server.incoming_requests() {
        let (request_path, query) = split_target(request.url());
        let response = if request_path == path {
            let params = parse_callback_params(query);
            qp_debug!("Callback {:?}", params);
            on_callback(params);
            Response::from_string(RECEIVED_BODY)
        } else {
            Response::from_string("not found").with_status_code(404)
        };
        if let Err(err) = request.respond(response) {
            qp_warn!("Failed to answer callback request: {}", err);
        }
    }
    qp_debug!("Callback listener stopped");
}

fn split_target(target: &str) -> (&str, &str) {
    target.split_once('?').unwrap_or((target, ""))
}
