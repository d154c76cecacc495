use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// One canned reply of the scripted server.
#[derive(Debug, Clone)]
pub(super) enum Reply {
    Respond { status: u16, body: String },
    /// Wait before responding, to trip client timeouts.
    Delay { wait: Duration, status: u16, body: String },
    /// Read the request, then close without answering.
    Drop,
}

impl Reply {
    pub(super) fn json(status: u16, body: serde_json::Value) -> Self {
        Reply::Respond {
            status,
            body: body.to_string(),
        }
    }

    pub(super) fn text(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            body: body.to_owned(),
        }
    }
}

/// HTTP/1.1 server answering the n-th request with the n-th reply (the last
/// reply repeats once the script runs out).
pub(super) struct ScriptedServer {
    pub(super) url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScriptedServer {
    pub(super) fn start(replies: Vec<Reply>) -> AppResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| AppError::validation(format!("bind test server failed: {}", err)))?;
        let addr = listener
            .local_addr()
            .map_err(|err| AppError::validation(format!("server addr failed: {}", err)))?;
        listener
            .set_nonblocking(true)
            .map_err(|err| AppError::validation(format!("set_nonblocking failed: {}", err)))?;

        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let replies = Arc::new(replies);

        let thread_hits = Arc::clone(&hits);
        let thread_requests = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        let position = thread_hits.fetch_add(1, Ordering::SeqCst);
                        let reply = replies
                            .get(position)
                            .or_else(|| replies.last())
                            .cloned()
                            .unwrap_or(Reply::Drop);
                        let requests = Arc::clone(&thread_requests);
                        thread::spawn(move || handle_client(stream, &reply, &requests));
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            url: format!("http://{}/v1/images/compositions", addr),
            hits,
            requests,
            shutdown: shutdown_tx,
            thread: Some(handle),
        })
    }

    pub(super) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub(super) fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

fn handle_client(mut stream: TcpStream, reply: &Reply, requests: &Mutex<Vec<String>>) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    if let Ok(mut guard) = requests.lock() {
        guard.push(request);
    }

    let (status, body) = match reply {
        Reply::Respond { status, body } => (*status, body),
        Reply::Delay { wait, status, body } => {
            thread::sleep(*wait);
            (*status, body)
        }
        Reply::Drop => {
            drop(stream.shutdown(Shutdown::Both));
            return;
        }
    };
    let response = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Reads headers plus a `Content-Length` body and returns them as text.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];
    loop {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            break;
        }
        data.extend_from_slice(buffer.get(..read)?);
        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text
                .get(..header_end)?
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= header_end.saturating_add(4).saturating_add(content_length) {
                break;
            }
        }
    }
    Some(String::from_utf8_lossy(&data).into_owned())
}
