use crate::ports::outbound::browser::{Browser, BrowserError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpStream;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use tokio::sync::OnceCell;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};
use url::form_urlencoded;

const STARTUP_POLLS: usize = 40;
const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
struct TargetDescriptor {
    id: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: Option<String>,
}

/// The browser process behind the debugging port. `None` when an already
/// running browser was found on the port.
struct Session {
    _process: Mutex<Option<Child>>,
}

/// Headless Chromium driven over the DevTools protocol. The browser is
/// launched on first use and shared by every render; each render gets its own
/// tab, closed afterwards.
pub struct Chromium {
    chrome_path: String,
    port: u16,
    timeout: Duration,
    http_client: reqwest::Client,
    session: OnceCell<Session>,
}

impl Chromium {
    pub fn new(chrome_path: &str, port: u16, timeout: Duration) -> Self {
        Self {
            chrome_path: chrome_path.to_string(),
            port,
            timeout,
            http_client: reqwest::Client::new(),
            session: OnceCell::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}/json/{path}", self.port)
    }

    async fn session(&self) -> Result<&Session, BrowserError> {
        self.session.get_or_try_init(|| self.launch()).await
    }

    async fn is_listening(&self) -> bool {
        self.http_client
            .get(self.endpoint("version"))
            .timeout(STARTUP_POLL_INTERVAL * 4)
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }

    async fn launch(&self) -> Result<Session, BrowserError> {
        if self.is_listening().await {
            log::info!("Attaching to browser already listening on port {}", self.port);
            return Ok(Session {
                _process: Mutex::new(None),
            });
        }

        log::info!("Launching {} on port {}", self.chrome_path, self.port);
        let process = Command::new(&self.chrome_path)
            .arg("--headless=new")
            .arg(format!("--remote-debugging-port={}", self.port))
            .arg("--blink-settings=imagesEnabled=false")
            .arg("about:blank")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|why| BrowserError::new(format!("could not launch {}: {why}", self.chrome_path)))?;

        for _ in 0..STARTUP_POLLS {
            if self.is_listening().await {
                log::info!("Connected to browser");
                return Ok(Session {
                    _process: Mutex::new(Some(process)),
                });
            }
            tokio::time::sleep(STARTUP_POLL_INTERVAL).await;
        }

        Err(BrowserError::new(format!(
            "browser did not open port {} in time",
            self.port
        )))
    }

    async fn open_tab(&self) -> Result<TargetDescriptor, BrowserError> {
        let query: String = form_urlencoded::byte_serialize(b"about:blank").collect();
        self.http_client
            .put(format!("{}?{query}", self.endpoint("new")))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|why| BrowserError::new(format!("could not open tab: {why}")))?
            .json::<TargetDescriptor>()
            .await
            .map_err(|why| BrowserError::new(format!("unreadable tab descriptor: {why}")))
    }

    async fn close_tab(&self, id: &str) {
        let closed = self
            .http_client
            .get(self.endpoint(&format!("close/{id}")))
            .timeout(self.timeout)
            .send()
            .await;
        if let Err(why) = closed {
            log::warn!("Could not close tab {id}: {why}");
        }
    }
}

#[async_trait]
impl Browser for Chromium {
    async fn tiles(&self, url: &str, selector: &str) -> Result<Vec<String>, BrowserError> {
        self.session().await?;

        let tab = self.open_tab().await?;
        let Some(socket_url) = tab.web_socket_debugger_url.clone() else {
            self.close_tab(&tab.id).await;
            return Err(BrowserError::new(format!("tab {} has no debugger url", tab.id)));
        };

        let page_url = url.to_string();
        let expression = tiles_expression(selector);
        let timeout = self.timeout;
        let rendered = tokio::task::spawn_blocking(move || {
            let mut devtools = DevTools::connect(&socket_url, timeout)?;
            devtools.render(&page_url, &expression)
        })
        .await
        .map_err(|why| BrowserError::new(format!("render task failed: {why}")));

        self.close_tab(&tab.id).await;
        rendered?
    }
}

fn tiles_expression(selector: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll({})).map(element => element.innerText)",
        Value::String(selector.to_string())
    )
}

/// Blocking DevTools connection to a single tab.
struct DevTools {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    next_id: u64,
    timeout: Duration,
}

impl DevTools {
    fn connect(socket_url: &str, timeout: Duration) -> Result<Self, BrowserError> {
        let (socket, _) = tungstenite::connect(socket_url)
            .map_err(|why| BrowserError::new(format!("could not connect to {socket_url}: {why}")))?;
        if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
            stream
                .set_read_timeout(Some(timeout))
                .map_err(|why| BrowserError::new(format!("could not set read timeout: {why}")))?;
        }

        Ok(Self {
            socket,
            next_id: 1,
            timeout,
        })
    }

    fn render(&mut self, url: &str, expression: &str) -> Result<Vec<String>, BrowserError> {
        self.call("Page.enable", json!({}))?;
        self.call("Page.navigate", json!({ "url": url }))?;
        self.wait_for(|message| message["method"] == "Page.loadEventFired")?;

        let evaluated = self.call(
            "Runtime.evaluate",
            json!({ "expression": expression, "returnByValue": true }),
        )?;
        if let Some(exception) = evaluated["result"].get("exceptionDetails") {
            return Err(BrowserError::new(format!("page script failed: {exception}")));
        }

        let tiles = serde_json::from_value(evaluated["result"]["result"]["value"].clone())
            .map_err(|why| BrowserError::new(format!("unexpected tile list: {why}")))?;
        let _ = self.socket.close(None);

        Ok(tiles)
    }

    fn call(&mut self, method: &str, params: Value) -> Result<Value, BrowserError> {
        let id = self.next_id;
        self.next_id += 1;
        let payload = json!({ "id": id, "method": method, "params": params });
        self.socket
            .send(Message::Text(payload.to_string()))
            .map_err(|why| BrowserError::new(format!("could not send {method}: {why}")))?;

        let reply = self.wait_for(|message| message["id"] == id)?;
        if let Some(error) = reply.get("error") {
            return Err(BrowserError::new(format!("{method} failed: {error}")));
        }
        Ok(reply)
    }

    fn wait_for(&mut self, wanted: impl Fn(&Value) -> bool) -> Result<Value, BrowserError> {
        let deadline = Instant::now() + self.timeout;
        while Instant::now() < deadline {
            match self.socket.read() {
                Ok(Message::Text(text)) => {
                    let message: Value = serde_json::from_str(&text)
                        .map_err(|why| BrowserError::new(format!("unreadable devtools message: {why}")))?;
                    if wanted(&message) {
                        return Ok(message);
                    }
                }
                Ok(_) => {}
                Err(tungstenite::Error::Io(ref why))
                    if matches!(why.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => {}
                Err(why) => return Err(BrowserError::new(format!("devtools connection failed: {why}"))),
            }
        }

        Err(BrowserError::new(String::from("timed out waiting for the page")))
    }
}
