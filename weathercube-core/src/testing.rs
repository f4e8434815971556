//! Test helpers shared across modules.

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
    task::JoinHandle,
};

/// Serves a single HTTP response on an ephemeral port.
///
/// Returns the base URL and a handle yielding the request line that was
/// received, e.g. `GET /json/ HTTP/1.1`.
pub(crate) async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut socket = BufReader::new(socket);

        let mut request_line = String::new();
        socket.read_line(&mut request_line).await.unwrap();

        let mut header = String::new();
        loop {
            header.clear();
            let read = socket.read_line(&mut header).await.unwrap();
            if read == 0 || header == "\r\n" {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.get_mut().write_all(response.as_bytes()).await.unwrap();
        let _ = socket.get_mut().shutdown().await;

        request_line.trim_end().to_string()
    });

    (base_url, handle)
}
