//! Client for the LED cube's line protocol.
//!
//! Each call opens a fresh TCP connection, writes one JSON command line,
//! reads one JSON acknowledgement line, writes an empty terminator line and
//! closes. Lines end with CRLF. Nothing here applies a timeout.

use std::io;

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
};

use crate::model::{ColorPalette, DeviceAck, DeviceCommand};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8300;

const LINE_END: &str = "\r\n";

/// Longest acknowledgement line read before giving up on it.
pub const MAX_ACK_LEN: u64 = 4096;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to connect to cube at {addr}: {source}")]
    Connect { addr: String, source: io::Error },

    #[error("cube connection failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode cube command: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cube closed the connection without acknowledging")]
    NoAcknowledgement,

    #[error("cube sent an unreadable acknowledgement '{line}': {source}")]
    InvalidAcknowledgement {
        line: String,
        source: serde_json::Error,
    },

    #[error("cube acknowledgement exceeded {} bytes without a line end", MAX_ACK_LEN)]
    AcknowledgementTooLong,

    #[error("cube rejected the command")]
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceClient {
    host: String,
    port: u16,
}

impl Default for DeviceClient {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl DeviceClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn send_colors(&self, palette: &ColorPalette) -> Result<(), DeviceError> {
        let mut line = serde_json::to_string(&DeviceCommand::set_colors(*palette))?;
        line.push_str(LINE_END);

        let addr = self.addr();
        let mut stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| DeviceError::Connect { addr, source })?;

        stream.write_all(line.as_bytes()).await?;

        let mut reply = String::new();
        let read = BufReader::new((&mut stream).take(MAX_ACK_LEN))
            .read_line(&mut reply)
            .await;

        // The terminator goes out whatever the reply was.
        let closed = finish(&mut stream).await;

        let ack = parse_ack(read?, reply)?;
        closed?;

        if ack.success {
            Ok(())
        } else {
            Err(DeviceError::Rejected)
        }
    }
}

async fn finish(stream: &mut TcpStream) -> io::Result<()> {
    stream.write_all(LINE_END.as_bytes()).await?;
    stream.shutdown().await
}

fn parse_ack(read: usize, reply: String) -> Result<DeviceAck, DeviceError> {
    if read == 0 {
        return Err(DeviceError::NoAcknowledgement);
    }
    if read as u64 >= MAX_ACK_LEN && !reply.ends_with('\n') {
        return Err(DeviceError::AcknowledgementTooLong);
    }

    let line = reply.trim_end_matches(['\r', '\n']);
    serde_json::from_str(line).map_err(|source| DeviceError::InvalidAcknowledgement {
        line: line.to_string(),
        source,
    })
}
