use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::Mutex;

use crate::client::{Client, ClientRegistry};
use crate::protocol::responses::{self, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::students::StudentService;

/// One read from the command stream
enum LineRead {
    Closed,
    Line(String),
    TooLong,
    NotUtf8,
}

/// Reads one command line, buffering at most `max_len + 1` bytes.
///
/// On `TooLong` the rest of the line is still unread.
async fn read_command_line(
    reader: &mut BufReader<OwnedReadHalf>,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<LineRead> {
    buf.clear();
    let limit = max_len as u64 + 1;
    if (&mut *reader).take(limit).read_until(b'\n', buf).await? == 0 {
        return Ok(LineRead::Closed);
    }
    if buf.len() > max_len {
        return Ok(LineRead::TooLong);
    }
    match std::str::from_utf8(buf) {
        Ok(line) => Ok(LineRead::Line(line.to_string())),
        Err(_) => Ok(LineRead::NotUtf8),
    }
}

/// Discards input up to and including the next newline.
///
/// Returns `false` if the stream ended first.
async fn skip_rest_of_line(reader: &mut BufReader<OwnedReadHalf>) -> io::Result<bool> {
    loop {
        let (used, found) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(false);
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(used);
        if found {
            return Ok(true);
        }
    }
}

/// Handles a client session using the Tokio async runtime.
///
/// - Reads command lines through a BufReader, never buffering more than
///   `max_command_length` bytes of a line.
/// - Dispatches commands using `handle_command` on the blocking pool, since
///   registration and login hash passwords.
/// - Removes the client from `registry` when the session ends.
pub async fn handle_client(
    cmd_stream: TcpStream,
    client_addr: SocketAddr,
    registry: Arc<Mutex<ClientRegistry>>,
    service: Arc<StudentService>,
    max_command_length: usize,
) {
    let (read_half, mut write_half) = cmd_stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    let mut client = Client::new(client_addr);

    loop {
        match read_command_line(&mut reader, &mut buf, max_command_length).await {
            Ok(LineRead::Closed) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(LineRead::TooLong) => {
                warn!("Command from {} exceeds {} bytes", client_addr, max_command_length);
                let reply = format_response(responses::INTERNAL_ERROR, "Command too long");
                if write_half.write_all(reply.as_bytes()).await.is_err() {
                    break;
                }
                match skip_rest_of_line(&mut reader).await {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => {
                        error!("Failed to read from {}: {}", client_addr, e);
                        break;
                    }
                }
            }
            Ok(LineRead::NotUtf8) => {
                let reply = format_response(responses::BAD_REQUEST, "Command is not valid UTF-8");
                if write_half.write_all(reply.as_bytes()).await.is_err() {
                    break;
                }
            }
            Ok(LineRead::Line(line)) => {
                let command = parse_command(line.trim_end_matches(['\r', '\n']));
                debug!("Received from {}: {}", client_addr, command.name());

                let service = Arc::clone(&service);
                let mut session = std::mem::take(&mut client);
                let outcome = tokio::task::spawn_blocking(move || {
                    let result = handle_command(&mut session, &command, &service);
                    (session, result)
                })
                .await;

                let result = match outcome {
                    Ok((session, result)) => {
                        client = session;
                        result
                    }
                    Err(e) => {
                        error!("Command task for {} failed: {}", client_addr, e);
                        let reply = format_response(responses::INTERNAL_ERROR, "Internal server error");
                        let _ = write_half.write_all(reply.as_bytes()).await;
                        break;
                    }
                };

                if let Some(msg) = &result.message {
                    if let Err(e) = write_half.write_all(msg.as_bytes()).await {
                        error!("Failed to write to {}: {}", client_addr, e);
                        break;
                    }
                }

                if result.status == CommandStatus::CloseConnection {
                    info!("Client {} requested to quit", client_addr);
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }
    }

    let connected_for = registry.lock().await.remove(&client_addr);
    info!(
        "Client {} disconnected after {:?}",
        client_addr,
        connected_for.unwrap_or_default()
    );
}
