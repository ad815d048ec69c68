//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufRead, BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Result, StoreError};
use crate::protocol::{read_command, write_response, Command, Response};
use crate::service::Service;
use super::ShutdownHandle;

/// How often an idle connection wakes up to check for shutdown
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the shared service
    service: Arc<Service>,

    /// Peer address for logging
    peer_addr: String,

    /// Idle limit between requests and read limit within one (`None` waits forever)
    read_timeout: Option<Duration>,

    /// Server-wide stop flag, checked while waiting for the next request
    shutdown: ShutdownHandle,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O
    pub fn new(stream: TcpStream, service: Arc<Service>, shutdown: ShutdownHandle) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            service,
            peer_addr,
            read_timeout: None,
            shutdown,
        })
    }

    /// Configure connection timeouts (0 leaves a direction unbounded)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        self.read_timeout = (read_ms > 0).then(|| Duration::from_millis(read_ms));

        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and sends responses.
    /// Returns when the client disconnects or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            if !self.wait_for_request()? {
                return Ok(());
            }

            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(StoreError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    let _ = self.send_response(&Response::Error(e.to_string()));
                    return Err(e);
                }
            };

            tracing::trace!(
                write = command.is_write(),
                "Received command from {}: {:?}",
                self.peer_addr,
                command.command_type()
            );

            let response = self.execute_command(command);

            if let Err(e) = self.send_response(&response) {
                if let StoreError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) || io_err.kind() == ErrorKind::BrokenPipe {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr, e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Block until the next request starts arriving
    ///
    /// Waits in short slices so a shutdown is noticed even while the client
    /// sits idle. Returns `false` when the connection should close: the peer
    /// hung up, the server is stopping, or the idle limit passed. Once bytes
    /// are buffered the configured read timeout applies to the rest of the
    /// frame, so a slice never expires halfway through a request.
    fn wait_for_request(&mut self) -> Result<bool> {
        let idle_since = Instant::now();
        self.reader
            .get_ref()
            .set_read_timeout(Some(IDLE_POLL_INTERVAL))?;

        loop {
            if self.shutdown.is_shutdown() {
                tracing::debug!("Closing {} for shutdown", self.peer_addr);
                return Ok(false);
            }

            match self.reader.fill_buf() {
                Ok([]) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(false);
                }
                Ok(_) => break,
                Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    if let Some(limit) = self.read_timeout {
                        if idle_since.elapsed() >= limit {
                            tracing::debug!("Client {} idle for {:?}, closing", self.peer_addr, limit);
                            return Ok(false);
                        }
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                Err(ref e) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.reader.get_ref().set_read_timeout(self.read_timeout)?;
        Ok(true)
    }

    /// Execute a command and return a response
    fn execute_command(&self, command: Command) -> Response {
        let kind = command.command_type();
        let result = self.service.execute(command);
        if let Err(ref e) = result {
            tracing::debug!("{:?} from {} failed: {}", kind, self.peer_addr, e);
        }
        Response::from_result(result)
    }

    /// Send a response to the client
    fn send_response(&mut self, response: &Response) -> Result<()> {
        write_response(&mut self.writer, response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Errors that just mean the peer went away or went quiet
fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
