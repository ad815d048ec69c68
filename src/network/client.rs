//! Blocking client
//!
//! One TCP connection, one request in flight at a time.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{Result, StoreError};
use crate::protocol::{read_response, write_command, Command, Reply};
use crate::store::Record;

/// Client for a RecStore server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs + std::fmt::Debug>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(&addr)
            .map_err(|e| StoreError::Network(format!("failed to connect to {:?}: {}", addr, e)))?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send a command and wait for its reply
    ///
    /// Error statuses from the server come back as `StoreError::Remote`.
    pub fn call(&mut self, command: &Command) -> Result<Reply> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)?.into_reply()
    }

    pub fn search(&mut self, target: i32) -> Result<Vec<Record>> {
        match self.call(&Command::Search { target })? {
            Reply::Records(records) => Ok(records),
            other => Err(unexpected("SEARCH", &other)),
        }
    }

    pub fn add(&mut self, values: Vec<i32>) -> Result<()> {
        self.expect_ack("ADD", &Command::Add { values })
    }

    pub fn update(&mut self, records: Vec<Record>) -> Result<()> {
        self.expect_ack("UPDATE", &Command::Update { records })
    }

    pub fn delete(&mut self, indexes: Vec<i64>) -> Result<()> {
        self.expect_ack("DELETE", &Command::Delete { indexes })
    }

    pub fn relocate(&mut self, indexes: Vec<i64>) -> Result<()> {
        self.expect_ack("RELOCATE", &Command::Relocate { indexes })
    }

    pub fn len(&mut self) -> Result<u64> {
        match self.call(&Command::Len)? {
            Reply::Len(len) => Ok(len),
            other => Err(unexpected("LEN", &other)),
        }
    }

    pub fn ping(&mut self) -> Result<()> {
        match self.call(&Command::Ping)? {
            Reply::Pong => Ok(()),
            other => Err(unexpected("PING", &other)),
        }
    }

    fn expect_ack(&mut self, what: &str, command: &Command) -> Result<()> {
        match self.call(command)? {
            Reply::Ack => Ok(()),
            other => Err(unexpected(what, &other)),
        }
    }
}

fn unexpected(what: &str, reply: &Reply) -> StoreError {
    StoreError::Protocol(format!("{}: unexpected reply {:?}", what, reply))
}
