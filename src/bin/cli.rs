//! RecStore CLI Client
//!
//! Command-line interface for interacting with a RecStore server.

use clap::{Parser, Subcommand};
use recstore::network::Client;
use recstore::{Record, Result};

/// RecStore CLI
#[derive(Parser, Debug)]
#[command(name = "recstore-cli")]
#[command(about = "CLI for the RecStore record store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:50051")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find every record holding a value
    Search {
        /// The value to match
        value: i32,
    },

    /// Append values
    Add {
        /// Values to append, in order
        #[arg(required = true)]
        values: Vec<i32>,
    },

    /// Overwrite values by index
    Update {
        /// INDEX=VALUE pairs, applied in order
        #[arg(required = true, value_parser = parse_record)]
        records: Vec<Record>,
    },

    /// Delete values by index
    Delete {
        /// Indexes as returned by search
        #[arg(required = true, allow_negative_numbers = true)]
        indexes: Vec<i64>,
    },

    /// Move values by index to the end
    Relocate {
        /// Indexes as returned by search
        #[arg(required = true, allow_negative_numbers = true)]
        indexes: Vec<i64>,
    },

    /// Print the number of stored values
    Len,

    /// Ping the server
    Ping,
}

fn parse_record(s: &str) -> std::result::Result<Record, String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=VALUE, got '{}'", s))?;
    let index = index
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("bad index '{}': {}", index, e))?;
    let value = value
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad value '{}': {}", value, e))?;
    Ok(Record::new(index, value))
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut client = Client::connect(args.server.as_str())?;

    match args.command {
        Commands::Search { value } => {
            let records = client.search(value)?;
            for record in &records {
                println!("{}\t{}", record.index, record.value);
            }
            println!("({} records)", records.len());
        }
        Commands::Add { values } => {
            client.add(values)?;
            println!("OK");
        }
        Commands::Update { records } => {
            client.update(records)?;
            println!("OK");
        }
        Commands::Delete { indexes } => {
            client.delete(indexes)?;
            println!("OK");
        }
        Commands::Relocate { indexes } => {
            client.relocate(indexes)?;
            println!("OK");
        }
        Commands::Len => println!("{}", client.len()?),
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}
