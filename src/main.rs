// src/main.rs
use clap::Parser;
use logkv::{Store, StoreConfig};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(name = "logkv", about = "An append-only log key-value store")]
struct Cli {
    /// Directory holding the store's segment files.
    #[arg(default_value = "db")]
    dir: String,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = Store::open(&cli.dir, StoreConfig::default()).expect("failed to open db");

    println!("logkv (type help for instructions)");

    loop {
        print!("> ");
        io::stdout().flush().unwrap();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            continue;
        }
        if input.is_empty() {
            break;
        }

        let mut parts = input.trim().splitn(3, ' ');
        let cmd = match parts.next() {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            "put" => {
                let key = match parts.next() {
                    Some(k) => k,
                    None => {
                        println!("Usage: put <key> <value>");
                        continue;
                    },
                };
                let value = match parts.next() {
                    Some(v) => v,
                    None => {
                        println!("Usage: put <key> <value>");
                        continue;
                    },
                };
                match store.put(key, value.as_bytes()) {
                    Ok(()) => println!("OK"),
                    Err(e) => println!("Error: {}", e),
                }
            },

            "get" => {
                let key = match parts.next() {
                    Some(k) => k,
                    None => {
                        println!("Usage: get <key>");
                        continue;
                    },
                };

                match store.get(key) {
                    Ok(v) => println!("{}", String::from_utf8_lossy(&v)),
                    Err(logkv::StoreError::NotFound) => println!("Key not found"),
                    Err(e) => println!("Error: {}", e),
                }
            },

            "stats" => match store.stats() {
                Ok(stats) => println!("{}", stats),
                Err(e) => println!("Error: {}", e),
            },

            "help" => print_help(),
            "quit" | "exit" => break,

            other => println!("Unknown command: '{}'", other),
        }
    }

    if let Err(e) = store.close() {
        eprintln!("error closing store: {}", e);
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  put <key> <value>");
    println!("  get <key>");
    println!("  stats");
    println!("  help");
    println!("  quit / exit");
}
