use std::sync::Arc;

use crate::server;
use crate::services::{SymbolTable, YahooClient};

pub async fn run(port: u16) {
    println!("🚀 Starting marketfacade server on port {}", port);

    let symbols = Arc::new(SymbolTable::new());
    println!("📈 {} symbols loaded", symbols.len());

    let client = match YahooClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to build upstream client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::serve(symbols, client, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
