// ABOUTME: Server binary for the WhatTheFork nutrition analysis application
// ABOUTME: Loads configuration, initializes logging, and serves the HTTP API plus UI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 WhatTheFork

//! # WhatTheFork Server Binary
//!
//! Starts the HTTP server serving the browser UI, the analysis endpoint,
//! and the daily progress API.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use whatthefork_server::{
    config::ServerConfig,
    logging,
    server::{HttpServer, ServerResources},
};

#[derive(Parser)]
#[command(name = "whatthefork-server")]
#[command(about = "WhatTheFork - food photo nutrition analysis and daily calorie tracking")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting WhatTheFork server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::new(config)?);
    HttpServer::new(resources).run().await
}
