//! CLI module for the Tender Evaluation API
//!
//! Provides subcommands for running the service:
//! - `api`: run the HTTP API server

pub mod api;

use clap::{Parser, Subcommand};

/// Tender Evaluation API - Bedrock knowledge base chat with source citations
#[derive(Parser)]
#[command(name = "tender-eval-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Api,
}
