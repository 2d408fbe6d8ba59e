//! Command-line interface parsing for the rail customer CLI
//!
//! This module handles parsing of CLI arguments using clap, including the
//! partner service location and cache TTL settings (flags or environment
//! variables) and the resolve / preferences subcommands.

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::data::{Language, SeatPreference};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified seat preference is not recognized
    #[error("Invalid seat preference: '{0}'. Valid values: none, window, corridor")]
    InvalidSeatPreference(String),

    /// The specified language code is not supported
    #[error("Invalid language: '{0}'. Supported languages: fr, de, es, en, it, pt")]
    InvalidLanguage(String),
}

/// Rail customer CLI - resolve customer profiles and manage preferences
#[derive(Parser, Debug)]
#[command(name = "railcust")]
#[command(about = "Resolve rail customer profiles and manage travel preferences")]
#[command(version)]
pub struct Cli {
    /// Base URL of the partner customer web service
    #[arg(
        long,
        env = "RAILCUST_PARTNER_URL",
        default_value = "http://localhost:8080"
    )]
    pub partner_url: String,

    /// Customer cache TTL in seconds
    #[arg(long, env = "RAILCUST_CACHE_TTL_SECONDS", default_value_t = 300)]
    pub cache_ttl_seconds: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a customer profile by id (cache first, partner on a miss)
    Resolve {
        /// Customer identifier
        customer_id: String,
    },
    /// Manage customer preference profiles
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },
}

/// Preference profile commands
#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Create a new named preference profile for a customer
    Create {
        /// Owning customer identifier
        customer_id: String,
        /// Seat preference: none, window or corridor
        #[arg(long)]
        seat: String,
        /// Travel class preference: 1 or 2
        #[arg(long = "class")]
        class_preference: i32,
        /// Display name of the profile
        #[arg(long = "name")]
        profile_name: String,
        /// Preferred language code (fr, de, es, en, it, pt)
        #[arg(long)]
        language: Option<String>,
    },
    /// List a customer's preference profiles
    List {
        /// Owning customer identifier
        customer_id: String,
    },
}

/// Parses a seat preference argument.
///
/// # Returns
/// * `Ok(SeatPreference)` if the string matches a valid preference
/// * `Err(CliError::InvalidSeatPreference)` otherwise
pub fn parse_seat_arg(s: &str) -> Result<SeatPreference, CliError> {
    SeatPreference::from_str(s).ok_or_else(|| CliError::InvalidSeatPreference(s.to_string()))
}

/// Parses a language code argument.
///
/// # Returns
/// * `Ok(Language)` if the code is supported
/// * `Err(CliError::InvalidLanguage)` otherwise
pub fn parse_language_arg(s: &str) -> Result<Language, CliError> {
    Language::from_str(s).ok_or_else(|| CliError::InvalidLanguage(s.to_string()))
}
