//! Command line argument parsing
//!
//! Subcommands map one-to-one onto the site backend resources:
//! - `health`: Probe the backend
//! - `projects`: List, show, like projects and list categories
//! - `contact`: Submit the contact form (or print a mail compose link)
//! - `newsletter`: Subscribe or unsubscribe an email address
//! - `track`: Send a single analytics event
//! - `browse`: Walk a sequence of site routes, firing page views
//! - `session`: Show or reset the persisted session identifier
//! - `show-config`: Show configuration discovery information

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "nullbots")]
#[command(author = "NULLBOTS Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the NULLBOTS studio site API")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// API base URL (overrides NULLBOTS_API_URL and config files)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    /// Referrer reported with analytics events
    #[arg(long = "referrer", global = true)]
    pub referrer: Option<String>,
    /// Keep the session in memory instead of the session file
    #[arg(long = "ephemeral-session", global = true)]
    pub ephemeral_session: bool,
    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe the backend liveness endpoint
    Health,
    /// Portfolio projects
    Projects {
        #[command(subcommand)]
        action: ProjectsCommand,
    },
    /// Submit the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        /// Print a pre-filled mail compose link instead of posting to the API
        #[arg(long = "mail-link")]
        mail_link: bool,
    },
    /// Newsletter subscription
    Newsletter {
        #[command(subcommand)]
        action: NewsletterCommand,
    },
    /// Send one analytics event
    Track {
        /// Event name, e.g. page_view
        event: String,
        /// Page path the event happened on
        #[arg(long, default_value = "/")]
        page: String,
        #[arg(long = "project-id")]
        project_id: Option<String>,
    },
    /// Visit site routes in order, firing a page view for each
    Browse {
        /// Route paths, the first one is the landing page
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<String>,
    },
    /// Analytics session identifier
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
    /// Show configuration discovery information
    ShowConfig,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List projects
    List {
        #[arg(long)]
        category: Option<String>,
        /// Only featured projects
        #[arg(long)]
        featured: bool,
    },
    /// Show a single project
    Show { id: String },
    /// List project categories
    Categories,
    /// Like a project
    Like { id: String },
}

#[derive(Debug, Subcommand)]
pub enum NewsletterCommand {
    Subscribe { email: String },
    Unsubscribe { email: String },
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Print the current session identifier, creating one if needed
    Show,
    /// Forget the session; the next command starts a new one
    Reset,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
