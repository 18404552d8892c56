use clap::Subcommand;

use crate::feedback::types::{FeedbackStatus, FeedbackType, Priority};
use crate::query::types::{Filter, SortKey};
use crate::storage::types::Theme;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Log in and remember the session
    Login {
        email: String,
        #[arg(long, env = "FEEDBACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Signup {
        name: String,
        email: String,
        #[arg(long, env = "FEEDBACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Update the local profile of the logged-in user
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Fetch the whole collection (cached copy when offline)
    List,
    /// Filtered, sorted and paginated view
    Search {
        /// Matched against title, description and author name
        #[arg(short, long, default_value = "")]
        query: String,
        /// `all` or one status
        #[arg(long, default_value = "all")]
        status: Filter<FeedbackStatus>,
        /// `all` or one type
        #[arg(long = "type", default_value = "all")]
        kind: Filter<FeedbackType>,
        #[arg(long, default_value = "date")]
        sort: SortKey,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Defaults to `query.default_page_size` from the configuration
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Submit a piece of feedback
    Submit {
        /// Defaults to the logged-in user's name
        #[arg(long)]
        name: Option<String>,
        /// Defaults to the logged-in user's email
        #[arg(long)]
        email: Option<String>,
        #[arg(long = "type")]
        kind: FeedbackType,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        rating: u8,
    },
    /// Change the status of an item (login required)
    Status { id: String, status: FeedbackStatus },
    /// Delete an item (login required)
    Delete { id: String },
    /// Summary of the cached collection
    Stats,
    /// Show, set or toggle the theme preference
    Theme {
        value: Option<Theme>,
        #[arg(long, conflicts_with = "value")]
        toggle: bool,
    },
}

impl Command {
    /// Name used in messages, e.g. when a login is required.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Signup { .. } => "signup",
            Command::Logout => "logout",
            Command::Whoami => "whoami",
            Command::Profile { .. } => "profile",
            Command::List => "list",
            Command::Search { .. } => "search",
            Command::Submit { .. } => "submit",
            Command::Status { .. } => "status",
            Command::Delete { .. } => "delete",
            Command::Stats => "stats",
            Command::Theme { .. } => "theme",
        }
    }

    pub fn requires_login(&self) -> bool {
        matches!(self, Command::Status { .. } | Command::Delete { .. })
    }
}
