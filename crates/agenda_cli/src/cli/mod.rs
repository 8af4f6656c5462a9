use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Acting user id (defaults to AGENDA_ACTOR_ID)
    #[arg(long, global = true)]
    pub actor: Option<u64>,

    /// Comma-separated role names of the acting user (defaults to AGENDA_ACTOR_ROLES)
    #[arg(long, global = true)]
    pub roles: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered events
    ///
    /// Example: agenda events
    Events,
    /// List pending tasks for an area
    ///
    /// Example: agenda tasks marketing
    Tasks {
        area: String,
    },
    /// Add a new event (managers only)
    ///
    /// Example: agenda add-event "Launch" 2026-03-01 2026-03-05 --partners "TechGirls"
    AddEvent {
        name: String,
        start: String,
        end: String,
        #[arg(long, default_value = "")]
        acting: String,
        #[arg(long, default_value = "")]
        partners: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Add a task to an event (managers only)
    ///
    /// Example: agenda add-task 1 "Announce opening" marketing 2026-02-15 --assignees 42,99
    AddTask {
        event: usize,
        title: String,
        area: String,
        due: String,
        #[arg(long, value_delimiter = ',', required = true)]
        assignees: Vec<u64>,
        #[arg(long, default_value = "")]
        tools: String,
        #[arg(long, default_value = "")]
        details: String,
    },
    /// Update the progress of a task
    ///
    /// Example: agenda progress 1 2 75
    Progress {
        event: usize,
        task: usize,
        percent: u8,
    },
    /// Submit a finished task for review
    ///
    /// Example: agenda done 1 2 https://example.com/doc --reviewer 7 --reviewer-roles diretoria
    Done {
        event: usize,
        task: usize,
        link: String,
        #[arg(long)]
        reviewer: u64,
        #[arg(long, default_value = "")]
        reviewer_roles: String,
    },
    /// Approve or reject a submitted task (managers only)
    ///
    /// Example: agenda review 1 2 approve
    /// Example: agenda review 1 2 reject -m "missing the final numbers"
    Review {
        event: usize,
        task: usize,
        verdict: Verdict,
        #[arg(short = 'm', long = "message", value_name = "MESSAGE")]
        message: Option<String>,
    },
    /// Show one event with its tasks
    ///
    /// Example: agenda show 1
    Show {
        event: usize,
    },
    /// Run a single reminder pass
    ///
    /// Example: agenda remind
    /// Example: agenda remind --today 2026-02-15
    Remind {
        /// Simulated current date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },
    /// Run the reminder loop with the configured tick interval
    ///
    /// Example: agenda serve
    Serve,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

/// Splits a comma-separated role list the way the platform reports role
/// names: trimmed, empties dropped.
pub fn parse_role_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_role_list;

    #[test]
    fn parse_role_list_trims_and_drops_empties() {
        assert_eq!(
            parse_role_list(" diretoria , lideranca ,,"),
            vec!["diretoria".to_string(), "lideranca".to_string()]
        );
        assert!(parse_role_list("").is_empty());
    }
}
