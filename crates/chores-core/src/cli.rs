use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use chores_shared::{Category, SortColumn, Task};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "chores",
    version,
    about = "Household chore tracker",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Config file to read instead of the default location.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Store base URL.
    #[arg(long = "url", global = true)]
    pub url: Option<String>,

    /// Store access key.
    #[arg(long = "key", global = true)]
    pub key: Option<String>,

    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List chores with their due status.
    List(ListArgs),
    /// List categories and how many chores each holds.
    Categories,
    /// Mark a chore as done today.
    Complete {
        task: String,
        /// Who did it; defaults to the configured label.
        #[arg(long = "by")]
        by: Option<String>,
    },
    /// Add a new chore.
    Add(AddArgs),
    /// Change an existing chore.
    Edit(EditArgs),
    /// Delete a chore.
    Delete {
        task: String,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// Show every field of one chore.
    Show { task: String },
}

impl Default for Command {
    fn default() -> Self {
        Self::List(ListArgs::default())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Category name or id; `all` disables filtering.
    #[arg(long = "category", short = 'c')]
    pub category: Option<String>,

    #[arg(long = "sort", short = 's')]
    pub sort: Option<SortColumn>,

    #[arg(long = "desc", requires = "sort")]
    pub desc: bool,

    #[arg(long = "layout", value_enum, default_value_t = LayoutChoice::Auto)]
    pub layout: LayoutChoice,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutChoice {
    /// Cards on narrow terminals, a table otherwise.
    #[default]
    Auto,
    Table,
    Cards,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    pub name: String,

    /// Days between completions.
    #[arg(long = "frequency", short = 'f')]
    pub frequency: Option<String>,

    #[arg(long = "category", short = 'c')]
    pub category: Option<String>,

    #[arg(long = "description", short = 'd')]
    pub description: Option<String>,

    /// YYYY-MM-DD
    #[arg(long = "last-completed")]
    pub last_completed: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    pub task: String,

    #[arg(long = "name")]
    pub name: Option<String>,

    #[arg(long = "frequency", short = 'f')]
    pub frequency: Option<String>,

    #[arg(long = "category", short = 'c', conflicts_with = "clear_category")]
    pub category: Option<String>,

    #[arg(long = "description", short = 'd', conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// YYYY-MM-DD
    #[arg(long = "last-completed", conflicts_with = "clear_last_completed")]
    pub last_completed: Option<String>,

    #[arg(long = "clear-category")]
    pub clear_category: bool,

    #[arg(long = "clear-description")]
    pub clear_description: bool,

    #[arg(long = "clear-last-completed")]
    pub clear_last_completed: bool,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Picks the single candidate whose key equals `token` or starts with it.
pub fn unique_prefix_match<'a, T>(
    token: &str,
    candidates: &'a [T],
    key: impl Fn(&T) -> String,
) -> Result<&'a T, PrefixError> {
    if let Some(exact) = candidates.iter().find(|c| key(c) == token) {
        return Ok(exact);
    }

    let mut matches = candidates.iter().filter(|c| key(c).starts_with(token));
    let first = matches.next().ok_or(PrefixError::NoMatch)?;
    if matches.next().is_some() {
        return Err(PrefixError::Ambiguous);
    }
    Ok(first)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixError {
    NoMatch,
    Ambiguous,
}

/// Resolves a task reference: a full id, an unambiguous id prefix (with or
/// without dashes), or a case-insensitive exact name.
#[tracing::instrument(skip(tasks))]
pub fn resolve_task<'a>(reference: &str, tasks: &'a [Task]) -> anyhow::Result<&'a Task> {
    let token = reference.trim();
    if token.is_empty() {
        bail!("empty task reference");
    }

    if let Ok(id) = Uuid::parse_str(token) {
        return tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or_else(|| anyhow!("no task with id {id}"));
    }

    let lowered = token.to_ascii_lowercase();
    let by_id = if lowered.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        let prefix = lowered.replace('-', "");
        unique_prefix_match(&prefix, tasks, |task| task.id.simple().to_string())
    } else {
        Err(PrefixError::NoMatch)
    };

    match by_id {
        Ok(task) => {
            debug!(reference = token, id = %task.id, "resolved task by id prefix");
            Ok(task)
        }
        Err(PrefixError::Ambiguous) => Err(anyhow!(
            "task reference '{token}' matches more than one task; use more characters"
        )),
        Err(PrefixError::NoMatch) => {
            let mut named = tasks
                .iter()
                .filter(|task| task.name.trim().eq_ignore_ascii_case(token));
            let task = named
                .next()
                .ok_or_else(|| anyhow!("no task matches '{token}'"))?;
            if named.next().is_some() {
                bail!("more than one task is named '{token}'; use its id");
            }
            Ok(task)
        }
    }
}

/// Resolves a category by case-insensitive name or id prefix.
pub fn resolve_category<'a>(
    reference: &str,
    categories: &'a [Category],
) -> anyhow::Result<&'a Category> {
    let token = reference.trim();
    if let Some(category) = categories
        .iter()
        .find(|category| category.name.trim().eq_ignore_ascii_case(token))
    {
        return Ok(category);
    }

    let prefix = token.to_ascii_lowercase().replace('-', "");
    match unique_prefix_match(&prefix, categories, |c| c.id.simple().to_string()) {
        Ok(category) if !prefix.is_empty() => Ok(category),
        Err(PrefixError::Ambiguous) => {
            Err(anyhow!("category '{token}' matches more than one category"))
        }
        _ => Err(anyhow!("no category matches '{token}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, name: &str) -> Task {
        Task {
            id: Uuid::parse_str(id).unwrap(),
            name: name.to_string(),
            description: None,
            frequency_days: 7,
            last_completed: None,
            category_id: None,
            completed_by: None,
            created_at: None,
        }
    }

    fn tasks() -> Vec<Task> {
        vec![
            task("3f2a0000-0000-4000-8000-000000000001", "Vacuum"),
            task("3f2b0000-0000-4000-8000-000000000002", "Dishes"),
            task("a1000000-0000-4000-8000-000000000003", "Laundry"),
        ]
    }

    #[test]
    fn unique_prefix_resolves() {
        let tasks = tasks();
        assert_eq!(resolve_task("a1", &tasks).unwrap().name, "Laundry");
        assert_eq!(resolve_task("3F2B", &tasks).unwrap().name, "Dishes");
        assert_eq!(
            resolve_task("3f2a0000-0000-4000-8000-000000000001", &tasks)
                .unwrap()
                .name,
            "Vacuum"
        );
    }

    #[test]
    fn ambiguous_prefix_is_rejected() {
        let err = resolve_task("3f2", &tasks()).unwrap_err();
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn names_resolve_when_no_id_matches() {
        let tasks = tasks();
        assert_eq!(resolve_task("dishes", &tasks).unwrap().name, "Dishes");
        assert!(resolve_task("mop", &tasks).is_err());
    }

    #[test]
    fn categories_resolve_by_name_or_id() {
        let categories = vec![
            Category {
                id: Uuid::parse_str("c0000000-0000-4000-8000-000000000001").unwrap(),
                name: "Kitchen".to_string(),
            },
            Category {
                id: Uuid::parse_str("d0000000-0000-4000-8000-000000000002").unwrap(),
                name: "Yard".to_string(),
            },
        ];
        assert_eq!(resolve_category("kitchen", &categories).unwrap().name, "Kitchen");
        assert_eq!(resolve_category("d0", &categories).unwrap().name, "Yard");
        assert!(resolve_category("", &categories).is_err());
        assert!(resolve_category("garage", &categories).is_err());
    }

    #[test]
    fn cli_parses_list_flags() {
        let cli = GlobalCli::try_parse_from([
            "chores", "list", "--category", "Kitchen", "--sort", "last-completed", "--desc",
            "--layout", "cards",
        ])
        .unwrap();
        let Some(Command::List(args)) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.category.as_deref(), Some("Kitchen"));
        assert_eq!(args.sort, Some(SortColumn::LastCompleted));
        assert!(args.desc);
        assert_eq!(args.layout, LayoutChoice::Cards);
    }

    #[test]
    fn no_subcommand_defaults_to_list() {
        let cli = GlobalCli::try_parse_from(["chores", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command.unwrap_or_default(), Command::List(_)));
    }
}
