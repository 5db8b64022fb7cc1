use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::catalog::{self, PbiType, TaskTemplate};
use crate::client::tfs::TfsClient;
use crate::client::WorkItemClient;
use crate::config::AppConfig;
use crate::credentials::{CredentialProvider, Credentials, FileCredentialProvider};
use crate::ops::cleanup::{self, TitleMode};
use crate::ops::{removal, tasks, BatchReport};
use crate::prompt;

/// Automates routine PBI and task chores on a TFS / Azure DevOps server
#[derive(Parser, Debug)]
#[command(name = "chores")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a cleanup PBI for a shipped PBI and seed its cleanup tasks
    Cleanup {
        /// Source PBI id (prompted for when omitted)
        pbi: Option<u64>,

        /// Where the cleanup title comes from
        #[arg(long, value_enum, default_value_t = TitleMode::FromPbi)]
        title: TitleMode,

        /// Leave the cleanup title empty
        #[arg(long, conflicts_with = "title")]
        untitled: bool,
    },

    /// Copy a single task under another PBI
    CopyTask {
        task: Option<u64>,
        target: Option<u64>,
    },

    /// Add the boilerplate tasks for a PBI type
    AddTasks {
        pbi: Option<u64>,

        #[arg(long = "type", short = 't', value_enum, default_value_t = PbiType::RegularTasks)]
        pbi_type: PbiType,
    },

    /// Copy all tasks of one PBI under another
    CloneTasks {
        source: Option<u64>,
        target: Option<u64>,
    },

    /// Mark a task Removed and move it to the removal area
    RemoveTask { task: Option<u64> },

    /// Remove a PBI together with its tasks
    RemovePbi { pbi: Option<u64> },

    /// List the task templates for a PBI type (all types when omitted)
    Templates { pbi_type: Option<String> },
}

struct Session {
    config: AppConfig,
    creds: Credentials,
    client: TfsClient,
}

fn connect(config: AppConfig) -> Result<Session> {
    let provider = FileCredentialProvider::new(
        config.credentials_path(),
        config.credentials.clone(),
    );
    let creds = provider.credentials()?;
    let client = TfsClient::new(&creds, &config.server).context("Failed to set up HTTP client")?;
    Ok(Session {
        config,
        creds,
        client,
    })
}

pub async fn run(command: Command, config: AppConfig) -> Result<()> {
    if let Command::Templates { pbi_type } = &command {
        print_templates(pbi_type.as_deref());
        return Ok(());
    }

    let session = connect(config)?;
    let client: &dyn WorkItemClient = &session.client;
    let creds = &session.creds;

    match command {
        Command::Cleanup {
            pbi,
            title,
            untitled,
        } => {
            let source = prompt::item_id(pbi, "Enter the original PBI ID")?;
            let mode = if untitled { None } else { Some(title) };
            let outcome = cleanup::create_cleanup_pbi(client, creds, source, mode).await?;
            println!("PBI {} was created successfully", outcome.pbi_id);
            if let Some(e) = &outcome.link_error {
                println!("  (could not link it to PBI {source}: {e})");
            }
            print_report("Cleanup tasks", &outcome.tasks);
        }
        Command::CopyTask { task, target } => {
            let task_id = prompt::item_id(task, "Enter the task ID")?;
            let target_id = prompt::item_id(target, "Enter the target PBI ID")?;
            let task = client.get_work_item(task_id).await?;
            let target = client.get_work_item(target_id).await?;
            let id = tasks::copy_task(client, &task, &target).await?;
            println!("Task {id} was copied to PBI {target_id} successfully");
        }
        Command::AddTasks { pbi, pbi_type } => {
            let pbi_id = prompt::item_id(pbi, "Enter the PBI ID")?;
            let report = tasks::add_tasks_to_pbi(client, creds, pbi_id, pbi_type).await?;
            print_report(&format!("{pbi_type} on PBI {pbi_id}"), &report);
        }
        Command::CloneTasks { source, target } => {
            let source_id = prompt::item_id(source, "Enter the source PBI ID")?;
            let target_id = prompt::item_id(target, "Enter the target PBI ID")?;
            let report = tasks::clone_pbi_tasks(client, source_id, target_id).await?;
            print_report(&format!("Tasks cloned to PBI {target_id}"), &report);
        }
        Command::RemoveTask { task } => {
            let task_id = prompt::item_id(task, "Enter the task ID")?;
            removal::remove_task(client, creds, &session.config.removal, task_id).await?;
            println!("Task {task_id} was removed successfully");
        }
        Command::RemovePbi { pbi } => {
            let pbi_id = prompt::item_id(pbi, "Enter the PBI ID")?;
            let outcome =
                removal::remove_pbi_with_tasks(client, creds, &session.config.removal, pbi_id)
                    .await?;
            print_report(&format!("Tasks of PBI {pbi_id} removed"), &outcome.tasks);
            if outcome.pbi_removed {
                println!("PBI {pbi_id} was removed successfully");
            } else {
                println!("PBI {pbi_id} was left in place");
            }
        }
        Command::Templates { .. } => {}
    }

    Ok(())
}

fn print_report(what: &str, report: &BatchReport) {
    println!(
        "{what}: {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        println!("  {}: {}", failure.item, failure.error);
    }
}

fn format_template(template: &TaskTemplate) -> String {
    let mut line = format!(
        "{:<28} priority {:>3}  {:<12}",
        template.title,
        template.backlog_priority,
        template.activity.as_str()
    );
    if !template.remaining_work.is_empty() {
        line.push_str(&format!("  {}h", template.remaining_work));
    }
    if template.assignee.is_some() {
        line.push_str("  (assigned to you)");
    }
    line
}

fn print_templates(pbi_type: Option<&str>) {
    let names: Vec<&str> = match pbi_type {
        Some(name) => vec![name],
        None => PbiType::ALL.iter().map(PbiType::as_str).collect(),
    };
    for name in names {
        let templates = catalog::templates_for(name);
        println!("{name}:");
        if templates.is_empty() {
            println!("  (no tasks)");
        }
        for template in &templates {
            println!("  {}", format_template(template));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TaskKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("chores").chain(args.iter().copied()))
    }

    #[test]
    fn cleanup_defaults_to_pbi_title() {
        let cli = parse(&["cleanup", "123"]).unwrap();
        match cli.command {
            Command::Cleanup {
                pbi,
                title,
                untitled,
            } => {
                assert_eq!(pbi, Some(123));
                assert_eq!(title, TitleMode::FromPbi);
                assert!(!untitled);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cleanup_from_feature() {
        let cli = parse(&["cleanup", "--title", "from-feature"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Cleanup {
                pbi: None,
                title: TitleMode::FromFeature,
                ..
            }
        ));
    }

    #[test]
    fn untitled_conflicts_with_explicit_title() {
        assert!(parse(&["cleanup", "1", "--untitled", "--title", "from-pbi"]).is_err());
        assert!(parse(&["cleanup", "1", "--untitled"]).is_ok());
    }

    #[test]
    fn add_tasks_takes_type_by_name() {
        let cli = parse(&["add-tasks", "55", "--type", "GoingLiveTasks"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::AddTasks {
                pbi: Some(55),
                pbi_type: PbiType::GoingLiveTasks
            }
        ));
    }

    #[test]
    fn add_tasks_rejects_unknown_type() {
        assert!(parse(&["add-tasks", "55", "--type", "regular"]).is_err());
    }

    #[test]
    fn ids_must_be_numbers() {
        assert!(parse(&["remove-task", "abc"]).is_err());
        assert!(parse(&["clone-tasks", "1", "2"]).is_ok());
    }

    #[test]
    fn verbose_is_global() {
        let cli = parse(&["remove-pbi", "9", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn template_line_mentions_assignee() {
        let line = format_template(&TaskKind::ReviewTests.template());
        assert!(line.starts_with("Review Tests"));
        assert!(line.contains("170"));
        assert!(line.contains("0.5h"));
        assert!(line.contains("assigned to you"));
    }
}
