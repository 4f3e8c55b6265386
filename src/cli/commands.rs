//! Command dispatch: every tree command ingests its source, then reports.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{format_context, ApplicationError, IngestReport};
use crate::cli::args::{Cli, Commands, ConfigCommands, SourceArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::global_config_path;
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { input }) => cmd_tree(container, input),
        Some(Commands::Ingest { input }) => cmd_ingest(container, input),
        Some(Commands::Stats { input, json }) => cmd_stats(container, input, *json),
        Some(Commands::Related { input, query }) => cmd_related(container, input, &query.join(" ")),
        Some(Commands::Find { input, text }) => cmd_find(container, input, text),
        Some(Commands::Leaves { input }) => cmd_leaves(container, input),
        Some(Commands::Verify { input }) => cmd_verify(container, input),
        Some(Commands::Config { command }) => cmd_config(container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `conceptree --help`".to_string(),
        )),
    }
}

/// Reads the source and feeds it into the container's tree.
#[instrument(level = "debug", skip(container))]
pub fn load_source(container: &ServiceContainer, input: &SourceArgs) -> CliResult<IngestReport> {
    if input.source.as_os_str() != "-" && !container.fs.exists(&input.source) {
        return Err(CliError::InvalidArgs(format!(
            "source does not exist: {}",
            input.source.display()
        )));
    }
    let raw = container.read_source(&input.source)?;
    let service = container.ingest_service();
    let report = if input.extracted {
        service.ingest_extracted(&raw)
    } else {
        service.ingest(raw.lines())
    };
    debug!(added = report.added.len(), "source loaded");
    Ok(report)
}

fn cmd_tree(container: &ServiceContainer, input: &SourceArgs) -> CliResult<()> {
    load_source(container, input)?;
    output::info(&container.tree.render());
    Ok(())
}

fn cmd_ingest(container: &ServiceContainer, input: &SourceArgs) -> CliResult<()> {
    let report = load_source(container, input)?;
    match report.summary(container.settings.summary_limit) {
        Some(summary) => {
            output::success(&format!("learned {} concepts:", report.added.len()));
            output::info(&summary);
        }
        None => output::warning("no new concepts found"),
    }
    if !report.duplicates.is_empty() {
        output::detail(&format!("{} duplicates skipped", report.duplicates.len()));
    }
    Ok(())
}

fn cmd_stats(container: &ServiceContainer, input: &SourceArgs, json: bool) -> CliResult<()> {
    load_source(container, input)?;
    let stats = container.tree.stats();
    if json {
        let rendered = serde_json::to_string_pretty(&stats).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize stats".to_string(),
                source: Box::new(e),
            }
        })?;
        output::info(&rendered);
    } else {
        output::info(&stats);
    }
    Ok(())
}

fn cmd_related(container: &ServiceContainer, input: &SourceArgs, query: &str) -> CliResult<()> {
    load_source(container, input)?;
    let related = container.tree.find_related(query);
    if related.is_empty() {
        output::warning(&format!("no concepts related to '{}'", query));
    } else {
        output::info(&format_context(&related));
    }
    Ok(())
}

fn cmd_find(container: &ServiceContainer, input: &SourceArgs, text: &str) -> CliResult<()> {
    load_source(container, input)?;
    let Some(found) = container.tree.find_exact(text) else {
        output::warning(&format!("concept not found: {}", text));
        return Ok(());
    };

    let (level, parent, children) = container.tree.read(|tree| {
        let parent = found.parent.and_then(|p| tree.text(p)).map(str::to_string);
        let children: Vec<String> = found
            .children
            .iter()
            .filter_map(|&c| tree.text(c).map(str::to_string))
            .collect();
        (tree.depth_of(found.id).unwrap_or(0), parent, children)
    });

    output::header(&found.text);
    output::action("level", &level);
    output::action("parent", &parent.unwrap_or_else(|| "-".to_string()));
    for child in children {
        output::detail(&child);
    }
    Ok(())
}

fn cmd_leaves(container: &ServiceContainer, input: &SourceArgs) -> CliResult<()> {
    load_source(container, input)?;
    let leaves: Vec<String> = container.tree.read(|tree| {
        tree.leaf_nodes()
            .into_iter()
            .filter_map(|id| tree.text(id).map(str::to_string))
            .collect()
    });
    for leaf in leaves {
        output::info(&leaf);
    }
    Ok(())
}

fn cmd_verify(container: &ServiceContainer, input: &SourceArgs) -> CliResult<()> {
    load_source(container, input)?;
    container
        .tree
        .verify()
        .map_err(ApplicationError::from)?;
    output::success(&format!(
        "{} concepts, all invariants hold",
        container.tree.stats().total_nodes
    ));
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available"),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::application::parse_concept_lines;
    use crate::config::Settings;
    use crate::infrastructure::MemoryFileSystem;

    fn container(fs: MemoryFileSystem) -> ServiceContainer {
        ServiceContainer::with_deps(Settings::default(), Arc::new(fs))
    }

    fn source(path: &str, extracted: bool) -> SourceArgs {
        SourceArgs {
            source: PathBuf::from(path),
            extracted,
        }
    }

    #[test]
    fn test_load_source_ingests_file_lines() {
        let c = container(MemoryFileSystem::new().with_file("concepts.txt", "cat\ncats\n\ndog\n"));
        let report = load_source(&c, &source("concepts.txt", false)).unwrap();
        assert_eq!(report.added, vec!["cat", "cats", "dog"]);
        assert_eq!(report.skipped_blank, 1);
        assert_eq!(c.tree.stats().depth, 2);
    }

    #[test]
    fn test_load_source_reads_stdin() {
        let c = container(MemoryFileSystem::new().with_stdin("alpha\nbeta\n"));
        let report = load_source(&c, &source("-", false)).unwrap();
        assert_eq!(report.added, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_load_source_missing_file_is_invalid_args() {
        let c = container(MemoryFileSystem::new());
        let err = load_source(&c, &source("missing.txt", false)).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgs(_)));
    }

    #[test]
    fn test_load_source_extracted_caps_concepts() {
        let lines: String = (0..30).map(|i| format!("concept {}\n", i)).collect();
        let c = container(MemoryFileSystem::new().with_file("raw.txt", lines.clone()));
        let report = load_source(&c, &source("raw.txt", true)).unwrap();
        assert_eq!(report.added.len(), 20);
        assert_eq!(report.added, parse_concept_lines(&lines, 20));
    }
}
