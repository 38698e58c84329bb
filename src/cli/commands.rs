//! Command construction and execution

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::args::{Args, CliCommand};
use crate::config::{load_config, CliOverrides};
use crate::core::orchestrator::Orchestrator;
use crate::error::{handle_error, Result, ResultExt};
use crate::models::config::{OutputFormat, Settings};
use crate::models::operation::RefactorOperation;
use crate::output::formatters::{format_report_json, format_report_text};
use crate::output::graph_export::GraphExport;
use crate::output::progress::ProgressReporter;
use crate::output::writers::write_output;

/// A fully resolved command, ready to execute
pub enum Command {
    /// Create a default configuration file
    Init,
    /// Build the graph and report on it without an operation
    Graph { settings: Settings },
    /// Run the full analysis pipeline for one operation
    Analyze {
        settings: Settings,
        operation: RefactorOperation,
    },
}

impl Command {
    /// Resolve parsed arguments into a command, merging configuration
    /// from file, environment, and flags
    pub fn from_args(args: Args) -> Result<Command> {
        if matches!(args.command, CliCommand::Init) {
            return Ok(Command::Init);
        }

        let overrides = CliOverrides {
            path: args.path.clone(),
            include: args.include.clone(),
            exclude: args.exclude.clone(),
            max_depth: args.max_depth,
            follow_links: args.follow_links,
            no_parallel: args.no_parallel,
            threads: args.threads,
            output: args.output.map(Into::into),
            output_file: args.output_file.clone(),
            no_colors: args.no_colors,
            quiet: args.quiet,
            verbose: args.verbose,
            no_progress: args.no_progress,
            graph_output: args.graph_output.clone(),
        };
        let settings = load_config(overrides, args.config.clone())?;

        match args.command {
            CliCommand::Rename {
                module,
                old_symbol,
                new_symbol,
            } => Ok(Command::Analyze {
                settings,
                operation: RefactorOperation::Rename {
                    module,
                    old_symbol,
                    new_symbol,
                },
            }),
            CliCommand::Move {
                module,
                new_location,
            } => Ok(Command::Analyze {
                settings,
                operation: RefactorOperation::Move {
                    module,
                    new_location,
                },
            }),
            CliCommand::Split {
                module,
                assignments,
            } => {
                let partition: BTreeMap<String, String> = assignments.into_iter().collect();
                Ok(Command::Analyze {
                    settings,
                    operation: RefactorOperation::Split { module, partition },
                })
            }
            CliCommand::Graph => Ok(Command::Graph { settings }),
            CliCommand::Init => unreachable!("handled above"),
        }
    }

    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Command::Init => execute_init(),
            Command::Graph { settings } => execute_graph(settings),
            Command::Analyze {
                settings,
                operation,
            } => execute_analyze(settings, operation),
        }
    }
}

fn execute_init() -> Result<()> {
    let config_path = PathBuf::from(crate::config::file::DEFAULT_CONFIG_FILE);

    if config_path.exists() {
        println!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(());
    }

    crate::config::create_default_config(&config_path)
        .with_context(|| "Failed to create the configuration file")?;

    println!(
        "Created default configuration file at: {}",
        config_path.display()
    );
    println!("\nEdit it to configure project root, include/exclude patterns,");
    println!("parallelism, and output options. Command line flags always win.");

    Ok(())
}

fn execute_graph(settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings.clone());
    let reporter = Arc::new(ProgressReporter::new(
        settings.show_progress && !settings.quiet,
    ));

    let reporter_for_updates = Arc::clone(&reporter);
    let (graph, diagnostics) = orchestrator
        .build_graph_with_progress(Some(move |update| reporter_for_updates.update(&update)))?;
    reporter.finish();

    let export = GraphExport::from_graph(&graph);

    if let Some(dot_path) = &settings.graph_output {
        // A failed DOT export should not discard the analysis output
        match write_output(&export.to_dot(), Some(dot_path)) {
            Ok(()) if !settings.quiet => {
                eprintln!("Wrote DOT graph to {}", dot_path.display());
            }
            Ok(()) => {}
            Err(err) => {
                if let Some(critical) = handle_error(err) {
                    return Err(critical);
                }
            }
        }
    }

    let rendered = match settings.output_format {
        OutputFormat::Json => export.to_json()?,
        OutputFormat::Csv => export.to_csv()?,
        OutputFormat::Text => {
            let summary = graph.summary();
            let mut text = format!(
                "{} modules, {} imports ({} unresolved)\n",
                summary.module_count, summary.edge_count, summary.unresolved_import_count
            );
            let cycles = crate::core::cycles::find_cycles(&graph);
            if cycles.is_empty() {
                text.push_str("No import cycles.\n");
            } else {
                text.push_str(&format!("Import cycles ({}):\n", cycles.len()));
                for cycle in &cycles {
                    let names: Vec<&str> = cycle
                        .iter()
                        .map(|&id| graph.module(id).name.as_str())
                        .collect();
                    text.push_str(&format!("  {}\n", names.join(" -> ")));
                }
            }
            for diagnostic in &diagnostics {
                text.push_str(&format!(
                    "[{}] {}: {}\n",
                    diagnostic.kind,
                    diagnostic.path.display(),
                    diagnostic.message
                ));
            }
            text
        }
    };

    write_output(&rendered, settings.output_file.as_deref())
}

fn execute_analyze(settings: Settings, operation: RefactorOperation) -> Result<()> {
    let orchestrator = Orchestrator::new(settings.clone());
    let reporter = Arc::new(ProgressReporter::new(
        settings.show_progress && !settings.quiet,
    ));

    let start_time = std::time::Instant::now();
    let reporter_for_updates = Arc::clone(&reporter);
    let (graph, diagnostics) = orchestrator
        .build_graph_with_progress(Some(move |update| reporter_for_updates.update(&update)))?;
    reporter.finish();

    let mut report = orchestrator.analyze_with_graph(&graph, diagnostics, &operation)?;
    report.set_duration(start_time.elapsed());

    if let Some(dot_path) = &settings.graph_output {
        // A failed DOT export should not discard the analysis output
        match write_output(&GraphExport::from_graph(&graph).to_dot(), Some(dot_path)) {
            Ok(()) if !settings.quiet => {
                eprintln!("Wrote DOT graph to {}", dot_path.display());
            }
            Ok(()) => {}
            Err(err) => {
                if let Some(critical) = handle_error(err) {
                    return Err(critical);
                }
            }
        }
    }

    let rendered = match settings.output_format {
        OutputFormat::Text => {
            format_report_text(&report, settings.use_colors, settings.verbose)
        }
        OutputFormat::Json => format_report_json(&report)?,
        // CSV renders the edge list; the report itself is not tabular
        OutputFormat::Csv => GraphExport::from_graph(&graph).to_csv()?,
    };

    write_output(&rendered, settings.output_file.as_deref())
}
