use clap::{Parser, Subcommand};
use leed_sim::catalog::{Catalog, Scheme};
use leed_sim::config::Config;
use leed_sim::export::ExportFormat;
use leed_sim::scoring::{compute_totals, parse_points, ScoringState};
use leed_sim::tui::Theme;
use leed_sim::verbose;
use std::path::PathBuf;
use std::time::Instant;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_EXPORT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive checklist (default if no subcommand)
    Tui {
        /// Scheme to start with (e.g. v4, v4.1, v5)
        #[arg(long)]
        scheme: Option<String>,

        /// Project name shown in the title and used for exports
        #[arg(long)]
        project: Option<String>,

        /// Color theme
        #[arg(long, value_enum, default_value_t = Theme::Auto)]
        theme: Theme,
    },
    /// List available schemes with their point totals and thresholds
    Schemes,
    /// Print a scored checklist
    Show {
        #[arg(long)]
        scheme: Option<String>,

        /// Earned points for a credit, as CREDIT_ID=POINTS (repeatable)
        #[arg(long = "set", value_name = "ID=N", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write a scored checklist to a CSV or XLSX file
    Export {
        #[arg(long)]
        scheme: Option<String>,

        /// Earned points for a credit, as CREDIT_ID=POINTS (repeatable)
        #[arg(long = "set", value_name = "ID=N", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        #[arg(long)]
        project: Option<String>,

        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Output directory (defaults to export_dir from config, then ".")
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "leed-sim")]
#[command(about = "LEED certification checklist simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/leed-sim/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Load the scheme catalog from a YAML file instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Split `ID=N` into its two halves
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((id, value)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected CREDIT_ID=POINTS, got '{}'", s)),
    }
}

fn exit_config_error(msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", msg);
    std::process::exit(EXIT_CONFIG);
}

/// Resolve the scheme from a flag, then the config, then the catalog default
fn resolve_scheme<'a>(catalog: &'a Catalog, flag: Option<&str>, config: &Config) -> &'a Scheme {
    let key = flag
        .or(config.default_scheme.as_deref())
        .unwrap_or_else(|| catalog.default_key());
    match catalog.scheme(key) {
        Ok(scheme) => scheme,
        Err(e) => exit_config_error(format!("Error: {}", e)),
    }
}

/// Build a state from `--set` assignments; bad ids or values are fatal
fn apply_assignments(scheme: &Scheme, assignments: &[(String, String)]) -> ScoringState {
    let mut state = ScoringState::new(scheme);
    for (id, raw) in assignments {
        let result = parse_points(raw)
            .and_then(|_| state.set_by_credit_id(scheme, id, raw));
        match result {
            Ok(next) => {
                verbose!("Set {} = {} (requested {})", id, next.earned(id), raw);
                state = next;
            }
            Err(e) => exit_config_error(format!("Error: {}", e)),
        }
    }
    state
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    leed_sim::stderr_buffer::set_verbose(cli.verbose);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match leed_sim::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_config_error(format!("Config error: {:#}", e)),
    };

    // Load catalog
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    };
    let catalog = match catalog {
        Ok(c) => c,
        Err(e) => exit_config_error(format!("Catalog error: {:#}", e)),
    };

    verbose!(
        "Loaded {} schemes: {}",
        catalog.schemes().len(),
        catalog.keys().join(", ")
    );

    // Validate config against the catalog at startup
    if let Err(errors) = leed_sim::config::validate_config(&config, &catalog) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let command = cli.command.unwrap_or(Commands::Tui {
        scheme: None,
        project: None,
        theme: Theme::Auto,
    });

    match command {
        Commands::Tui {
            scheme,
            project,
            theme,
        } => {
            let key = resolve_scheme(&catalog, scheme.as_deref(), &config).key.clone();
            let project_name = project
                .or_else(|| config.project_name.clone())
                .unwrap_or_default();

            // Detect theme before the terminal enters raw mode
            let colors = leed_sim::tui::resolve_theme(theme);

            let app = match leed_sim::tui::App::new(
                catalog,
                &key,
                project_name,
                config.export_dir(),
                config.export_format(),
                colors,
            ) {
                Ok(app) => app,
                Err(e) => exit_config_error(format!("Error: {}", e)),
            };

            if let Err(e) = leed_sim::tui::run_tui(app).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        Commands::Schemes => {
            let use_colors = leed_sim::output::should_use_colors();
            println!(
                "{}",
                leed_sim::output::format_scheme_list(&catalog, use_colors)
            );
        }
        Commands::Show { scheme, set, json } => {
            let scheme = resolve_scheme(&catalog, scheme.as_deref(), &config);
            let state = apply_assignments(scheme, &set);

            if json {
                let report = leed_sim::output::build_report(scheme, &state);
                match serde_json::to_string_pretty(&report) {
                    Ok(out) => println!("{}", out),
                    Err(e) => exit_config_error(format!("Error: {}", e)),
                }
            } else {
                let use_colors = leed_sim::output::should_use_colors();
                println!(
                    "{}",
                    leed_sim::output::format_checklist(scheme, &state, use_colors)
                );
                println!(
                    "{}",
                    leed_sim::output::format_totals(&compute_totals(scheme, &state), use_colors)
                );
            }
        }
        Commands::Export {
            scheme,
            set,
            project,
            format,
            out,
        } => {
            let scheme = resolve_scheme(&catalog, scheme.as_deref(), &config);
            let state = apply_assignments(scheme, &set);
            let project_name = project
                .or_else(|| config.project_name.clone())
                .unwrap_or_default();
            let format = format.unwrap_or_else(|| config.export_format());
            let dir = out.unwrap_or_else(|| config.export_dir());

            match leed_sim::export::export_checklist(
                &project_name,
                scheme,
                &state,
                &dir,
                format,
                chrono::Local::now(),
            ) {
                Ok(path) => println!("{}", path.display()),
                Err(e) => {
                    eprintln!("Export failed: {:#}", e);
                    std::process::exit(EXIT_EXPORT);
                }
            }
        }
    }

    verbose!("Done in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}
