use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mushaf::LayoutBackend;
use mushaf::core::Library;
use mushaf::core::config::{self, CliOverrides, ResolvedConfig};
use mushaf::web::render::{RenderSettings, Selection, render_page};
use mushaf::web::{self, WebConfig};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[derive(Parser)]
#[command(name = "mushaf", about = "Quran viewer with page layout, translation and recitation")]
struct Args {
    /// Config file (defaults to ~/.mushaf/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the data paths are resolved against
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// How page/line lookups are answered
    #[arg(long, value_enum)]
    layout_backend: Option<LayoutBackend>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the viewer over HTTP (default)
    Serve {
        /// Listen address, e.g. 127.0.0.1:8080
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Print the viewer page for one selector to stdout
    Render {
        /// Chapter number; omit for the chapter list
        #[arg(short, long)]
        surah: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let command = args.command.unwrap_or(Command::Serve { addr: None });
    let cli = CliOverrides {
        addr: match &command {
            Command::Serve { addr } => addr.clone(),
            Command::Render { .. } => None,
        },
        data_dir: args.data_dir,
        layout_backend: args.layout_backend,
    };

    let loaded = match config::load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("mushaf: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(&loaded.config, &cli, config::process_env);
    init_logging(&resolved);

    for notice in loaded.notices.iter().chain(&resolved.notices) {
        notice.log();
    }
    log::debug!("Config: {:?}", loaded.config);

    log::info!(
        "Mushaf starting up with {:?} layout backend, data from {}",
        resolved.layout_backend,
        resolved.sources.words.display()
    );

    let library = match Library::open(&resolved) {
        Ok(library) => library,
        Err(e) => {
            log::error!("Startup failed: {e}");
            eprintln!("mushaf: {e}");
            return ExitCode::FAILURE;
        }
    };

    let render = RenderSettings {
        page_image_ext: resolved.page_image_ext.clone(),
        ..RenderSettings::default()
    };

    match command {
        Command::Render { surah } => {
            let selection = Selection::parse(surah.as_deref());
            print!("{}", render_page(&library, selection, &render));
            ExitCode::SUCCESS
        }
        Command::Serve { .. } => {
            let web_config = WebConfig {
                addr: resolved.addr.clone(),
                pages_dir: resolved.pages_dir.clone(),
                render,
            };
            match web::serve(library, web_config).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    log::error!("Server failed: {e}");
                    eprintln!("mushaf: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Logs to stderr, and additionally to `logging.file` when configured.
fn init_logging(resolved: &ResolvedConfig) {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        resolved.log_level,
        log_config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));
    if let Some(path) = &resolved.log_file {
        match File::create(path) {
            Ok(log_file) => loggers.push(WriteLogger::new(resolved.log_level, log_config, log_file)),
            Err(e) => eprintln!("mushaf: cannot open log file {}: {e}", path.display()),
        }
    }
    let _ = CombinedLogger::init(loggers);
}
