use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use sickscan_lib::config::{self, defaults};
use sickscan_lib::session::TriageSession;
use sickscan_lib::{api, cli, training};

#[derive(Debug, Parser)]
#[command(name = "sickscan", version, about = "Free-text symptom extraction and condition ranking")]
struct Cli {
    /// Directory holding symptoms.json, conditions.json and model.json.
    /// Falls back to $SICKSCAN_DATA_DIR, then ~/SickScan/data.
    #[arg(
        long = "data-dir",
        global = true,
        value_name = "DIR",
        value_hint = clap::ValueHint::DirPath
    )]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive prompt (default).
    Chat,
    /// Serve the HTTP API.
    Serve {
        #[arg(long, value_name = "ADDR", default_value = defaults::SERVE_ADDR)]
        addr: SocketAddr,
    },
    /// Fit the model from labelled rows and write the artifacts.
    Train {
        /// JSON array of {"condition", "symptoms": [ids]} rows.
        #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        rows: PathBuf,
        /// Output directory. Defaults to the data directory.
        #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    sickscan_lib::init_tracing();
    let args = Cli::parse();
    let data_dir = config::resolve_data_dir(args.data_dir);

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match args.command.unwrap_or(Command::Chat) {
        Command::Chat => chat(&data_dir),
        Command::Serve { addr } => serve(&data_dir, addr),
        Command::Train { rows, out } => train(&rows, out.as_deref().unwrap_or(&data_dir)),
    }
}

fn load_session(data_dir: &Path) -> Option<TriageSession> {
    match TriageSession::load(data_dir) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::error!(data_dir = %data_dir.display(), "Startup failed: {e}");
            eprintln!(
                "Cannot start: {e}\n\
                 Expected {}, {} and {} in {}.\n\
                 Pass --data-dir, set {}, or run `sickscan train` first.",
                config::SYMPTOMS_FILE,
                config::CONDITIONS_FILE,
                config::MODEL_FILE,
                data_dir.display(),
                config::DATA_DIR_ENV,
            );
            None
        }
    }
}

fn chat(data_dir: &Path) -> ExitCode {
    let Some(session) = load_session(data_dir) else {
        return ExitCode::FAILURE;
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match cli::run_chat(&session, stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Terminal I/O failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn serve(data_dir: &Path, addr: SocketAddr) -> ExitCode {
    let Some(session) = load_session(data_dir) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        let mut server = match api::start_api_server(Arc::new(session), addr).await {
            Ok(server) => server,
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            }
        };

        println!("Listening on http://{}", server.addr);

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
        }
        server.shutdown();
        server.stopped().await;
        ExitCode::SUCCESS
    })
}

fn train(rows: &Path, out_dir: &Path) -> ExitCode {
    match training::train_from_file(rows, out_dir) {
        Ok(summary) => {
            println!(
                "Trained on {} rows: {} conditions over {} symptoms. Artifacts in {}.",
                summary.rows,
                summary.conditions,
                summary.symptoms,
                out_dir.display()
            );
            if summary.wrote_symptoms {
                println!(
                    "Wrote default {} with one name per symptom id; add synonyms there.",
                    config::SYMPTOMS_FILE
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(rows = %rows.display(), "Training failed: {e}");
            ExitCode::FAILURE
        }
    }
}
