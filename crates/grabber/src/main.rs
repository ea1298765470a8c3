mod cli;
mod formatter;
mod native_host;

use clap::{Parser, Subcommand};
use cli::{PickerRepl, ReplOptions};
use grabber_core::config::{ConfigLoader, GrabberConfig};
use grabber_core::layout::load_layout;
use grabber_core::protocol::PickResult;
use grabber_core::{HitTest, HtmlDocument, LayoutSnapshot, pick};
use native_host::NativeHost;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grabber", version, about = "CSS selector grabber")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Config file (defaults to ./grabber.yaml, then ~/.grabber/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Mode {
    /// Print the selector for an element chosen by CSS
    Resolve {
        /// HTML file to load
        file: PathBuf,
        /// CSS selector locating the target element
        target: String,
        /// Which match of the target to use
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Hit-test a point against a layout, then print the selector
    Pick {
        /// HTML file to load
        file: PathBuf,
        /// Layout file (YAML or JSON list of selector/rect entries)
        #[arg(long)]
        layout: PathBuf,
        #[arg(long)]
        x: f32,
        #[arg(long)]
        y: f32,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive picking session over a page
    Repl {
        /// HTML file to load
        file: PathBuf,
        /// Layout file used for move/click hit tests
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Chrome native-messaging host on stdin/stdout
    Host,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };

    // Logs go to stderr; stdout carries results and native-messaging frames.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.mode {
        Mode::Resolve {
            file,
            target,
            index,
            json,
        } => {
            let doc = load_document(&file).await?;
            let node = doc.select_nth(&target, index)?;
            print_result(&pick(&doc, node), json, &config)?;
        }
        Mode::Pick {
            file,
            layout,
            x,
            y,
            json,
        } => {
            let doc = load_document(&file).await?;
            let layout = doc.layout(&load_layout(&layout).await?);
            let exclude = doc.overlay_nodes(&config.picker.overlay_ids);
            match layout.element_at(&doc, x, y, &exclude) {
                Some(node) => print_result(&pick(&doc, node), json, &config)?,
                None => eprintln!("No element at ({}, {})", x, y),
            }
        }
        Mode::Repl { file, layout } => {
            let doc = load_document(&file).await?;
            let layout = match layout {
                Some(path) => doc.layout(&load_layout(&path).await?),
                None => LayoutSnapshot::new(),
            };
            let mut repl = PickerRepl::new(
                doc,
                layout,
                config.picker.overlay_ids.clone(),
                config.presentation.attribute_preview_len,
            );
            let options = ReplOptions {
                banner_lines: &[
                    "Page loaded. Enter 'toggle' to start picking.",
                    "Commands: move X Y, click X Y, key NAME, esc, resolve CSS [@N]",
                    "Type 'exit' or 'quit' to close.",
                ],
                prompt: "> ",
                exit_commands: &["exit", "quit"],
            };
            if let Err(e) = cli::run_repl(&mut repl, options).await {
                eprintln!("Error during session: {}", e);
                return Err(e);
            }
        }
        Mode::Host => {
            let host = NativeHost::new(config.picker.overlay_ids.clone());
            let mut stdin = tokio::io::stdin();
            let mut stdout = tokio::io::stdout();
            host.run(&mut stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

async fn load_document(path: &Path) -> Result<HtmlDocument, Box<dyn Error>> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(HtmlDocument::parse(&source))
}

fn print_result(result: &PickResult, json: bool, config: &GrabberConfig) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!(
            "{}",
            formatter::format_pick_result(result, config.presentation.attribute_preview_len)
        );
    }
    Ok(())
}
