//! Main application entry point.
//!
//! Usage: `snapcanvas [--config FILE] [SCRIPT]`. The script is read from
//! stdin when no path is given.

use anyhow::{Context, bail};
use snapcanvas_app::{AppConfig, Script, Session};
use std::io::Read;
use std::path::PathBuf;

struct Args {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: None,
        script: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a file path")?;
                args.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
            path => {
                if args.script.is_some() {
                    bail!("only one script may be given");
                }
                args.script = Some(PathBuf::from(path));
            }
        }
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting SnapCanvas");

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let json = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading script from stdin")?;
            text
        }
    };
    let script = Script::from_json(&json).context("parsing script")?;

    let storage = config.open_storage()?;
    let mut session = Session::new(&config, storage);
    let snapshot = session.run(&script);

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
