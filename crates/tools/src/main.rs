use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use layers::{StyleOptions, draw_fill_layer, draw_styles, hot_and_cold};
use session::SessionOptions;
use tools::{Script, run_replay};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "replay" => cmd_replay(args),
        "styles" => cmd_styles(args),
        _ => Err(usage()),
    }
}

fn cmd_replay(args: Vec<String>) -> Result<(), String> {
    // drawctl replay <script.json> [--config options.json]
    let mut script_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let value = args.get(i).ok_or("--config requires a value")?;
                config_path = Some(PathBuf::from(value));
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            s if script_path.is_none() => script_path = Some(PathBuf::from(s)),
            s => return Err(format!("unexpected arg: {s}\n\n{}", usage())),
        }
        i += 1;
    }

    let script_path = script_path.ok_or_else(usage)?;
    let payload = fs::read_to_string(&script_path).map_err(|e| format!("read {script_path:?}: {e}"))?;
    let script = Script::from_json_str(&payload).map_err(|e| format!("parse {script_path:?}: {e}"))?;
    let options = match &config_path {
        Some(path) => SessionOptions::load(path).map_err(|e| e.to_string())?,
        None => SessionOptions::default(),
    };
    info!(steps = script.steps.len(), config = ?config_path, "replaying");

    let outcome = run_replay(&script, &options).map_err(|e| format!("session: {e}"))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for call in &outcome.calls {
        writeln!(out, "{call}").map_err(|e| format!("write: {e}"))?;
    }
    for error in &outcome.errors {
        eprintln!("sync fault: {error}");
    }
    eprintln!("final state: {}", outcome.state);
    Ok(())
}

fn cmd_styles(args: Vec<String>) -> Result<(), String> {
    // drawctl styles [--hide-idle-lines]
    let mut options = StyleOptions::default();
    for arg in &args {
        match arg.as_str() {
            "--hide-idle-lines" => options.hide_idle_lines = true,
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
    }

    let mut layers: Vec<serde_json::Value> = hot_and_cold(&draw_styles(options))
        .iter()
        .map(|l| l.to_json())
        .collect();
    layers.push(draw_fill_layer().to_json());
    let payload = serde_json::to_string_pretty(&layers).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "drawctl".to_string());
    format!(
        "Usage:\n  {exe} replay <script.json> [--config options.json]\n  {exe} styles [--hide-idle-lines]\n\nNotes:\n- Script steps: set_mode, pointer_down, pointer_move, pointer_up, click, key_down, key_up, key, tick, sync.\n- Pointer positions are screen pixels; the script's `projection` maps them to lon/lat.\n- Host callbacks are printed to stdout as JSON lines; logs go to stderr (RUST_LOG).\n"
    )
}
