use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use kinemando::config::Config;
use kinemando::csv_loader::load_frames_from_csv;
use kinemando::gesture::Gesture;
use kinemando::hid::GestureAction;

struct ReplayOptions {
    config_path: Option<PathBuf>,
    quiet: bool,
}

const USAGE: &str = "Uso: replay_csv [--config archivo.toml] [--quiet] <grabacion.csv>";

fn parse_args() -> Result<(PathBuf, ReplayOptions)> {
    let mut config_path: Option<PathBuf> = None;
    let mut quiet = false;
    let mut csv_path: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--quiet" => quiet = true,
            "--config" => {
                config_path = Some(PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?));
            }
            _ => {
                if csv_path.is_some() {
                    bail!(USAGE);
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
    }

    let csv_path = csv_path.ok_or_else(|| anyhow!("Debes especificar un archivo CSV"))?;
    Ok((csv_path, ReplayOptions { config_path, quiet }))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let (csv_path, opts) = parse_args()?;
    println!("🎞️  Reproduciendo sesión desde {:?}", csv_path);

    let config = match &opts.config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => Config::default(),
    };

    let frames = load_frames_from_csv(&csv_path)?;
    let mut gesture = Gesture::new(&config.engine)?;

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut windows_closed = 0usize;

    for (idx, skeleton) in frames.iter().enumerate() {
        let report = gesture.process(skeleton);
        if report.window_closed {
            windows_closed += 1;
        }
        if report.result.is_none() {
            continue;
        }

        *counts.entry(report.result.as_str()).or_insert(0) += 1;
        if !opts.quiet {
            let action = GestureAction::from_result(report.result)
                .map(|a| a.label())
                .unwrap_or("-");
            println!("  {:>5}: {:<16} {}", idx, report.result.as_str(), action);
        }
    }

    println!("\n📊 {} frames, {} ventanas cerradas", frames.len(), windows_closed);
    for (name, count) in &counts {
        println!("  {:<16} {:>5}", name, count);
    }

    let refs = gesture.shoulder_refs();
    println!(
        "\nReferencias finales: inicial=({:.3}, {:.3}) último=({:.3}, {:.3})",
        refs.initial.x, refs.initial.y, refs.last_triggered.x, refs.last_triggered.y
    );

    Ok(())
}
