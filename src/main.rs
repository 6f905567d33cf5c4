/*
Control remoto por gestos corporales

Recibe esqueletos (JSON por líneas) desde el puente del sensor de profundidad,
reconoce la pose de inicio y los pasos laterales, y los convierte en
pulsaciones de teclado a través de /dev/uinput.

Ejemplo:
    sensor-bridge | ./target/release/kinemando --config kinemando.toml

Sin permisos sobre /dev/uinput:
    ./target/release/kinemando --dry-run < sesion.jsonl
*/

use anyhow::{bail, Context, Result};
use log::{debug, error, info};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use kinemando::config::{Config, EngineConfig};
use kinemando::dispatch::{ActionDispatcher, Dispatch};
use kinemando::frame_source::{FrameMessage, FrameReader};
use kinemando::gesture::Gesture;
use kinemando::hid::HidOutput;

struct Options {
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    write_config: Option<PathBuf>,
    dry_run: bool,
}

const USAGE: &str =
    "Uso: kinemando [--config archivo.toml] [--input sesion.jsonl] [--dry-run] [--write-config salida.toml]";

fn parse_args() -> Result<Options> {
    let mut opts = Options {
        config_path: None,
        input: None,
        write_config: None,
        dry_run: false,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dry-run" => opts.dry_run = true,
            "--config" => match args.next() {
                Some(path) => opts.config_path = Some(PathBuf::from(path)),
                None => bail!(USAGE),
            },
            "--input" => match args.next() {
                Some(path) => opts.input = Some(PathBuf::from(path)),
                None => bail!(USAGE),
            },
            "--write-config" => match args.next() {
                Some(path) => opts.write_config = Some(PathBuf::from(path)),
                None => bail!(USAGE),
            },
            _ => bail!(USAGE),
        }
    }

    Ok(opts)
}

/// Construye un motor nuevo: se usa al arrancar y en cada reinicio
fn build_engine(config: &EngineConfig) -> Result<Gesture> {
    let mut gesture = Gesture::new(config).context("Configuración del motor inválida")?;
    gesture.set_callback(|| debug!("Empezar reconocimiento"));
    Ok(gesture)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args()?;
    println!("🎯 Control remoto por gestos\n");

    let config = match &opts.config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => Config::default(),
    };
    info!(
        "Umbral hombro={}m, paso={}m, ventana={} frames, repetición={}",
        config.engine.shoulder_threshold,
        config.engine.step_threshold,
        config.engine.window_size,
        config.keys.repeat
    );

    // Volcar la configuración efectiva y salir
    if let Some(path) = &opts.write_config {
        config
            .save(path)
            .with_context(|| format!("No se pudo escribir la configuración {:?}", path))?;
        println!("💾 Configuración escrita en {:?}", path);
        return Ok(());
    }

    let mut gesture = build_engine(&config.engine)?;

    // Canal y hilo HID: cola acotada, lo que no cabe se descarta
    let (mut dispatcher, rx_action) = ActionDispatcher::channel();
    let keys = config.keys.clone();
    let dry_run = opts.dry_run;

    let hid_thread = std::thread::spawn(move || {
        let mut hid = if dry_run {
            None
        } else {
            match HidOutput::new(&keys) {
                Ok(h) => {
                    println!("✅ HID inicializado (/dev/uinput)");
                    Some(h)
                }
                Err(e) => {
                    error!("No se pudo inicializar HID: {}", e);
                    return;
                }
            }
        };

        while let Ok(action) = rx_action.recv() {
            match hid.as_mut() {
                Some(hid) => {
                    if let Err(e) = hid.send(action) {
                        error!("Error enviando acción HID {:?}: {}", action, e);
                    }
                }
                None => println!("🎮 [dry-run] {:?}", action),
            }
        }
    });

    let input: Box<dyn BufRead> = match &opts.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("No se pudo abrir {:?}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    println!("🎬 Esperando esqueletos...\n");

    for msg in FrameReader::new(input) {
        match msg.context("Error leyendo frames")? {
            FrameMessage::Skeleton(skeleton) => {
                match dispatcher.dispatch(gesture.update(&skeleton)) {
                    Dispatch::Sent(action) => println!("[GESTO] {}", action.label()),
                    Dispatch::Idle | Dispatch::Dropped(_) => {}
                    Dispatch::Disconnected(_) => bail!("El hilo HID terminó"),
                }
            }
            FrameMessage::Untracked => {}
            FrameMessage::Reset => {
                gesture = build_engine(&config.engine)?;
                println!("🔄 Valores iniciales restablecidos");
            }
        }
    }

    drop(dispatcher);
    if hid_thread.join().is_err() {
        bail!("El hilo HID terminó con pánico");
    }

    println!("\n👋 Fin de la entrada");
    Ok(())
}
