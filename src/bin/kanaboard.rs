// Kanaboard CLI
// Inspect layouts, translate hardware keys and replay input scripts against the core

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::{debug, info};

use kanaboard_core::hardware::TableKey;
use kanaboard_core::key::{key_code_for_scan_code, parse_code};
use kanaboard_core::replay::Script;
use kanaboard_core::settings::{default_settings_content, Settings};
use kanaboard_core::{
    HardwareKeyboardSpecification, InputSession, KeyCode, KeyEntry, KeyboardReader, MetaState,
    Modifier, ModifierSet, RawKeyEvent, RecordingEngine, RecordingView, ScanCode,
};

/// Key-input core of a kana input method
#[derive(Parser, Debug)]
#[command(name = "kanaboard")]
#[command(author = "kanaboard contributors")]
#[command(version)]
#[command(about = "Touch gestures and hardware key translation for a kana IME", long_about = None)]
struct Args {
    /// TOML settings file (default: ~/.config/kanaboard/settings.toml)
    #[arg(short, long, value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Hardware layout to use, overriding the settings file
    #[arg(short, long, value_name = "LAYOUT")]
    layout: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate settings and exit
    #[arg(long)]
    check_settings: bool,

    /// Print a commented default settings file and exit
    #[arg(long)]
    print_default_settings: bool,

    /// Print the key table of the hardware layout
    #[arg(long)]
    dump_table: bool,

    /// Translate key chords such as `a`, `shift+2` or `grave`
    #[arg(short, long, value_name = "KEY", num_args = 1..)]
    translate: Vec<String>,

    /// Run a replay script and print what the session did
    #[arg(short, long, value_name = "SCRIPT")]
    replay: Option<PathBuf>,

    /// Read keys from an input device and print the engine requests
    #[arg(short, long, value_name = "DEVICE")]
    device: Option<PathBuf>,

    /// Grab the device so other clients stop seeing its keys
    #[arg(long)]
    grab: bool,

    /// List available keyboard devices
    #[arg(long)]
    list_devices: bool,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::load_default().context("Failed to load default settings")?,
    };
    if let Some(name) = &args.layout {
        settings.set_pinned_layout(Some(parse_layout(name)?));
    }
    Ok(settings)
}

fn parse_layout(name: &str) -> Result<HardwareKeyboardSpecification> {
    name.trim()
        .parse()
        .map_err(|_| anyhow!("Unknown hardware layout '{}'", name))
}

/// Parse `mod+mod+key`, where key is a scan code name or number
fn parse_chord(text: &str) -> Result<RawKeyEvent> {
    let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();
    let key = parts
        .pop()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| anyhow!("Empty key chord '{}'", text))?;
    let modifiers = parts
        .iter()
        .map(|name| Modifier::from_alias(name))
        .collect::<Result<ModifierSet, _>>()?;
    let scan_code: ScanCode =
        parse_code(key).ok_or_else(|| anyhow!("Unknown key '{}' in '{}'", key, text))?;
    Ok(RawKeyEvent::new(
        key_code_for_scan_code(scan_code),
        scan_code,
        MetaState::from(modifiers),
    ))
}

fn translate(spec: HardwareKeyboardSpecification, chords: &[String]) -> Result<()> {
    for chord in chords {
        let raw = parse_chord(chord)?;
        println!("{:<12} {}", chord, spec.translate_event(&raw));
    }
    Ok(())
}

fn dump_table(spec: HardwareKeyboardSpecification) {
    let table = spec.table();
    println!("{} ({} keys, keyed by {:?})", spec, table.len(), table.keyed_by());
    for (code, entry) in table.iter() {
        let name = match table.keyed_by() {
            TableKey::ScanCode => ScanCode(code).to_string(),
            TableKey::KeyCode => KeyCode(code).to_string(),
        };
        let described = match entry {
            KeyEntry::Printable { normal, shifted } => format!("'{}' / '{}'", normal, shifted),
            other => format!("{:?}", other),
        };
        println!("  {:<20} {}", name, described);
    }
}

fn replay(settings: &Settings, path: &Path) -> Result<()> {
    let script = Script::from_file(path)
        .with_context(|| format!("Failed to load script {}", path.display()))?;
    let engine = RecordingEngine::new();
    let view = RecordingView::new();
    let mut session = InputSession::from_settings(engine.clone(), view.clone(), settings);

    for (index, report) in script.run(&mut session).into_iter().enumerate() {
        println!("[{}] {}", index, report.step);
        for gesture in &report.gestures {
            println!("      gesture {:?}", gesture);
        }
        if let Some(outcome) = report.outcome {
            println!("      -> {}", outcome);
        }
        // Recording collaborators share their logs, so drain them per step
        for request in engine.take() {
            println!("      engine {}", request);
        }
        for notification in view.take() {
            println!("      view {}", notification);
        }
    }
    println!("final state: {}", session.state());
    Ok(())
}

fn list_devices() -> Result<()> {
    let keyboards = kanaboard_core::event::list_keyboards();
    if keyboards.is_empty() {
        bail!("No keyboard devices found");
    }
    println!("Found {} keyboard device(s):", keyboards.len());
    for (path, name) in keyboards {
        println!("  {} ({})", name, path.display());
    }
    Ok(())
}

fn read_device(settings: &Settings, path: &Path, grab: bool) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    spawn_signal_handler(running.clone());

    let mut reader = KeyboardReader::open(path, grab)?;
    let engine = RecordingEngine::new();
    let view = RecordingView::new();
    let mut session = InputSession::from_settings(engine.clone(), view.clone(), settings);
    session.configuration_changed(reader.configuration());
    info!("Reading {} as {}", reader.name(), reader.keyboard_class());
    println!("{}", session.state());
    println!("kanaboard is reading {}. Press Ctrl+C to exit.", reader.path().display());

    while running.load(Ordering::SeqCst) {
        for raw in reader.poll(100)? {
            let outcome = session.hardware_key(&raw);
            debug!("{} -> {}", raw, outcome);
            for request in engine.take() {
                println!("{}", request);
            }
            for notification in view.take() {
                println!("{}", notification);
            }
        }
    }

    reader.ungrab();
    Ok(())
}

fn spawn_signal_handler(running: Arc<AtomicBool>) {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    std::thread::spawn(move || {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM]) {
            if signals.forever().next().is_some() {
                println!("\nReceived signal, shutting down...");
                running.store(false, Ordering::SeqCst);
            }
        }
    });
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if args.verbose { "debug" } else { "warn" },
    ))
    .init();

    if args.print_default_settings {
        print!("{}", default_settings_content());
        return Ok(());
    }

    if args.list_devices {
        return list_devices();
    }

    let settings = load_settings(&args)?;
    if args.check_settings {
        println!("{}", settings);
        println!("Settings are valid");
        return Ok(());
    }

    let spec = settings
        .hardware_preference()
        .pinned
        .unwrap_or(HardwareKeyboardSpecification::Japanese109A);

    if args.dump_table {
        dump_table(spec);
    }
    if !args.translate.is_empty() {
        translate(spec, &args.translate)?;
    }
    if let Some(path) = &args.replay {
        replay(&settings, path)?;
    }

    if let Some(path) = &args.device {
        return read_device(&settings, path, args.grab);
    }

    Ok(())
}
