use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use pixtrail::app::Workbench;
use pixtrail::kernel::services::adapters::{
    ensure_settings_file, load_settings, AppMessage, AsyncRuntime, LocalDirectoryLister,
};
use pixtrail::kernel::services::ports::Collaborators;

mod logging;

const PROMPT: &str = "> ";

fn main() -> io::Result<()> {
    if let Err(e) = ensure_settings_file() {
        eprintln!("settings unavailable, using defaults: {e}");
    }
    let settings = load_settings();
    let log_guard = logging::init(&settings);
    if let Some(guard) = &log_guard {
        eprintln!("logs: {}", guard.log_dir().display());
    }

    let (tx, rx) = mpsc::channel();
    let collaborators = Collaborators::local()
        .with_lister(Arc::new(LocalDirectoryLister::new(settings.listing_depth)));
    let runtime = AsyncRuntime::new(tx.clone(), collaborators)?;
    let mut workbench = Workbench::new(settings, runtime);

    let mut stdout = io::stdout();
    if let Some(folder) = std::env::args_os().nth(1) {
        print_lines(&mut stdout, &workbench.open_folder(PathBuf::from(folder)).lines)?;
    }
    spawn_input_thread(tx);

    write!(stdout, "{PROMPT}")?;
    stdout.flush()?;
    while let Ok(msg) = rx.recv() {
        let from_user = matches!(msg, AppMessage::Input(_));
        let reply = workbench.handle_message(msg);
        print_lines(&mut stdout, &reply.lines)?;
        if reply.quit {
            break;
        }
        if from_user || !reply.lines.is_empty() {
            write!(stdout, "{PROMPT}")?;
            stdout.flush()?;
        }
    }

    tracing::info!("exiting");
    Ok(())
}

/// Posts stdin lines into the same channel the runtime reports to, so user
/// input and collaborator results are handled in arrival order.
fn spawn_input_thread(tx: Sender<AppMessage>) {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(AppMessage::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppMessage::InputClosed);
    });
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
