mod config;
mod panes;
mod ui;

use std::fs::File;
use std::time::Duration;

use config::Config;
use panes::{ChordKeyboardPane, PaneAction};
use ui::{keybindings, AppEvent, InputSource, RatatuiBackend, RenderBuf};

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("keychord")
        .join("keychord.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path).unwrap_or_else(|_| {
        File::create("/tmp/keychord.log").expect("Cannot create log file")
    });

    WriteLogger::init(log_level, simplelog::Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("keychord starting (log level: {:?})", log_level);
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let config = Config::load();
    let keymap = keybindings::load_keybindings();
    let mut pane = ChordKeyboardPane::new(&config, keymap);
    log::debug!(
        "loaded {} keybindings, base octave {}",
        pane.keymap().bindings().len(),
        config.base_octave()
    );

    let mut backend = RatatuiBackend::new()?;
    backend.start()?;

    let result = run(&mut backend, &mut pane);

    backend.stop()?;
    result
}

fn run(backend: &mut RatatuiBackend, pane: &mut ChordKeyboardPane) -> std::io::Result<()> {
    loop {
        let mut frame = backend.begin_frame()?;
        let area = frame.area();
        {
            let mut buf = RenderBuf::new(frame.buffer_mut());
            pane.render(area, &mut buf);
        }
        backend.end_frame(frame)?;

        let outcome = match backend.poll_event(Duration::from_millis(50)) {
            Some(AppEvent::Key(event)) => pane.handle_key(&event),
            Some(AppEvent::Mouse(event)) => pane.handle_mouse(&event, area),
            Some(AppEvent::Resize(w, h)) => {
                log::debug!("resized to {}x{}", w, h);
                PaneAction::None
            }
            None => PaneAction::None,
        };

        if outcome == PaneAction::Quit {
            log::info!("keychord exiting");
            return Ok(());
        }
    }
}
