//! EVE Landing Demo
//!
//! Drives the playback controller from the terminal:
//! - Real timers (1s curtain, 6s reading, 8s hero rotation)
//! - Simulated video elements with load and play latency
//! - Persona preference persisted between runs
//!
//! Usage: landing-demo [config.json] [playlist.json]

mod console;
mod playlist;
mod scheduler;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use eve_core::Channel;
use eve_playlist::{load_or_empty, JsonFileProvider, PlaylistProvider, StaticProvider};
use eve_runtime::{
    init_logging, Controller, JsonFilePreferenceStore, MediaCallback, MediaEvent, MediaProfile, RuntimeConfig,
};
use eve_time::{TimerToken, WallClock};

use console::{ConsoleMedia, ConsoleSurface};
use playlist::demo_playlists;
use scheduler::TokioScheduler;

/// Everything the page reacts to, in arrival order
#[derive(Debug)]
pub enum PageEvent {
    Timer(TimerToken),
    Media(Channel, MediaEvent),
    Command(String),
    InputClosed,
}

type DemoController = Controller<ConsoleSurface, ConsoleMedia, TokioScheduler>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RuntimeConfig::from_json_file(path)?,
        None => RuntimeConfig::default(),
    };
    init_logging(&config.logging)?;

    let provider: Box<dyn PlaylistProvider> = match args.next() {
        Some(path) => Box::new(JsonFileProvider::new(path)),
        None if config.playlist_path.exists() => Box::new(JsonFileProvider::new(&config.playlist_path)),
        None => Box::new(StaticProvider::new(demo_playlists())),
    };
    let playlists = load_or_empty(provider.as_ref());

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║           EVE Landing - Cinematic Sequencer Demo           ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let store = Arc::new(JsonFilePreferenceStore::new(std::env::temp_dir().join("eve-landing-prefs.json")));
    let mut controller: DemoController = Controller::new(
        config,
        playlists,
        store,
        ConsoleSurface::default(),
        ConsoleMedia::new(MediaProfile::default(), tx.clone()),
        TokioScheduler::new(WallClock::new(), tx.clone()),
    );
    controller.media_mut().flush();

    print_help();
    spawn_input(tx);

    let mut status = tokio::time::interval(Duration::from_secs(10));
    status.tick().await;

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if !handle(&mut controller, event) {
                    break;
                }
            }
            _ = status.tick() => print_status(&controller),
        }
        controller.media_mut().flush();
    }

    println!("Goodbye!");
    Ok(())
}

/// Apply one event. Returns false when the visitor leaves.
fn handle(controller: &mut DemoController, event: PageEvent) -> bool {
    match event {
        PageEvent::Timer(token) => {
            controller.scheduler_mut().fired(token);
            controller.on_timer(token);
        }
        PageEvent::Media(channel, event) => match controller.media_mut().settle(channel, event) {
            Some(MediaCallback::CanPlay) => controller.on_can_play(channel),
            Some(MediaCallback::PlayStarted) => controller.on_play_started(channel),
            Some(MediaCallback::PlayRejected(reason)) => controller.on_play_rejected(channel, &reason),
            Some(MediaCallback::Ended) => controller.on_ended(channel),
            None => {}
        },
        PageEvent::Command(line) => return command(controller, &line),
        PageEvent::InputClosed => return false,
    }
    true
}

fn command(controller: &mut DemoController, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("");

    match cmd {
        "" => {}
        "start" | "s" => controller.start_experience(),
        "toggle" | "p" => controller.toggle_play_pause(),
        "jump" | "j" => match arg.parse::<usize>() {
            Ok(index) => controller.jump_to(index),
            Err(_) => println!("usage: jump <index>"),
        },
        "hero" | "video" => match Channel::from_persona_key(arg) {
            Ok(channel) if cmd == "hero" => controller.select_persona_from_hero(channel),
            Ok(channel) => controller.select_persona_from_video(channel),
            Err(e) => println!("{e}"),
        },
        "show" => controller.on_section_visible(),
        "hide" => controller.on_section_hidden(),
        "status" => print_status(controller),
        "help" | "?" => print_help(),
        "quit" | "q" | "exit" => return false,
        other => println!("unknown command: {other}"),
    }
    true
}

fn spawn_input(tx: mpsc::UnboundedSender<PageEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        prompt();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(PageEvent::Command(line.trim().to_string())).is_err() {
                return;
            }
            prompt();
        }
        let _ = tx.send(PageEvent::InputClosed);
    });
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn print_help() {
    println!("Commands:");
    println!("  start           allow sound and begin the sequence");
    println!("  toggle | p      play/pause");
    println!("  jump <n>        nav dot click");
    println!("  hero <eva|eve>  pick a persona in the hero section");
    println!("  video <eva|eve> pick a persona next to the video");
    println!("  show | hide     scroll the video section in or out of view");
    println!("  status          print the sequencer state");
    println!("  quit");
    println!();
}

fn print_status(controller: &DemoController) {
    let state = controller.state();
    let stats = controller.stats();
    println!(
        "\n[{}] phase={:?} active={} cursor={} manual_pause={} playing={:?} timers={} transitions={}",
        controller.persona().hero.persona_key(),
        controller.phase(),
        state.active,
        state.active_cursor(),
        state.manual_pause,
        controller.media().playing(),
        controller.scheduler().armed(),
        stats.transitions,
    );
    prompt();
}
