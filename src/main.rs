mod bindings;
mod classify;
mod config;
mod dispatch;
mod execute;
mod filter;
mod indexer;
mod models;
mod resolve;
mod state;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::classify::Point;
use crate::config::LauncherConfig;
use crate::dispatch::{
    choose_app_for_gesture, handle_fling, handle_key, handle_tap, handle_touch_event, Dispatch,
    HardwareKey,
};
use crate::execute::{ExecutionError, HostDispatch};
use crate::indexer::{AppIndex, AppSource};
use crate::models::{
    Action, AppEntry, BaseGesture, Gesture, PickerIntention, SystemIntentKind,
};
use crate::state::LauncherState;

// Simulated display metrics for the REPL.
const SCREEN_WIDTH: f32 = 1080.0;
const SCREEN_HEIGHT: f32 = 2340.0;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    println!("ungrid v0.1.0 starting...");

    let state = match dirs::config_dir() {
        Some(_) => LauncherState::new(Box::new(bindings::JsonBindings::load())),
        None => LauncherState::in_memory(),
    };
    {
        let mut config = state.config.lock().unwrap();
        *config = LauncherConfig::load();
    }

    println!("Building application index...");
    let source: Arc<dyn AppSource> = Arc::new(DemoAppSource);
    state.app_index.rebuild(Arc::clone(&source)).await;
    info!("indexed {} applications", state.app_index.snapshot().len());

    println!("\nReady! {} apps indexed.", state.app_index.snapshot().len());
    println!("Type 'help' for commands.\n");

    run_repl(state, source).await?;

    Ok(())
}

/// Host surface for the simulation: launches succeed when the package is
/// in the index, the app market and lock screen intents fail the way a
/// locked-down device would, everything else is acknowledged with a
/// printout.
struct DemoHost {
    app_index: AppIndex,
}

impl HostDispatch for DemoHost {
    fn launch_app(&self, package: &str, user: Option<u32>) -> Result<(), ExecutionError> {
        let snapshot = self.app_index.snapshot();
        let installed = snapshot
            .iter()
            .any(|app| app.package == package && app.user == user);
        if installed {
            println!("[host] launching {package} (user {user:?})");
            Ok(())
        } else {
            Err(ExecutionError::AppNotFound { package: package.to_string() })
        }
    }

    fn open_picker(&self, intention: PickerIntention) -> Result<(), ExecutionError> {
        println!("[host] opening picker ({intention:?})");
        Ok(())
    }

    fn dispatch_system_intent(&self, kind: SystemIntentKind) -> Result<(), ExecutionError> {
        match kind {
            // No app store installed on the demo device.
            SystemIntentKind::AppMarket => Err(ExecutionError::NoHandler(kind)),
            // Locking requires a device-admin grant the demo host lacks.
            SystemIntentKind::LockScreen => {
                Err(ExecutionError::HostDispatch("device admin permission not granted".into()))
            }
            _ => {
                println!("[host] system intent: {kind}");
                Ok(())
            }
        }
    }
}

/// Stand-in for the OS package enumeration.
struct DemoAppSource;

impl AppSource for DemoAppSource {
    fn list_installed_apps(&self) -> Vec<AppEntry> {
        let apps = [
            ("Calculator", "com.example.calculator", None, true),
            ("Calendar", "com.example.calendar", None, true),
            ("Camera", "com.example.camera", None, true),
            ("Clock", "com.example.clock", None, true),
            ("K-9 Mail", "com.fsck.k9", None, false),
            ("Phone", "com.example.phone", None, true),
            ("Phone (work)", "com.example.phone", Some(10), true),
            ("Signal", "org.thoughtcrime.securesms", None, false),
        ];
        apps.into_iter()
            .map(|(label, package, user, system_app)| AppEntry {
                label: label.to_string(),
                package: package.to_string(),
                user,
                icon: None,
                system_app,
            })
            .collect()
    }
}

async fn run_repl(state: LauncherState, source: Arc<dyn AppSource>) -> Result<()> {
    let host = DemoHost { app_index: state.app_index.clone() };
    let mut current_results: Vec<AppEntry> = Vec::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let command = parts.next().unwrap_or("").to_lowercase();
        let args: Vec<&str> = parts.collect();

        match command.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye!");
                break;
            }
            "help" | "h" => print_help(),
            "swipe" => match parse_swipe(&args) {
                Some((start, end, fingers)) => {
                    handle_touch_event(&state, fingers);
                    match handle_fling(&state, &host, start, end, SCREEN_WIDTH, SCREEN_HEIGHT) {
                        Some(dispatch) => report(&dispatch),
                        None => println!("no gesture"),
                    }
                }
                None => println!("usage: swipe X1,Y1 X2,Y2 [fingers]"),
            },
            "tap" => report(&handle_tap(&state, &host, BaseGesture::TapSingle)),
            "doubletap" => report(&handle_tap(&state, &host, BaseGesture::DoubleTap)),
            "longpress" => report(&handle_tap(&state, &host, BaseGesture::LongPress)),
            "key" => match args.first().copied() {
                Some("back") => report(&handle_key(&state, &host, HardwareKey::Back)),
                Some("volup") => report(&handle_key(&state, &host, HardwareKey::VolumeUp)),
                Some("voldown") => report(&handle_key(&state, &host, HardwareKey::VolumeDown)),
                _ => println!("usage: key back|volup|voldown"),
            },
            "find" => {
                let query = args.join(" ");
                let snapshot = state.app_index.snapshot();
                current_results = filter::filter(&query, &snapshot);
                display_apps(&current_results);

                let auto_launch = state.config_snapshot().search_auto_launch;
                if auto_launch && current_results.len() == 1 {
                    let only = &current_results[0];
                    println!("auto-launching {}", only.label);
                    if let Err(err) = host.launch_app(&only.package, only.user) {
                        println!("error: {err}");
                    }
                }
            }
            "apps" => {
                current_results = state.app_index.snapshot().to_vec();
                display_apps(&current_results);
            }
            "pick" => match parse_pick(&args, &current_results) {
                Some((gesture, app)) => {
                    choose_app_for_gesture(&state, gesture, &app);
                    println!("bound {} -> {}", gesture, app.label);
                }
                None => println!("usage: pick <gesture-key> <result-number> (after find/apps)"),
            },
            "bind" => match parse_bind(&args) {
                Some((gesture, action)) => {
                    let mut store = state.bindings.lock().unwrap();
                    bindings::bind(store.as_mut(), gesture, &action);
                    println!("bound {} -> {}", gesture, action.encode());
                }
                None => println!("usage: bind <gesture-key> <action>  (e.g. bind swipe_up picker:view)"),
            },
            "bindings" => {
                let store = state.bindings.lock().unwrap();
                let entries = bindings::snapshot(store.as_ref());
                if entries.is_empty() {
                    println!("no bindings stored");
                }
                for (gesture, action) in entries {
                    println!("  {:<24} {}", gesture.key(), action.encode());
                }
            }
            "gestures" => {
                let store = state.bindings.lock().unwrap();
                for gesture in Gesture::all() {
                    let action = resolve::resolve(gesture, store.as_ref());
                    println!("  {:<24} {}", gesture.key(), describe_action(&action));
                }
            }
            "set" => match parse_set(&args) {
                Some((setting, enabled)) => {
                    let config = {
                        let mut config = state.config.lock().unwrap();
                        match setting {
                            "double" => config.double_actions_enabled = enabled,
                            "edge" => config.edge_actions_enabled = enabled,
                            "autolaunch" => config.search_auto_launch = enabled,
                            _ => {}
                        }
                        config.clone()
                    };
                    if let Err(err) = config.save() {
                        println!("warning: settings not persisted: {err}");
                    }
                    println!("{setting} = {enabled}");
                }
                None => println!("usage: set double|edge|autolaunch on|off"),
            },
            "reindex" => {
                state.app_index.rebuild(Arc::clone(&source)).await;
                println!("reindexed {} apps", state.app_index.snapshot().len());
            }
            _ => println!("unknown command: {command} (try 'help')"),
        }
    }

    Ok(())
}

fn parse_point(text: &str) -> Option<Point> {
    let (x, y) = text.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn parse_swipe(args: &[&str]) -> Option<(Point, Point, u32)> {
    let start = parse_point(args.first()?)?;
    let end = parse_point(args.get(1)?)?;
    let fingers = match args.get(2) {
        Some(value) => value.parse().ok()?,
        None => 1,
    };
    Some((start, end, fingers))
}

fn parse_bind(args: &[&str]) -> Option<(Gesture, Action)> {
    let gesture = Gesture::from_key(args.first()?)?;
    let action = Action::decode(args.get(1)?)?;
    Some((gesture, action))
}

fn parse_pick(args: &[&str], results: &[AppEntry]) -> Option<(Gesture, AppEntry)> {
    let gesture = Gesture::from_key(args.first()?)?;
    let index: usize = args.get(1)?.parse().ok()?;
    let app = results.get(index.checked_sub(1)?)?.clone();
    Some((gesture, app))
}

fn parse_set<'a>(args: &[&'a str]) -> Option<(&'a str, bool)> {
    let setting = match args.first().copied()? {
        s @ ("double" | "edge" | "autolaunch") => s,
        _ => return None,
    };
    let enabled = match args.get(1).copied()? {
        "on" | "true" => true,
        "off" | "false" => false,
        _ => return None,
    };
    Some((setting, enabled))
}

fn report(dispatch: &Dispatch) {
    let gesture = dispatch
        .gesture
        .map(|g| g.key())
        .unwrap_or_else(|| "(direct)".to_string());
    match &dispatch.result {
        Ok(()) => println!("{gesture}: {}", describe_action(&dispatch.action)),
        Err(err) => println!("{gesture}: error: {err}"),
    }
}

fn describe_action(action: &Action) -> String {
    match action {
        Action::Unbound => "unbound".to_string(),
        other => other.encode(),
    }
}

fn display_apps(apps: &[AppEntry]) {
    if apps.is_empty() {
        println!("no matches");
        return;
    }
    for (index, app) in apps.iter().enumerate() {
        let marker = if app.system_app { "(system)" } else { "" };
        println!("[{}] {} - {} {}", index + 1, app.label, app.package, marker);
    }
}

fn print_help() {
    println!();
    println!("ungrid commands:");
    println!("  swipe X1,Y1 X2,Y2 [fingers]  - simulate a pointer trace");
    println!("  tap | doubletap | longpress  - simulate a tap-detector gesture");
    println!("  key back|volup|voldown       - simulate a hardware key");
    println!("  find <query>                 - filter the app list");
    println!("  apps                         - show the full app list");
    println!("  pick <gesture> <number>      - bind a find/apps result to a gesture");
    println!("  bind <gesture> <action>      - bind an action string directly");
    println!("  bindings                     - show stored bindings");
    println!("  gestures                     - list every gesture and its action");
    println!("  set <setting> on|off         - toggle double|edge|autolaunch");
    println!("  reindex                      - rebuild the app index");
    println!("  quit                         - exit");
    println!();
    println!("Examples:");
    println!("  swipe 540,2000 540,1000      - swipe up");
    println!("  swipe 540,2000 540,1000 2    - double-finger swipe up");
    println!("  bind swipe_up picker:view");
    println!();
}
