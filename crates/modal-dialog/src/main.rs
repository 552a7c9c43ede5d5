use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use modal_dialog::{
    dispatch_shortcut, logging, AdapterCatalog, Config, ConfirmOptions, DialogKeyHandler,
    DialogKind, DialogService, DialogState, FileStore, JobPoller, JsonAdapterSource, Persistence,
    PromptOptions, Selection, ShortcutAction,
};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::env;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const USAGE: &str = "\
usage: modal-dialog [--title <text>] [--require-value | --optional]

keys:
  ctrl+a  select all adapters     esc     clear selection / cancel dialog
  delete  delete selection        p       save selection as a preset
  r       refresh jobs now        q       quit";

const DEMO_CATALOG: &str = r#"[
    {"id": "pg", "name": "Postgres", "description": "SQL database", "active": true},
    {"id": "mysql", "name": "MySQL", "description": "SQL database", "active": true},
    {"id": "s3", "name": "S3 Bucket", "description": "Object storage", "active": false},
    {"id": "kafka", "name": "Kafka", "description": "Event stream", "active": true}
]"#;

const PRESET_KEY: &str = "preset";
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    title: Option<String>,
    require_value: bool,
    help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            title: None,
            require_value: true,
            help: false,
        }
    }
}

fn parse_cli_options_from_args(args: impl IntoIterator<Item = impl AsRef<str>>) -> CliOptions {
    let mut args = args
        .into_iter()
        .map(|arg| arg.as_ref().to_string())
        .peekable();
    let mut options = CliOptions::default();
    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--title=") {
            options.title = (!value.trim().is_empty()).then(|| value.to_string());
            continue;
        }
        match arg.as_str() {
            "--title" => {
                if let Some(next) = args.next_if(|next| !next.starts_with('-')) {
                    options.title = Some(next);
                }
            }
            "--require-value" => options.require_value = true,
            "--optional" => options.require_value = false,
            "-h" | "--help" => options.help = true,
            _ => {}
        }
    }
    options
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Preset {
    name: String,
    adapters: Vec<String>,
}

#[derive(Clone, Copy, Debug)]
struct KeyDebugLog {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl fmt::Display for KeyDebugLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code={:?} mods={:?}", self.code, self.modifiers)
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(error) = disable_raw_mode() {
            eprintln!("Failed to restore terminal: {error}");
        }
    }
}

fn emit(text: impl AsRef<str>) {
    let mut out = io::stdout().lock();
    for line in text.as_ref().lines() {
        let _ = write!(out, "{line}\r\n");
    }
    let _ = out.flush();
}

fn describe_dialog(state: &DialogState) -> Option<String> {
    if !state.is_open {
        return None;
    }
    let title = state
        .title
        .as_deref()
        .map(|title| format!("{title}: "))
        .unwrap_or_default();
    let mut text = format!(
        "[{}] {title}{}  (Enter={} Esc={})",
        state.kind, state.message, state.confirm_label, state.cancel_label
    );
    if state.kind == DialogKind::Prompt {
        let marker = if state.is_confirm_disabled() {
            " (required)"
        } else {
            ""
        };
        text.push_str(&format!("\n> {}{marker}", state.input_value));
    }
    Some(text)
}

struct App {
    dialogs: DialogService,
    keys: DialogKeyHandler,
    catalog: AdapterCatalog,
    selection: Rc<RefCell<Selection<String>>>,
    persistence: Rc<RefCell<Persistence>>,
    options: CliOptions,
}

impl App {
    fn selectable_ids(&self) -> Vec<String> {
        self.catalog
            .filtered_adapters()
            .into_iter()
            .map(|adapter| adapter.id.clone())
            .collect()
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::SelectAll | ShortcutAction::ClearSelection => {
                let ids = self.selectable_ids();
                let mut selection = self.selection.borrow_mut();
                selection.apply(action, &ids);
                emit(format!("selected: {}", selection.len()));
            }
            ShortcutAction::CloseModal => self.dialogs.cancel_dialog(),
            ShortcutAction::Delete => self.request_delete(),
        }
    }

    fn request_delete(&self) {
        let count = self.selection.borrow().len();
        let mut options = ConfirmOptions::new(format!("Delete {count} selected adapter(s)?"))
            .labels("Delete", "Keep");
        if let Some(title) = self.options.title.as_deref() {
            options = options.title(title);
        }
        let reply = self.dialogs.confirm(options);
        let selection = Rc::clone(&self.selection);
        tokio::task::spawn_local(async move {
            if reply.await {
                let mut selection = selection.borrow_mut();
                let ids: Vec<&str> = selection.ids().map(String::as_str).collect();
                emit(format!("deleted: {}", ids.join(", ")));
                selection.clear();
            } else {
                emit("delete cancelled");
            }
        });
    }

    fn request_preset(&self) {
        let last: Option<Preset> = self.persistence.borrow().get_json(PRESET_KEY, None);
        let mut options = PromptOptions::new("Name the preset")
            .require_value(self.options.require_value)
            .labels("Save", "Cancel");
        if let Some(preset) = last {
            options = options.initial_value(preset.name);
        }
        if let Some(title) = self.options.title.as_deref() {
            options = options.title(title);
        }
        let reply = self.dialogs.prompt(options);
        let selection = Rc::clone(&self.selection);
        let persistence = Rc::clone(&self.persistence);
        tokio::task::spawn_local(async move {
            let Some(name) = reply.await else {
                emit("preset not saved");
                return;
            };
            let preset = Preset {
                name,
                adapters: selection.borrow().ids().cloned().collect(),
            };
            match persistence.borrow_mut().set_json(PRESET_KEY, &preset) {
                Ok(()) => emit(format!("saved preset \"{}\"", preset.name)),
                Err(error) => emit(format!("preset \"{}\" not persisted: {error}", preset.name)),
            }
        });
    }

    /// Returns false when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        let ctx = self.selection.borrow().context(self.dialogs.is_open());
        match dispatch_shortcut(key.code, key.modifiers, ctx) {
            Some(ShortcutAction::CloseModal) => {
                self.apply_shortcut(ShortcutAction::CloseModal);
                return true;
            }
            Some(action) if !ctx.modal_open => {
                self.apply_shortcut(action);
                return true;
            }
            _ => {}
        }
        if self.keys.handle_key(key.code, key.modifiers).is_some() {
            return true;
        }
        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('p') => self.request_preset(),
            _ => {}
        }
        true
    }
}

fn open_persistence(config: &Config) -> Persistence {
    let Some(dir) = config.state_dir.as_ref() else {
        return Persistence::unavailable();
    };
    match FileStore::open(dir) {
        Ok(store) => Persistence::new(store),
        Err(error) => {
            warn!(dir = %dir.display(), %error, "state directory unavailable");
            Persistence::unavailable()
        }
    }
}

async fn await_poller(task: JoinHandle<()>) -> bool {
    match task.await {
        Ok(()) => true,
        Err(error) => {
            warn!(%error, "job poller task failed");
            false
        }
    }
}

async fn run(config: Config, options: CliOptions) -> io::Result<()> {
    let dialogs = DialogService::new();
    let mut catalog = AdapterCatalog::default();
    catalog.fetch_data(&mut JsonAdapterSource::new(DEMO_CATALOG));
    if let Some(error) = catalog.error() {
        emit(format!("catalog error: {error}"));
    }

    let refreshed = Rc::new(Cell::new(0_u64));
    let counter = Rc::clone(&refreshed);
    let poller = JobPoller::new(config.poll_interval, move || {
        let counter = Rc::clone(&counter);
        async move {
            counter.set(counter.get() + 1);
            Ok::<(), io::Error>(())
        }
    });
    let background = poller.clone();
    let poll_task = tokio::task::spawn_local(async move { background.run().await });

    let mut app = App {
        keys: DialogKeyHandler::new(dialogs.clone()),
        dialogs: dialogs.clone(),
        catalog,
        selection: Rc::new(RefCell::new(Selection::default())),
        persistence: Rc::new(RefCell::new(open_persistence(&config))),
        options,
    };
    let mut dialog_rx: watch::Receiver<DialogState> = dialogs.watch();

    let _raw = RawModeGuard::enable()?;
    emit(USAGE);
    for adapter in app.catalog.filtered_adapters() {
        let marker = if adapter.active { "*" } else { "x" };
        emit(format!("{marker} {:<8} {}", adapter.id, adapter.description));
    }

    loop {
        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if config.key_debug {
                    debug!(
                        "key: {}",
                        KeyDebugLog {
                            code: key.code,
                            modifiers: key.modifiers,
                        }
                    );
                }
                if !app.dialogs.is_open() && key.code == KeyCode::Char('r') {
                    if poller.refresh().await {
                        emit(format!("jobs refreshed ({} total)", refreshed.get()));
                    }
                    continue;
                }
                if !app.handle_key(key) {
                    break;
                }
            }
        }

        if dialog_rx.has_changed().unwrap_or(false) {
            let state = dialog_rx.borrow_and_update().clone();
            app.keys.sync();
            if let Some(text) = describe_dialog(&state) {
                emit(text);
            }
        }

        tokio::time::sleep(EVENT_POLL_INTERVAL).await;
    }

    poller.set_disabled(true);
    await_poller(poll_task).await;
    dialogs.reset();
    Ok(())
}

fn main() -> io::Result<()> {
    let options = parse_cli_options_from_args(env::args().skip(1));
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }
    let config = Config::from_env();
    logging::init(&config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, run(config, options))
}

#[cfg(test)]
mod tests {
    use super::{await_poller, describe_dialog, parse_cli_options_from_args, App, CliOptions};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use futures::FutureExt;
    use modal_dialog::{
        AdapterCatalog, ConfirmOptions, DialogKeyHandler, DialogService, Persistence,
        PromptOptions, Selection,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn app(dialogs: &DialogService) -> App {
        App {
            dialogs: dialogs.clone(),
            keys: DialogKeyHandler::new(dialogs.clone()),
            catalog: AdapterCatalog::default(),
            selection: Rc::new(RefCell::new(Selection::default())),
            persistence: Rc::new(RefCell::new(Persistence::unavailable())),
            options: parse_cli_options_from_args(Vec::<String>::new()),
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn escape_closes_open_dialog_through_shortcuts() {
        let dialogs = DialogService::new();
        let mut app = app(&dialogs);
        let mut reply = dialogs.prompt(PromptOptions::new("Name the preset"));

        assert!(app.handle_key(press(KeyCode::Char('x'))));
        assert!(app.handle_key(press(KeyCode::Delete)));
        assert!((&mut reply).now_or_never().is_none());
        assert!(app.handle_key(press(KeyCode::Esc)));
        assert!(!dialogs.is_open());
        assert_eq!(reply.await, None);
    }

    #[tokio::test]
    async fn failed_poller_task_is_reported() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let ok = tokio::task::spawn_local(async {});
                assert!(await_poller(ok).await);
                let failed = tokio::task::spawn_local(async { panic!("poller failed") });
                assert!(!await_poller(failed).await);
            })
            .await;
    }

    #[test]
    fn parse_cli_options_accepts_title_forms() {
        assert_eq!(
            parse_cli_options_from_args(["--title", "Presets"]).title,
            Some("Presets".to_string())
        );
        assert_eq!(
            parse_cli_options_from_args(["--title=Presets"]).title,
            Some("Presets".to_string())
        );
        assert_eq!(parse_cli_options_from_args(["--title", "--optional"]).title, None);
    }

    #[test]
    fn parse_cli_options_toggles_required_value() {
        assert!(parse_cli_options_from_args(Vec::<String>::new()).require_value);
        let options = parse_cli_options_from_args(["--optional"]);
        assert_eq!(
            options,
            CliOptions {
                title: None,
                require_value: false,
                help: false,
            }
        );
        assert!(parse_cli_options_from_args(["-h"]).help);
    }

    #[test]
    fn describe_dialog_marks_required_prompt() {
        let dialogs = DialogService::new();
        assert_eq!(describe_dialog(&dialogs.snapshot()), None);

        let _reply = dialogs.prompt(PromptOptions::new("Name the preset").require_value(true));
        let text = describe_dialog(&dialogs.snapshot()).expect("open dialog");
        assert!(text.starts_with("[prompt] Name the preset"));
        assert!(text.contains("\n> "));
        assert!(text.ends_with("(required)"));
        dialogs.reset();

        let _reply = dialogs.confirm(ConfirmOptions::new("Delete?").title("Adapters"));
        let text = describe_dialog(&dialogs.snapshot()).expect("open dialog");
        assert_eq!(text, "[confirm] Adapters: Delete?  (Enter=OK Esc=Cancel)");
    }
}
