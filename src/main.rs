//! Skyline - cascading location picker with current weather

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use skyline::action::Action;
use skyline::components::{Component, WeatherApp, WeatherAppProps};
use skyline::config::{
    ApiConfig, DEFAULT_DIRECTORY_URL, DEFAULT_GEOCODING_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_WEATHER_URL, Endpoint,
};
use skyline::effect::Effect;
use skyline::reducer::reducer;
use skyline::services::Services;
use skyline::state::{AppState, DefaultChoice};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Pick a country, region and city; look up its current weather
#[derive(Parser, Debug)]
#[command(name = "skyline")]
#[command(about = "Cascading location picker with current weather")]
struct Args {
    /// Country selected once the list loads (code or name, "" for none)
    #[arg(long, default_value = "IN")]
    country: String,

    /// Region selected once the list loads (code or name, "" for none)
    #[arg(long, default_value = "Madhya Pradesh")]
    region: String,

    /// City selected once the list loads ("" for none)
    #[arg(long, default_value = "Bhopal")]
    city: String,

    /// Directory provider API key
    #[arg(long, env = "DIRECTORY_API_KEY", hide_env_values = true)]
    directory_key: Option<String>,

    /// Geocoding provider API key
    #[arg(long, env = "GEOCODING_API_KEY", hide_env_values = true)]
    geocoding_key: Option<String>,

    /// Weather provider API key
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    weather_key: Option<String>,

    #[arg(long, env = "DIRECTORY_URL", default_value = DEFAULT_DIRECTORY_URL)]
    directory_url: String,

    #[arg(long, env = "GEOCODING_URL", default_value = DEFAULT_GEOCODING_URL)]
    geocoding_url: String,

    #[arg(long, env = "WEATHER_URL", default_value = DEFAULT_WEATHER_URL)]
    weather_url: String,

    /// Per-request timeout in seconds (minimum 1)
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Write logs here (RUST_LOG filters them); nothing is logged otherwise
    #[arg(long, env = "SKYLINE_LOG")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn api_config(&self) -> ApiConfig {
        ApiConfig {
            directory: Endpoint::new(&self.directory_url, self.directory_key.clone()),
            geocoding: Endpoint::new(&self.geocoding_url, self.geocoding_key.clone()),
            weather: Endpoint::new(&self.weather_url, self.weather_key.clone()),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn default_choice(value: &str) -> DefaultChoice {
    match value.trim() {
        "" => DefaultChoice::Unset,
        wanted => DefaultChoice::Preferred(wanted.to_string()),
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum SkylineComponentId {
    App,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum SkylineContext {
    Main,
}

impl EventRoutingState<SkylineComponentId, SkylineContext> for AppState {
    fn focused(&self) -> Option<SkylineComponentId> {
        Some(SkylineComponentId::App)
    }

    fn modal(&self) -> Option<SkylineComponentId> {
        None
    }

    fn binding_context(&self, id: SkylineComponentId) -> SkylineContext {
        match id {
            SkylineComponentId::App => SkylineContext::Main,
        }
    }

    fn default_context(&self) -> SkylineContext {
        SkylineContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = args.api_config();
    let services = Services::new(&config).map_err(io::Error::other)?;
    let defaults = (
        default_choice(&args.country),
        default_choice(&args.region),
        default_choice(&args.city),
    );

    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            let (country, region, city) = defaults;
            Ok::<AppState, io::Error>(AppState::new(country, region, city))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        Arc::new(services),
        replay_actions,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// The terminal belongs to the UI, so logs only go to a file
fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("skyline=debug,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

struct SkylineUi {
    app: WeatherApp,
}

impl SkylineUi {
    fn new() -> Self {
        Self {
            app: WeatherApp::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<SkylineComponentId>,
    ) {
        event_ctx.set_component_area(SkylineComponentId::App, area);
        let props = WeatherAppProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.app.render(frame, area, props);
    }

    fn handle_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = WeatherAppProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.app.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    services: Arc<Services>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(SkylineUi::new()));
    let mut bus: EventBus<AppState, Action, SkylineComponentId, SkylineContext> = EventBus::new();
    let keybindings: Keybindings<SkylineContext> = Keybindings::new();

    let ui_app = Rc::clone(&ui);
    bus.register(SkylineComponentId::App, move |event, state| {
        ui_app.borrow_mut().handle_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, services.clone()),
        )
        .await
}

/// Handle effects by spawning tasks; results come back as actions
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: Arc<Services>) {
    ctx.tasks().spawn(Services::task_key(&effect), async move { services.run(effect).await });
}
