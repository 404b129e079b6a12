mod ui;

use cardstack::{
    app::App,
    config::{Config, ConfigStore, FileConfigStore},
    content::{CardItem, Catalog, Category},
    controller::{CardSequence, ScrollProgressController},
    geometry::{Geometry, SharedGeometry},
    page::ROW_PX,
    pause::SystemClock,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};

/// scroll-driven stacked cards with idle-aware autoplay
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Walk through healthcare reference cards as a pinned, scroll-driven stack. Interacting pauses the autoplay spotlight until you go idle."
)]
pub struct Cli {
    /// only show cards from one category
    #[clap(short = 'c', long, value_enum)]
    category: Option<Category>,

    /// only show cards matching a search query
    #[clap(short = 's', long)]
    search: Option<String>,

    /// idle time in milliseconds before a paused autoplay resumes
    #[clap(long)]
    idle_ms: Option<u64>,

    /// visible fraction of the card section needed to reveal cards
    #[clap(long)]
    threshold: Option<f64>,

    /// start with autoplay paused
    #[clap(long)]
    paused: bool,

    /// ignore gestures; only explicit pause/resume keys affect autoplay
    #[clap(long)]
    no_track: bool,

    /// persist the effective configuration and continue
    #[clap(long)]
    save_config: bool,

    /// print JSON snapshots for these container offsets and exit
    #[clap(long = "dump-at", num_args = 1.., allow_negative_numbers = true)]
    dump_at: Vec<f64>,

    /// viewport height in pixels used by --dump-at
    #[clap(long, default_value_t = 1000.0)]
    viewport: f64,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(ms) = self.idle_ms {
            config.auto_resume_idle_ms = ms;
        }
        if let Some(t) = self.threshold {
            config.intersection_threshold = t;
        }
        if self.paused {
            config.initial_pause_state = true;
        }
        if self.no_track {
            config.track_interactions = false;
        }
        config
    }

    fn cards(&self, catalog: &Catalog) -> cardstack::Result<CardSequence<CardItem>> {
        match &self.search {
            Some(query) => CardSequence::new(
                catalog
                    .search(query)
                    .into_iter()
                    .filter(|i| self.category.map_or(true, |c| i.category == c))
                    .cloned()
                    .collect(),
            ),
            None => catalog.sequence(self.category),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    config.validate()?;
    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "configuration saved");
    }

    let catalog = Catalog::load_embedded()?;
    tracing::debug!(categories = ?catalog.categories(), items = catalog.len(), "catalog loaded");
    let cards = cli.cards(&catalog)?;
    tracing::debug!(cards = ?cards.keys().collect::<Vec<_>>(), "card sequence selected");

    if !cli.dump_at.is_empty() {
        return dump_snapshots(&cli, &config, cards.len());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &catalog, cards, &config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    catalog: &Catalog,
    cards: CardSequence<CardItem>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    let viewport_rows = size.height.saturating_sub(ui::CHROME_ROWS);
    let mut app = App::new(
        cards,
        config,
        SystemClock::new(),
        viewport_rows as f64 * ROW_PX,
    )?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.frame_interval()),
    );

    terminal.draw(|f| ui::draw(&app, catalog, f))?;
    while !app.should_quit {
        let event = match runner.step() {
            cardstack::runtime::HostEvent::Resize(w, h) => {
                cardstack::runtime::HostEvent::Resize(w, h.saturating_sub(ui::CHROME_ROWS))
            }
            other => other,
        };
        if app.handle(event) && !app.should_quit {
            terminal.draw(|f| ui::draw(&app, catalog, f))?;
        }
    }

    Ok(())
}

fn dump_snapshots(cli: &Cli, config: &Config, item_count: usize) -> Result<(), Box<dyn Error>> {
    let geometry = SharedGeometry::new(Geometry::new(cli.viewport, 0.0));
    let mut controller =
        ScrollProgressController::attach(geometry.clone(), config.controller(item_count))?;
    controller.on_intersection(1.0);

    for &top in &cli.dump_at {
        geometry.set_container_top(top);
        controller.on_scroll();
        controller.on_animation_frame();
        println!("{}", serde_json::to_string(controller.snapshot())?);
    }
    controller.detach();
    Ok(())
}
