use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use dengue_map::app::App;
use dengue_map::choropleth::Year;
use dengue_map::config::{Cli, Command};
use dengue_map::context::MapContext;
use dengue_map::{export, ui};
use log::LevelFilter;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_file.as_deref())?;

    let context = MapContext::load(&cli.cases, &cli.boundaries)
        .context("failed to load map data")?;

    match cli.command() {
        Command::View => view(context, cli.year, cli.log_file.is_some()),
        Command::Export { out } => {
            let file = File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            export::export_html(&context, cli.year, BufWriter::new(file))?;
            log::info!("Wrote {}", out.display());
            Ok(())
        }
        Command::Styles => {
            export::write_style_lines(&context, cli.year, io::stdout().lock())?;
            Ok(())
        }
    }
}

/// Install the global logger. `RUST_LOG` sets the filter (default `info`).
fn init_logger(log_file: Option<&Path>) -> Result<()> {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let mut builder = pretty_env_logger::formatted_builder();
    builder.parse_filters(&filters);

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    }

    builder.try_init()?;
    Ok(())
}

/// Run the terminal map until the user quits
fn view(context: MapContext, year: Year, logs_to_file: bool) -> Result<()> {
    // stderr shares the screen with the map; mute it unless logs go to a file
    let level = log::max_level();
    if !logs_to_file {
        log::set_max_level(LevelFilter::Off);
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, context, year);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    log::set_max_level(level);

    result
}

/// Handle mouse events for panning, zooming and year tabs
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for the tooltip
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.click(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, context: MapContext, year: Year) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(context, year, size.width as usize, size.height as usize);

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    // Year selector
                    KeyCode::Tab | KeyCode::Char(']') | KeyCode::Char('n') => app.next_year(),
                    KeyCode::BackTab | KeyCode::Char('[') | KeyCode::Char('p') => app.prev_year(),
                    KeyCode::Char(c @ '1'..='6') => {
                        app.select_year_index(c as usize - '1' as usize);
                    }

                    // Pan with hjkl or arrow keys
                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -8),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 8),

                    // Zoom
                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    // Layer toggles
                    KeyCode::Char('L') => app.renderer.toggle_labels(),
                    KeyCode::Char('b') | KeyCode::Char('B') => app.renderer.toggle_outlines(),
                    KeyCode::Char('g') | KeyCode::Char('G') => app.renderer.toggle_legend(),

                    // Reset view
                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
