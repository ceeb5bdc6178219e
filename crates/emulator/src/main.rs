mod command;

use crate::command::Command;
use anyhow::{Context, Error};
use clap::Parser;
use crumbs_core::logging::{init_logging, shutdown_logging};
use crumbs_core::navigation::{BreadcrumbRenderer, NavigationStack, RenderOutcome};
use crumbs_core::settings::{Settings, SETTINGS_PATH};
use crumbs_core::surface::{ContentType, SurfaceError, SurfaceHandle, TextBuffer, TextSurface};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

/// Drives a navigation stack from stdin, one command per tick.
#[derive(Debug, Parser)]
#[command(name = "crumbs-emulator")]
struct Args {
    /// Settings file to load.
    #[arg(long, default_value = SETTINGS_PATH)]
    settings: PathBuf,

    /// Paint into an in-memory buffer instead of the terminal. The buffer
    /// is printed by `show`.
    #[arg(long)]
    headless: bool,
}

/// Stand-in for the host display: every write becomes one stdout line.
struct TerminalSurface {
    content_type: ContentType,
    line: String,
}

impl TerminalSurface {
    fn new() -> Self {
        TerminalSurface {
            content_type: ContentType::None,
            line: String::with_capacity(512),
        }
    }
}

impl TextSurface for TerminalSurface {
    fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    fn write_text(&mut self, text: &str, append: bool) -> Result<(), SurfaceError> {
        if self.content_type != ContentType::TextAndImage {
            return Err(SurfaceError::Rejected(format!(
                "content type {:?} can't show text",
                self.content_type
            )));
        }

        if !append {
            self.line.clear();
        }
        self.line.push_str(text);

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "[lcd] {}", self.line)
            .and_then(|_| stdout.flush())
            .map_err(|e| SurfaceError::Rejected(e.to_string()))
    }
}

struct Host {
    stack: NavigationStack,
    renderer: BreadcrumbRenderer,
    display: SurfaceHandle,
    /// Set in headless mode; the same surface as `display`.
    buffer: Option<Rc<RefCell<TextBuffer>>>,
}

impl Host {
    fn new(settings: &Settings, headless: bool) -> Result<Self, Error> {
        let stack = NavigationStack::from_settings(&settings.navigation)
            .context("invalid navigation settings")?;
        let mut renderer = BreadcrumbRenderer::from_settings(&settings.breadcrumb);

        let (display, buffer) = if headless {
            let buffer = Rc::new(RefCell::new(TextBuffer::with_capacity(
                settings.breadcrumb.buffer_capacity,
            )));
            let display: SurfaceHandle = buffer.clone();
            (display, Some(buffer))
        } else {
            let display: SurfaceHandle = Rc::new(RefCell::new(TerminalSurface::new()));
            (display, None)
        };
        renderer.set_default_target(Some(&display));

        Ok(Host {
            stack,
            renderer,
            display,
            buffer,
        })
    }

    /// What the headless buffer currently shows.
    fn buffer_text(&self) -> Option<String> {
        self.buffer
            .as_ref()
            .map(|buffer| buffer.borrow().text().to_string())
    }

    fn tick(&mut self, command: Command) -> Result<(), Error> {
        match command {
            Command::Push(id, title) => {
                if !self.stack.push(id, title) {
                    println!("stack full ({} screens)", self.stack.capacity());
                }
            }
            Command::Pop => {
                if !self.stack.pop() {
                    println!("already at root");
                }
            }
            Command::Reset => self.stack.reset(),
            Command::Detach => self.renderer.set_default_target(None),
            Command::Attach => self.renderer.set_default_target(Some(&self.display)),
            Command::Show => {
                println!(
                    "current: id={} title={}",
                    self.stack.current_id(),
                    self.stack.current_title()
                );
                if let Some(text) = self.buffer_text() {
                    println!("[buffer] {}", text);
                }
            }
        }

        if command.redraws() {
            self.redraw()?;
        }

        Ok(())
    }

    fn redraw(&mut self) -> Result<(), Error> {
        let outcome = self
            .renderer
            .render(&self.stack, None)
            .context("can't paint breadcrumb")?;

        if outcome == RenderOutcome::NoTarget {
            tracing::debug!(depth = self.stack.depth(), "breadcrumb not painted, no target");
        }

        Ok(())
    }
}

fn run(settings: &Settings, headless: bool) -> Result<(), Error> {
    let mut host = Host::new(settings, headless)?;
    host.redraw()?;

    let stdin = io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.context("can't read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Ok(command) => {
                tracing::debug!(tick = index, ?command, "applying command");
                if let Err(e) = host.tick(command) {
                    eprintln!("tick {} failed: {:#}", index, e);
                    tracing::warn!(tick = index, error = %format!("{:#}", e), "tick failed");
                }
            }
            Err(e) => {
                eprintln!("{:#}", e);
                tracing::warn!(tick = index, line = %line, "ignored invalid command");
            }
        }
    }

    Ok(())
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    let settings = Settings::load(&args.settings);
    init_logging(&settings.logging)?;
    tracing::info!(
        capacity = settings.navigation.capacity,
        max_chars = settings.breadcrumb.max_chars,
        headless = args.headless,
        "emulator started"
    );

    let result = run(&settings, args.headless);
    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "emulator stopped");
    }

    shutdown_logging();

    result
}
