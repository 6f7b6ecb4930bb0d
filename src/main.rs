use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::Rect;

use term_menu::clipboard::Clipboard;
use term_menu::components::{
    ContextMenu, FrameWindow, Label, MenuBar, MenuBarItem, MenuItem, StatusBar, StatusItem,
    TextField,
};
use term_menu::drivers::OutputDriver;
use term_menu::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_menu::keybindings::KeyCombo;
use term_menu::runner::run_toplevel;
use term_menu::tracing_sub;
use term_menu::window::{Command, Dock, HostId, Toplevel};

/// Demo of a menu bar, a status bar and context menus on a text field.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Let popups keep negative coordinates instead of pinning them to the
    /// top-left corner.
    #[arg(long)]
    no_clamp: bool,

    /// Append tracing output to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Put the form inside a framed window.
    #[arg(long)]
    window: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    match &cli.log_file {
        Some(path) => tracing_sub::init_with_file(path)?,
        None => tracing_sub::init_default(),
    }

    let mut output = ConsoleOutputDriver::new()?;
    let (width, height) = output.size()?;
    let mut toplevel = build_toplevel(&cli, width, height);
    let mut input = ConsoleInputDriver::new();

    output.enter()?;
    let result = run_toplevel(
        &mut output,
        &mut input,
        &mut toplevel,
        Duration::from_millis(16),
        handle_command,
    );
    output.exit()?;
    result
}

fn build_toplevel(cli: &Cli, width: u16, height: u16) -> Toplevel {
    let mut toplevel = Toplevel::new(width, height);
    toplevel.set_menu_bar(MenuBar::new(vec![
        MenuBarItem::new(
            "File",
            vec![
                MenuItem::new("New", "new"),
                MenuItem::new("Quit", "quit").with_shortcut("Ctrl+Q"),
            ],
        ),
        MenuBarItem::new(
            "Edit",
            vec![
                MenuItem::new("Copy", "copy"),
                MenuItem::new("Cut", "cut"),
                MenuItem::new("Paste", "paste"),
            ],
        ),
    ]));
    toplevel.set_status_bar(StatusBar::new(vec![
        StatusItem::new(
            Some(KeyCombo::new(KeyCode::F(1), KeyModifiers::NONE)),
            "~F1~ Help",
            "help",
        ),
        StatusItem::new(
            Some(KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            "~^Q~ Quit",
            "quit",
        ),
    ]));

    let parent: Option<HostId> = cli
        .window
        .then(|| toplevel.add_control(FrameWindow::new("Window"), Dock::Fill));
    let label = Label::new("Label:");
    let field = TextField::new("TextField").with_clipboard(Clipboard::detect());
    match parent {
        Some(window) => {
            toplevel.add_child(window, label, Dock::Fixed(Rect::new(2, 3, 6, 1)));
            toplevel.add_child(window, field, Dock::Fixed(Rect::new(9, 3, 20, 1)));
        }
        None => {
            toplevel.add_control(label, Dock::Fixed(Rect::new(2, 3, 6, 1)));
            toplevel.add_control(field, Dock::Fixed(Rect::new(9, 3, 20, 1)));
        }
    }

    let mut free = ContextMenu::at(
        0,
        0,
        vec![
            MenuItem::new("About", "about"),
            MenuItem::new("Quit", "quit").with_shortcut("Ctrl+Q"),
        ],
    );
    free.set_clamp_to_zero(!cli.no_clamp);
    toplevel.add_context_menu(free);
    toplevel
}

fn handle_command(command: Command, toplevel: &mut Toplevel) {
    match command.id.as_str() {
        "quit" => toplevel.request_stop(),
        other => tracing::info!(source = ?command.source, command = other, "unhandled command"),
    }
}
