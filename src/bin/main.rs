use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thaana_core::{FieldId, InputType, KeyboardSettings, MemoryDocument, TransliterationEngine};

#[derive(Parser)]
#[command(name = "thaana_pad", about = "Type Thaana on a Latin keyboard")]
struct Cli {
    /// Settings file (default: ~/.config/thaana-keyboard/settings.toml)
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Caret and selection as the user sees it; `anchor` stays put while
/// shift+arrows move `head`.
struct Cursor {
    anchor: usize,
    head: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr, which shares the raw terminal; keep it quiet.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => KeyboardSettings::from_file(path)?,
        None => KeyboardSettings::load_default()?,
    };
    let map = Arc::new(settings.load_layout()?);

    // The pad is its own single-field document.
    settings.target_selector = "#pad".to_string();
    let mut doc = MemoryDocument::new();
    let field = doc.add_field_with_id("pad", "");
    let mut engine = TransliterationEngine::new(settings, map, &mut doc);
    if !engine.is_running() {
        engine.start(&mut doc);
    }
    doc.focus(&mut engine, field);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    let result = run(&mut stdout, &mut doc, &mut engine, field);
    terminal::disable_raw_mode()?;
    execute!(stdout, Print("\r\n"))?;

    result?;
    println!("{}", doc.value(field));
    Ok(())
}

fn run(
    stdout: &mut Stdout,
    doc: &mut MemoryDocument,
    engine: &mut TransliterationEngine,
    field: FieldId,
) -> io::Result<()> {
    let mut cur = Cursor { anchor: 0, head: 0 };
    loop {
        render(stdout, doc, engine, field)?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let len = doc.value(field).chars().count();
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        let target = match key.code {
            KeyCode::Esc => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char(c) => {
                doc.edit(engine, field, InputType::InsertText, Some(&c.to_string()));
                None
            }
            KeyCode::Enter => {
                doc.edit(engine, field, InputType::InsertLineBreak, None);
                None
            }
            KeyCode::Backspace => {
                doc.backspace(engine, field);
                None
            }
            KeyCode::Delete => {
                doc.delete_forward(engine, field);
                None
            }
            KeyCode::Left => Some(cur.head.saturating_sub(1)),
            KeyCode::Right => Some((cur.head + 1).min(len)),
            KeyCode::Home => Some(0),
            KeyCode::End => Some(len),
            _ => None,
        };

        match target {
            Some(head) => {
                cur.head = head;
                if !shift {
                    cur.anchor = head;
                }
                doc.select(engine, field, cur.anchor.min(cur.head), cur.anchor.max(cur.head));
            }
            None => {
                let sel = doc.selection(field).unwrap_or_default();
                cur = Cursor { anchor: sel.start, head: sel.end };
            }
        }
    }
    Ok(())
}

fn render(
    stdout: &mut Stdout,
    doc: &MemoryDocument,
    engine: &TransliterationEngine,
    field: FieldId,
) -> io::Result<()> {
    let value: Vec<char> = doc.value(field).chars().collect();
    let sel = doc.selection(field).unwrap_or_default();

    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All),
        Print(format!(
            "Thaana pad ({}, {:?})\r\n",
            engine.character_map().name(),
            engine.settings().correction
        )),
        Print("Type to write, arrows move, shift+arrows select, Esc quits.\r\n\r\n> "),
    )?;

    for (i, c) in value.iter().enumerate() {
        if i == sel.start {
            queue!(stdout, SetAttribute(Attribute::Reverse))?;
            if !sel.is_range() {
                queue!(stdout, Print('|'), SetAttribute(Attribute::Reset))?;
            }
        }
        if i == sel.end && sel.is_range() {
            queue!(stdout, SetAttribute(Attribute::Reset))?;
        }
        let shown = if *c == '\n' { "\r\n  ".to_string() } else { c.to_string() };
        queue!(stdout, Print(shown))?;
    }
    if sel.start >= value.len() {
        queue!(stdout, SetAttribute(Attribute::Reverse), Print('|'))?;
    }
    queue!(
        stdout,
        SetAttribute(Attribute::Reset),
        Print(format!("\r\n\r\n[{}..{}]", sel.start, sel.end))
    )?;
    stdout.flush()
}
