// Line-protocol driver: one command per stdin line, one response per line.
//
//   TYPE <text>       type each character as its own keystroke
//   COMPOSE <text>    commit <text> through an input method composition
//   PASTE <text>      paste <text> over the selection
//   BACKSPACE | DELETE
//   SELECT <s> <e>    select [s, e)
//   SET <text>        assign the value programmatically
//   VALUE             report the current state
//   EXIT
//
// Every response other than ERR is `STATE <start> <end> <value>`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use thaana_core::{FieldId, KeyboardSettings, MemoryDocument, TransliterationEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("--- Thaana keyboard simulator starting ---");

    let mut settings = KeyboardSettings::load_default()?;
    let map = Arc::new(settings.load_layout()?);
    settings.target_selector = "#field".to_string();
    settings.auto_start = true;

    let mut doc = MemoryDocument::new();
    let field = doc.add_field_with_id("field", "");
    let mut engine = TransliterationEngine::new(settings, map, &mut doc);
    doc.focus(&mut engine, field);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let input = line?;
        log::debug!("<- {:?}", input);
        let (command, arg) = match input.split_once(' ') {
            Some((command, arg)) => (command, arg),
            None => (input.as_str(), ""),
        };

        match command {
            "TYPE" => doc.type_text(&mut engine, field, arg),
            "COMPOSE" => doc.compose(&mut engine, field, arg),
            "PASTE" => doc.paste(&mut engine, field, arg),
            "BACKSPACE" => doc.backspace(&mut engine, field),
            "DELETE" => doc.delete_forward(&mut engine, field),
            "SET" => doc.set_text(&mut engine, field, arg),
            "SELECT" => match parse_range(arg) {
                Some((start, end)) => doc.select(&mut engine, field, start, end),
                None => {
                    respond(&mut stdout, "ERR SELECT needs two offsets")?;
                    continue;
                }
            },
            "VALUE" => {}
            "EXIT" => {
                log::info!("received EXIT");
                break;
            }
            _ => {
                log::warn!("unknown command {:?}", command);
                respond(&mut stdout, "ERR unknown command")?;
                continue;
            }
        }
        respond(&mut stdout, &state_line(&doc, field))?;
    }
    log::info!("shutting down");
    Ok(())
}

fn parse_range(arg: &str) -> Option<(usize, usize)> {
    let mut parts = arg.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(start)), Some(Ok(end)), None) => Some((start, end)),
        _ => None,
    }
}

fn state_line(doc: &MemoryDocument, field: FieldId) -> String {
    let sel = doc.selection(field).unwrap_or_default();
    format!("STATE {} {} {}", sel.start, sel.end, doc.value(field))
}

fn respond(stdout: &mut io::Stdout, line: &str) -> io::Result<()> {
    log::debug!("-> {:?}", line);
    writeln!(stdout, "{}", line)?;
    stdout.flush()
}
