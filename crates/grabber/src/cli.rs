use crate::formatter::{format_hover, format_pick_result};
use grabber_core::session::CANCEL_KEY;
use grabber_core::{
    HtmlDocument, LayoutSnapshot, NodeId, PickerEvent, PickerHost, PickerOutput, Toggle, pick,
};
use std::error::Error;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

pub struct ReplOptions<'a> {
    pub banner_lines: &'a [&'a str],
    pub prompt: &'a str,
    pub exit_commands: &'a [&'a str],
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Toggle,
    Move { x: f32, y: f32 },
    Click { x: f32, y: f32 },
    Key(String),
    Resolve { target: String, index: usize },
}

impl ReplCommand {
    /// `toggle`, `move X Y`, `click X Y`, `key NAME`, `resolve CSS [@N]`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "toggle" => Ok(ReplCommand::Toggle),
            "move" => {
                let (x, y) = parse_point(rest)?;
                Ok(ReplCommand::Move { x, y })
            }
            "click" => {
                let (x, y) = parse_point(rest)?;
                Ok(ReplCommand::Click { x, y })
            }
            "key" if !rest.is_empty() => Ok(ReplCommand::Key(rest.to_string())),
            "esc" | "escape" => Ok(ReplCommand::Key(CANCEL_KEY.to_string())),
            "resolve" if !rest.is_empty() => {
                let (target, index) = match rest.rsplit_once(" @") {
                    Some((target, n)) => (
                        target.trim(),
                        n.trim()
                            .parse::<usize>()
                            .map_err(|_| format!("Invalid index: {}", n.trim()))?,
                    ),
                    None => (rest, 0),
                };
                Ok(ReplCommand::Resolve {
                    target: target.to_string(),
                    index,
                })
            }
            _ => Err(format!("Unknown command: {}", line)),
        }
    }
}

fn parse_point(args: &str) -> Result<(f32, f32), String> {
    let mut parts = args.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("Expected two coordinates: X Y".to_string());
    };
    let x = x.parse().map_err(|_| format!("Invalid coordinate: {}", x))?;
    let y = y.parse().map_err(|_| format!("Invalid coordinate: {}", y))?;
    Ok((x, y))
}

/// An interactive picking session over one loaded page.
pub struct PickerRepl {
    doc: HtmlDocument,
    layout: LayoutSnapshot<NodeId>,
    host: PickerHost<NodeId>,
    overlay_ids: Vec<String>,
    preview_len: usize,
}

impl PickerRepl {
    pub fn new(
        doc: HtmlDocument,
        layout: LayoutSnapshot<NodeId>,
        overlay_ids: Vec<String>,
        preview_len: usize,
    ) -> Self {
        Self {
            doc,
            layout,
            host: PickerHost::new(),
            overlay_ids,
            preview_len,
        }
    }

    pub fn execute_line(&mut self, line: &str) -> Result<String, String> {
        match ReplCommand::parse(line)? {
            ReplCommand::Toggle => {
                let doc = &self.doc;
                let overlay_ids = &self.overlay_ids;
                match self.host.toggle(|| doc.overlay_nodes(overlay_ids)) {
                    Toggle::Started(_) => Ok("Picking started. Press 'esc' to cancel.".into()),
                    Toggle::Stopped => Ok("Picking stopped.".into()),
                }
            }
            ReplCommand::Resolve { target, index } => {
                let node = self
                    .doc
                    .select_nth(&target, index)
                    .map_err(|e| e.to_string())?;
                Ok(format_pick_result(&pick(&self.doc, node), self.preview_len))
            }
            ReplCommand::Move { x, y } => self.dispatch(PickerEvent::PointerMove { x, y }),
            ReplCommand::Click { x, y } => self.dispatch(PickerEvent::Click { x, y }),
            ReplCommand::Key(key) => self.dispatch(PickerEvent::Key(key)),
        }
    }

    fn dispatch(&mut self, event: PickerEvent) -> Result<String, String> {
        if !self.host.is_active() {
            return Err("Picking is not active (use 'toggle')".to_string());
        }
        match self.host.dispatch(&self.doc, &self.layout, event) {
            PickerOutput::Hover(info) => Ok(format_hover(&info)),
            PickerOutput::Picked(result) => Ok(format_pick_result(&result, self.preview_len)),
            PickerOutput::Cancelled => Ok("Picking cancelled.".into()),
            PickerOutput::Nothing => Ok("(nothing here)".into()),
        }
    }
}

enum Line {
    Command(String),
    Blank,
    Exit,
}

/// EOF counts as an exit command.
fn classify_line(line: Option<&str>, exit_commands: &[&str]) -> Line {
    match line.map(str::trim) {
        None => Line::Exit,
        Some("") => Line::Blank,
        Some(cmd) if exit_commands.contains(&cmd) => Line::Exit,
        Some(cmd) => Line::Command(cmd.to_string()),
    }
}

pub async fn run_repl(repl: &mut PickerRepl, options: ReplOptions<'_>) -> Result<(), Box<dyn Error>> {
    for line in options.banner_lines {
        println!("{}", line);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        print!("{}", options.prompt);
        stdout.flush()?;

        let line = lines.next_line().await?;
        match classify_line(line.as_deref(), options.exit_commands) {
            Line::Blank => {}
            Line::Exit => return Ok(()),
            Line::Command(cmd) => match repl.execute_line(&cmd) {
                Ok(output) => println!("{}", output),
                Err(err) => println!("Error: {}", err),
            },
        }
    }
}
