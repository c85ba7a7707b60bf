//! Line-level parsing of battle logs
//!
//! A battle log is a sequence of lines like `|switch|p1a: Garchomp|Garchomp, L100|100/100`.
//! Each line becomes a [`Command`]; presentation-only lines are filtered out and
//! the stream ends at the first terminal command.

use serde::Serialize;

/// Kind of a protocol command, keyed by its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    // === Initialization ===
    Player,
    TeamSize,
    GameType,
    Gen,
    Tier,
    Rated,
    ClearPoke,
    Poke,
    TeamPreview,
    Start,

    // === Progress ===
    Turn,
    Upkeep,

    // === Major actions ===
    Move,
    Switch,
    Drag,
    Replace,
    DetailsChange,
    Swap,
    Cant,
    Faint,

    // === Minor actions ===
    FormeChange,
    Damage,
    Heal,
    SetHp,
    Status,
    CureStatus,
    Ability,
    EndAbility,
    Item,
    EndItem,
    Transform,
    Mega,
    Terastallize,
    Weather,
    FieldStart,
    FieldEnd,
    SideStart,
    SideEnd,

    // === Terminal ===
    Win,
    Tie,
    Forfeit,

    /// Chat, timestamps, rules text, join/leave notices and other display-only lines
    Presentation,

    /// Anything this parser does not know about
    Unknown,
}

/// Tags that only affect how a replay is displayed
const PRESENTATION_TAGS: &[&str] = &[
    "c",
    "c:",
    "chat",
    "chatmsg",
    "chatmsg-raw",
    "html",
    "uhtml",
    "uhtmlchange",
    "raw",
    "error",
    "bigerror",
    "t:",
    "j",
    "J",
    "join",
    "l",
    "L",
    "leave",
    "n",
    "N",
    "name",
    "rule",
    "inactive",
    "inactiveoff",
    "-hint",
    "debug",
    "seed",
    "timer",
    "title",
    "users",
    "init",
    "notify",
    "tempnotify",
    "tempnotifyoff",
    "badge",
    "unlink",
    "hidelines",
    "spectator",
    "spectatorleave",
    "-message",
    "-center",
    "-nothing",
    "-combine",
];

impl CommandKind {
    /// Classify a command tag (the text between the first two `|`)
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "player" => CommandKind::Player,
            "teamsize" => CommandKind::TeamSize,
            "gametype" => CommandKind::GameType,
            "gen" => CommandKind::Gen,
            "tier" => CommandKind::Tier,
            "rated" => CommandKind::Rated,
            "clearpoke" => CommandKind::ClearPoke,
            "poke" => CommandKind::Poke,
            "teampreview" => CommandKind::TeamPreview,
            "start" => CommandKind::Start,
            "turn" => CommandKind::Turn,
            "upkeep" => CommandKind::Upkeep,
            "move" => CommandKind::Move,
            "switch" => CommandKind::Switch,
            "drag" => CommandKind::Drag,
            "replace" => CommandKind::Replace,
            "detailschange" => CommandKind::DetailsChange,
            "swap" => CommandKind::Swap,
            "cant" => CommandKind::Cant,
            "faint" => CommandKind::Faint,
            "-formechange" => CommandKind::FormeChange,
            "-damage" => CommandKind::Damage,
            "-heal" => CommandKind::Heal,
            "-sethp" => CommandKind::SetHp,
            "-status" => CommandKind::Status,
            "-curestatus" => CommandKind::CureStatus,
            "-ability" => CommandKind::Ability,
            "-endability" => CommandKind::EndAbility,
            "-item" => CommandKind::Item,
            "-enditem" => CommandKind::EndItem,
            "-transform" => CommandKind::Transform,
            "-mega" => CommandKind::Mega,
            "-terastallize" => CommandKind::Terastallize,
            "-weather" => CommandKind::Weather,
            "-fieldstart" => CommandKind::FieldStart,
            "-fieldend" => CommandKind::FieldEnd,
            "-sidestart" => CommandKind::SideStart,
            "-sideend" => CommandKind::SideEnd,
            "win" | "forcewin" => CommandKind::Win,
            "tie" | "forcetie" => CommandKind::Tie,
            "forfeit" => CommandKind::Forfeit,
            _ if PRESENTATION_TAGS.contains(&tag) => CommandKind::Presentation,
            _ => CommandKind::Unknown,
        }
    }

    /// Whether this kind ends the battle narrative
    pub fn is_terminal(&self) -> bool {
        matches!(self, CommandKind::Win | CommandKind::Tie | CommandKind::Forfeit)
    }
}

/// A single parsed protocol line
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    /// The literal tag, preserved for unknown kinds
    pub tag: String,
    pub args: Vec<String>,
    /// The original line, trimmed
    pub raw: String,
}

impl Command {
    /// Argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Arguments as string slices, for the typed event parsers
    pub fn parts(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }

    /// Value of a bracketed keyword argument such as `[from] Stealth Rock`
    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.args.iter().find_map(|arg| {
            let rest = arg.strip_prefix('[')?.strip_prefix(key)?.strip_prefix(']')?;
            Some(rest.trim_start())
        })
    }

    /// Whether a bare flag like `[still]` or `[upkeep]` is present
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| {
            arg.strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .is_some_and(|inner| inner == flag)
        })
    }

    /// How the battle ended, if this is a terminal command
    pub fn outcome(&self) -> Option<Outcome> {
        match self.kind {
            CommandKind::Win => Some(Outcome::Winner {
                name: self.arg(0).unwrap_or_default().to_string(),
            }),
            CommandKind::Tie => Some(Outcome::Tie),
            CommandKind::Forfeit => Some(Outcome::Forfeit {
                loser: self.arg(0).unwrap_or_default().to_string(),
                winner: None,
            }),
            _ => None,
        }
    }
}

/// Final result of a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Winner { name: String },
    Tie,
    Forfeit { loser: String, winner: Option<String> },
}

/// Parse one log line into a Command
///
/// Returns `None` for lines that carry no command: blank lines, lines that do
/// not start with `|`, and spacer lines like `|`.
pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    let body = line.strip_prefix('|')?;

    let mut parts = body.split('|');
    let tag = parts.next()?;
    if tag.is_empty() {
        return None;
    }

    let args: Vec<String> = parts.map(str::to_string).collect();

    // Forfeits only show up as a message line right before the win
    let kind = match tag {
        "-message" if args.first().is_some_and(|m| m.ends_with(" forfeited.")) => {
            CommandKind::Forfeit
        }
        _ => CommandKind::from_tag(tag),
    };

    let args = if kind == CommandKind::Forfeit && tag == "-message" {
        args.first()
            .map(|m| vec![m.trim_end_matches(" forfeited.").to_string()])
            .unwrap_or_default()
    } else {
        args
    };

    Some(Command {
        kind,
        tag: tag.to_string(),
        args,
        raw: line.to_string(),
    })
}

/// Battle-relevant commands of one log
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandStream {
    pub commands: Vec<Command>,
    /// Number of presentation lines dropped
    pub filtered: usize,
    /// Whether a terminal command was reached
    pub terminated: bool,
}

impl CommandStream {
    /// The terminal command, if the stream reached one
    pub fn terminal(&self) -> Option<&Command> {
        self.commands.last().filter(|c| c.kind.is_terminal())
    }
}

/// Parse a whole log into a command stream
///
/// Presentation lines are dropped. Parsing stops right after the first
/// terminal command; nothing after it is read.
pub fn parse_log<'a, I>(lines: I) -> CommandStream
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stream = CommandStream::default();

    for line in lines {
        let Some(command) = parse_line(line) else {
            continue;
        };

        if command.kind == CommandKind::Presentation {
            stream.filtered += 1;
            continue;
        }

        let terminal = command.kind.is_terminal();
        stream.commands.push(command);

        if terminal {
            stream.terminated = true;
            break;
        }
    }

    stream
}
