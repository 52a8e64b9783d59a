//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Inputs
    Wallet(String),
    Token(String),
    Network(String),

    // Transfers options
    Limit(String),
    Age(String),
    Contract(String),

    // Fetching
    Fetch,
    Next,
    Prev,

    Export(Option<String>),
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let with_arg = |ctor: fn(String) -> Command| match args.clone() {
        Some(arg) => ctor(arg),
        None => Command::Unknown(input.to_string()),
    };

    match cmd.to_lowercase().as_str() {
        "wallet" | "w" => with_arg(Command::Wallet),
        "token" | "t" => with_arg(Command::Token),
        "network" | "net" => with_arg(Command::Network),

        "limit" | "size" => with_arg(Command::Limit),
        "age" => with_arg(Command::Age),
        "contract" => with_arg(Command::Contract),

        "fetch" | "f" | "refresh" => Command::Fetch,
        "next" | "n" => Command::Next,
        "prev" | "previous" | "p" => Command::Prev,

        "export" | "x" => Command::Export(args),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,

        _ => Command::Unknown(input.to_string()),
    }
}
