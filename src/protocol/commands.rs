//! Module `commands`
//!
//! Defines the registry command set, command results, and the line parser.

/// Represents a command parsed from a client line.
///
/// Commands that carry a JSON body keep it as the raw `String`; it is decoded
/// by the handler so decode errors can be reported to the client.
#[derive(Debug, PartialEq)]
pub enum Command {
    QUIT,
    LOGOUT,
    LIST,
    MIGRATE,
    REGISTER(String),                   // JSON registration
    LOGIN { email: String, password: String },
    AUTH(String),                       // Bearer token from a previous login
    GET(i32),
    UPDATE { id: i32, body: String },   // JSON partial update
    DELETE(i32),
    MALFORMED(String),                  // Known command with unusable arguments
    UNKNOWN,
}

impl Command {
    /// Command name for logging. Arguments are left out since they may carry secrets.
    pub fn name(&self) -> &'static str {
        match self {
            Command::QUIT => "QUIT",
            Command::LOGOUT => "LOGOUT",
            Command::LIST => "LIST",
            Command::MIGRATE => "MIGRATE",
            Command::REGISTER(_) => "REGISTER",
            Command::LOGIN { .. } => "LOGIN",
            Command::AUTH(_) => "AUTH",
            Command::GET(_) => "GET",
            Command::UPDATE { .. } => "UPDATE",
            Command::DELETE(_) => "DELETE",
            Command::MALFORMED(_) => "MALFORMED",
            Command::UNKNOWN => "UNKNOWN",
        }
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

fn split_first_word(input: &str) -> (&str, &str) {
    let mut parts = input.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();
    (first, rest)
}

fn parse_id(cmd: &str, arg: &str) -> Result<i32, Command> {
    arg.parse::<i32>()
        .map_err(|_| Command::MALFORMED(format!("{cmd} requires a numeric student id")))
}

/// Parses a raw line received from a client into the `Command` enum.
///
/// Returns `MALFORMED` when a known command is missing or has bad arguments.
pub fn parse_command(raw: &str) -> Command {
    let (cmd, arg) = split_first_word(raw.trim());
    let cmd = cmd.to_ascii_uppercase();

    match cmd.as_str() {
        "QUIT" | "Q" => Command::QUIT,
        "LOGOUT" => Command::LOGOUT,
        "LIST" => Command::LIST,
        "MIGRATE" => Command::MIGRATE,
        "REGISTER" if !arg.is_empty() => Command::REGISTER(arg.to_string()),
        "LOGIN" if !arg.is_empty() => {
            let (email, password) = split_first_word(arg);
            Command::LOGIN {
                email: email.to_string(),
                password: password.to_string(),
            }
        }
        "AUTH" if !arg.is_empty() => Command::AUTH(arg.to_string()),
        "GET" => parse_id("GET", arg).map_or_else(|e| e, Command::GET),
        "DELETE" => parse_id("DELETE", arg).map_or_else(|e| e, Command::DELETE),
        "UPDATE" => {
            let (id, body) = split_first_word(arg);
            match parse_id("UPDATE", id) {
                Ok(_) if body.is_empty() => {
                    Command::MALFORMED("UPDATE requires a JSON body".into())
                }
                Ok(id) => Command::UPDATE {
                    id,
                    body: body.to_string(),
                },
                Err(e) => e,
            }
        }
        "REGISTER" => Command::MALFORMED("REGISTER requires a JSON body".into()),
        "LOGIN" => Command::MALFORMED("LOGIN requires an email and password".into()),
        "AUTH" => Command::MALFORMED("AUTH requires a token".into()),
        _ => Command::UNKNOWN,
    }
}
