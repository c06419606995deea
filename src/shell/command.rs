// src/shell/command.rs

//! Parsing of one line of operator input.

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `setdir [path]`; `None` means the current working directory.
    SetDir(Option<String>),
    Start,
    Stop,
    /// `ls [path]`; `None` means the current working directory.
    Ls(Option<String>),
    Cd(String),
    Clr,
    /// `help [cmd]` or `?[cmd]`.
    Help(Option<String>),
    Exit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if let Some(rest) = line.strip_prefix('?') {
            return Command::Help(non_empty(rest));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "setdir" => Command::SetDir(non_empty(rest)),
            "start" => Command::Start,
            "stop" => Command::Stop,
            "ls" => Command::Ls(non_empty(rest)),
            "cd" => Command::Cd(rest.to_string()),
            "clr" => Command::Clr,
            "help" => Command::Help(non_empty(rest)),
            "exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

pub const GENERAL_HELP: &str = "
    This program monitors a directory for TDMS telemetry produced by CNC
    machine runs. A recording is ready once both its data file and its
    index file are present.

    Commands:
      setdir <path>  : Set the directory to monitor for new TDMS files.
      start          : Start monitoring the set directory.
      stop           : Stop monitoring the directory.
      ls [path]      : List the contents of a directory.
      cd <path>      : Change the current directory.
      clr            : Clear the screen and display the logo and welcome message.
      exit           : Stop monitoring (if active) and exit the program.
      help or ?      : Show this help message.

    For detailed information about a command, type ?<command>
";

/// Detailed help for one command, if it exists.
pub fn command_help(name: &str) -> Option<&'static str> {
    let text = match name {
        "setdir" => {
            "
    Set the directory that will be monitored for new TDMS files.
    The path must be an existing, readable directory. If monitoring is
    active, it is stopped before the new directory is accepted.
    Without a path, the current working directory is used.

    Example usage:
        setdir /mnt/cnc/telemetry
        setdir
"
        }
        "start" => {
            "
    Start monitoring the directory that was set using the 'setdir' command.
    Sub-directories are not monitored.

    Example usage:
        start
"
        }
        "stop" => {
            "
    Stop monitoring the directory if monitoring is currently active.
    Blocks until the monitor has fully shut down.

    Example usage:
        stop
"
        }
        "ls" => {
            "
    List the contents of a directory with modification time and size.
    Without a path, the current directory is listed.

    Example usage:
        ls
        ls /mnt/cnc/telemetry
"
        }
        "cd" => {
            "
    Change the current directory.

    Example usage:
        cd /mnt/cnc
"
        }
        "clr" => {
            "
    Clear the terminal screen and redisplay the logo and welcome message.

    Example usage:
        clr
"
        }
        "exit" => {
            "
    Stop the directory monitoring (if active) and exit the program.

    Example usage:
        exit
"
        }
        "help" => {
            "
    Show the list of commands, or detailed help with 'help <command>'.
"
        }
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_and_without_arguments() {
        assert_eq!(Command::parse("start"), Command::Start);
        assert_eq!(Command::parse("  stop  "), Command::Stop);
        assert_eq!(Command::parse("setdir"), Command::SetDir(None));
        assert_eq!(
            Command::parse("setdir /mnt/cnc data"),
            Command::SetDir(Some("/mnt/cnc data".to_string()))
        );
        assert_eq!(Command::parse("ls"), Command::Ls(None));
        assert_eq!(Command::parse("cd /tmp"), Command::Cd("/tmp".to_string()));
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse(""), Command::Empty);
    }

    #[test]
    fn question_mark_is_help() {
        assert_eq!(Command::parse("?"), Command::Help(None));
        assert_eq!(Command::parse("?start"), Command::Help(Some("start".to_string())));
        assert_eq!(Command::parse("help stop"), Command::Help(Some("stop".to_string())));
    }

    #[test]
    fn unknown_words_are_kept() {
        assert_eq!(Command::parse("launch now"), Command::Unknown("launch".to_string()));
    }

    #[test]
    fn every_listed_command_has_detailed_help() {
        for name in ["setdir", "start", "stop", "ls", "cd", "clr", "exit", "help"] {
            assert!(command_help(name).is_some(), "missing help for {name}");
        }
        assert!(command_help("launch").is_none());
    }
}
