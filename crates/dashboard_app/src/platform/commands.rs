//! Line commands typed into the dashboard's stdin.

use dashboard_core::JobKey;

pub const USAGE: &str = "commands: refresh | discover <job> <namespace> | \
trigger <job> <namespace> <project> | logs <job> <namespace> <project> | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Discover { key: JobKey },
    Trigger { key: JobKey, project: String },
    Logs { key: JobKey, project: String },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}; type help")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(CommandError::Empty);
    };
    let args: Vec<&str> = words.collect();

    match verb.to_ascii_lowercase().as_str() {
        "refresh" | "r" => no_args(&args, Command::Refresh, "refresh"),
        "help" | "?" => no_args(&args, Command::Help, "help"),
        "quit" | "q" | "exit" => no_args(&args, Command::Quit, "quit"),
        "discover" => match args.as_slice() {
            [name, namespace] => Ok(Command::Discover {
                key: JobKey::new(*name, *namespace),
            }),
            _ => Err(CommandError::Usage("discover <job> <namespace>")),
        },
        "trigger" => match args.as_slice() {
            [name, namespace, project] => Ok(Command::Trigger {
                key: JobKey::new(*name, *namespace),
                project: project.to_string(),
            }),
            _ => Err(CommandError::Usage("trigger <job> <namespace> <project>")),
        },
        "logs" => match args.as_slice() {
            [name, namespace, project] => Ok(Command::Logs {
                key: JobKey::new(*name, *namespace),
                project: project.to_string(),
            }),
            _ => Err(CommandError::Usage("logs <job> <namespace> <project>")),
        },
        _ => Err(CommandError::Unknown(verb.to_string())),
    }
}

fn no_args(args: &[&str], command: Command, usage: &'static str) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage(usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_job_commands() {
        assert_eq!(
            parse("discover renovate ops"),
            Ok(Command::Discover {
                key: JobKey::new("renovate", "ops"),
            })
        );
        assert_eq!(
            parse("  trigger renovate ops group/api  "),
            Ok(Command::Trigger {
                key: JobKey::new("renovate", "ops"),
                project: "group/api".to_string(),
            })
        );
        assert_eq!(
            parse("LOGS renovate ops group/api"),
            Ok(Command::Logs {
                key: JobKey::new("renovate", "ops"),
                project: "group/api".to_string(),
            })
        );
    }

    #[test]
    fn parses_short_forms() {
        assert_eq!(parse("r"), Ok(Command::Refresh));
        assert_eq!(parse("q"), Ok(Command::Quit));
        assert_eq!(parse("?"), Ok(Command::Help));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(parse("   "), Err(CommandError::Empty));
        assert_eq!(
            parse("deploy everything"),
            Err(CommandError::Unknown("deploy".to_string()))
        );
        assert_eq!(
            parse("trigger renovate ops"),
            Err(CommandError::Usage("trigger <job> <namespace> <project>"))
        );
        assert_eq!(
            parse("refresh now"),
            Err(CommandError::Usage("refresh"))
        );
    }
}
