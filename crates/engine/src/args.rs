//! Command-line argument parsing for the touch shell
//
// touch_shell [--config PATH] [--replay SCRIPT.json] [-v|--verbose]

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Result of parsing command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub verbose: bool,
    /// Settings file to use instead of the one in the config directory
    pub config: Option<PathBuf>,
    /// Touch script to replay instead of opening a window
    pub replay: Option<PathBuf>,
    /// Unrecognised arguments, reported once logging is up
    pub ignored: Vec<String>,
}

/// Parse the process arguments.
pub fn parse_args() -> Result<ParsedArgs> {
    parse_args_from(std::env::args().skip(1))
}

pub fn parse_args_from<I, S>(args: I) -> Result<ParsedArgs>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = ParsedArgs::default();
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" | "--verbose" => parsed.verbose = true,
            "--config" => match args.next() {
                Some(path) => parsed.config = Some(PathBuf::from(path)),
                None => bail!("--config needs a path"),
            },
            "--replay" => match args.next() {
                Some(path) => parsed.replay = Some(PathBuf::from(path)),
                None => bail!("--replay needs a script path"),
            },
            other => parsed.ignored.push(other.to_owned()),
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args() {
        assert_eq!(parse_args_from(Vec::<String>::new()).unwrap(), ParsedArgs::default());
    }

    #[test]
    fn test_all_flags() {
        let parsed = parse_args_from(["--config", "shell.toml", "-v", "--replay", "pinch.json"]).unwrap();

        assert!(parsed.verbose);
        assert_eq!(parsed.config, Some(PathBuf::from("shell.toml")));
        assert_eq!(parsed.replay, Some(PathBuf::from("pinch.json")));
    }

    #[test]
    fn test_missing_value() {
        let result = parse_args_from(["--replay"]);
        assert!(result.unwrap_err().to_string().contains("--replay"));
    }

    #[test]
    fn test_unknown_arguments_are_ignored() {
        let parsed = parse_args_from(["--fullscreen", "--verbose", "extra"]).unwrap();
        assert!(parsed.verbose);
        assert_eq!(parsed.config, None);
        assert_eq!(parsed.ignored, vec!["--fullscreen", "extra"]);
    }
}
