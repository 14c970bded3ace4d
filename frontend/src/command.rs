use clap::Parser;
use std::io::BufRead;

/// Reads lines from stdin until one parses as a `T` command. Parse errors and
/// help output are printed and the prompt repeats. Returns `None` once stdin
/// is closed.
pub fn read_input<T: clap::FromArgMatches + clap::Subcommand>() -> Option<T> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let line = match lines.next()? {
            Ok(line) => line,
            Err(_) => return None,
        };

        let parts = line.split_whitespace();
        if parts.clone().next().is_none() {
            continue;
        }

        match parse::<T>(parts) {
            Ok(command) => return Some(command),
            Err(err) => print!("{err}"),
        }
    }
}

/// Parses one command from already split words.
pub fn parse<'a, T: clap::FromArgMatches + clap::Subcommand>(
    parts: impl IntoIterator<Item = &'a str>,
) -> Result<T, clap::Error> {
    #[derive(Parser)]
    #[command(
        name = "",
        no_binary_name = true,
        disable_help_flag = true,
        disable_version_flag = true,
        next_line_help = false,
        help_template = "{usage-heading} {usage}\n{all-args}"
    )]
    struct Input<T: clap::FromArgMatches + clap::Subcommand> {
        #[command(subcommand)]
        command: T,
    }

    Input::<T>::try_parse_from(parts).map(|Input { command }| command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Subcommand;
    use xiangqi::location::Move;

    #[derive(Subcommand, Debug, PartialEq)]
    enum Command {
        #[command(alias = "p")]
        Play { mv: Move },
        Undo,
    }

    #[test]
    fn parses_moves_and_aliases() {
        let expected = Command::Play { mv: "b7e7".parse().unwrap() };
        assert_eq!(parse::<Command>(["play", "b7e7"]).unwrap(), expected);
        assert_eq!(parse::<Command>(["p", "b7e7"]).unwrap(), expected);
        assert_eq!(parse::<Command>(["undo"]).unwrap(), Command::Undo);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse::<Command>(["play", "z9z9"]).is_err());
        assert!(parse::<Command>(["fly"]).is_err());
    }
}
