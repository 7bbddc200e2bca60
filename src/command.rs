// @file command.rs
// @brief line commands for the interactive mode

use anyhow::{Result, anyhow};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Toggle(String),
    Set(String, bool),
    SelectAll,
    ClearAll,
    /// pointer position in longitude / latitude
    Hover(f64, f64),
    PointerOut,
    Render(Option<PathBuf>),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  toggle COLOR    flip one fur color
  on COLOR        select one fur color
  off COLOR       deselect one fur color
  all             select all
  none            clear all
  hover LON LAT   show the tooltip at a location
  out             hide the tooltip
  render [FILE]   write the chart (default: the output file)
  status          print the current selection
  quit";

fn parse_f64(s: &str) -> Result<f64> {
    s.parse::<f64>().map_err(|_| anyhow!("not a number: {s:?}"))
}

/// Parses one line; `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let name = || {
        if rest.is_empty() {
            Err(anyhow!("{head}: missing fur color"))
        } else {
            Ok(rest.to_string())
        }
    };
    let cmd = match head {
        "toggle" => Command::Toggle(name()?),
        "on" => Command::Set(name()?, true),
        "off" => Command::Set(name()?, false),
        "all" => Command::SelectAll,
        "none" => Command::ClearAll,
        "hover" => {
            let cols = rest.split(|c: char| c.is_whitespace() || c == ',').filter(|x| !x.is_empty()).collect::<Vec<_>>();
            if cols.len() != 2 {
                return Err(anyhow!("hover: expected LON LAT, got {rest:?}"));
            }
            Command::Hover(parse_f64(cols[0])?, parse_f64(cols[1])?)
        }
        "out" => Command::PointerOut,
        "render" => Command::Render((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(anyhow!("unknown command {head:?}; try \"help\"")),
    };
    Ok(Some(cmd))
}

/// Parses `LON,LAT`, as given to `--hover`.
pub fn parse_location(s: &str) -> Result<(f64, f64), String> {
    let (lon, lat) = s.split_once(',').ok_or_else(|| format!("expected LON,LAT, got {s:?}"))?;
    let lon = lon.trim().parse::<f64>().map_err(|e| format!("{lon:?}: {e}"))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| format!("{lat:?}: {e}"))?;
    Ok((lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("toggle Black").unwrap(), Some(Command::Toggle("Black".to_string())));
        assert_eq!(parse_command("  off  Gray ").unwrap(), Some(Command::Set("Gray".to_string(), false)));
        assert_eq!(parse_command("all").unwrap(), Some(Command::SelectAll));
        assert_eq!(parse_command("none").unwrap(), Some(Command::ClearAll));
        assert_eq!(parse_command("hover -73.97 40.78").unwrap(), Some(Command::Hover(-73.97, 40.78)));
        assert_eq!(parse_command("hover -73.97,40.78").unwrap(), Some(Command::Hover(-73.97, 40.78)));
        assert_eq!(parse_command("render").unwrap(), Some(Command::Render(None)));
        assert_eq!(
            parse_command("render out/b.svg").unwrap(),
            Some(Command::Render(Some(PathBuf::from("out/b.svg"))))
        );
        assert_eq!(parse_command("q").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("# comment").unwrap(), None);
        assert_eq!(parse_command("").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("hover 1").is_err());
        assert!(parse_command("hover a b").is_err());
        assert!(parse_command("jump").is_err());
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(parse_location("-73.97, 40.78"), Ok((-73.97, 40.78)));
        assert!(parse_location("-73.97").is_err());
        assert!(parse_location("x,1").is_err());
    }
}
