//! Command lines: `<operation>:<payload>`

use serde::Serialize;
use tracing::trace;

/// One command of a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// 1-based line number in the script
    pub line: usize,
    pub name: String,
    pub payload: String,
}

/// Split a line at its first `:` into trimmed `(name, payload)`.
///
/// Lines without a separator yield `None`.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (name, payload) = line.split_once(':')?;
    Some((name.trim(), payload.trim()))
}

/// Every command of a script, in order. Lines that are not commands are
/// skipped silently.
pub fn parse_script(text: &str) -> Vec<Command> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            if raw.trim().is_empty() {
                return None;
            }
            match parse_line(raw) {
                Some((name, payload)) => Some(Command {
                    line: i + 1,
                    name: name.to_string(),
                    payload: payload.to_string(),
                }),
                None => {
                    trace!(line = i + 1, "skipping line without operation separator");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("Dot product:(1,2);(3,4)"), Some(("Dot product", "(1,2);(3,4)")));
        assert_eq!(
            parse_line("  Vector arithmetic : +:2:(1,2);(3,4) "),
            Some(("Vector arithmetic", "+:2:(1,2);(3,4)"))
        );
        assert_eq!(parse_line("no separator here"), None);
        // Still a command; the empty name fails at lookup
        assert_eq!(parse_line(":(1,2)"), Some(("", "(1,2)")));
    }

    #[test]
    fn test_parse_script() {
        let script = "Dot product:(1,2);(3,4)\n\n   \njust a note\nDeterminant:[(1,0),(0,1)]\n";
        let commands = parse_script(script);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].line, 1);
        assert_eq!(commands[1].line, 5);
        assert_eq!(commands[1].name, "Determinant");
        assert_eq!(commands[1].payload, "[(1,0),(0,1)]");
    }

    #[test]
    fn test_empty_payload_is_still_a_command() {
        let commands = parse_script("Determinant:");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].payload, "");
    }
}
