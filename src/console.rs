//! Console helpers for the single-turn chat prompt.

use std::io::{self, BufRead, Write};

/// Greeting printed before reading the user's query.
pub const INPUT_PROMPT: &str = "SUPPORT: What can I assist you with today?\nUSER: ";

/// Print the greeting to `out` and read one line from `input`.
///
/// The trailing line ending is stripped; nothing else is trimmed.
pub fn read_query<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<String> {
    out.write_all(INPUT_PROMPT.as_bytes())?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    Ok(line)
}

/// Format a reply for display.
pub fn format_output(response: &str) -> String {
    format!("SUPPORT: {}", response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_query_prints_prompt_and_strips_newline() {
        let mut input = Cursor::new("  Where is my order?\r\nignored\n");
        let mut out = Vec::new();

        let query = read_query(&mut input, &mut out).unwrap();

        assert_eq!(query, "  Where is my order?");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "SUPPORT: What can I assist you with today?\nUSER: "
        );
    }

    #[test]
    fn test_read_query_at_eof() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        assert_eq!(read_query(&mut input, &mut out).unwrap(), "");
    }

    #[test]
    fn test_format_output() {
        assert_eq!(format_output("Hi there"), "SUPPORT: Hi there");
    }
}
