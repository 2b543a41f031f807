//! Turns a single raw line (CR/LF already stripped) into a structured
//! IRC message. See RFC 2812 §2.3.1 for the grammar this is a subset of:
//!
//! ```text
//! message    =  [ ":" prefix SPACE ] command [ params ] crlf
//! prefix     =  servername / ( nickname [ [ "!" user ] "@" host ] )
//! command    =  1*letter / 3digit
//! params     =  *14( SPACE middle ) [ SPACE ":" trailing ]
//! ```
//!
//! The trailing marker is the *first* `SPACE ":"` after the command; an
//! empty line yields a message with an empty command, which the dispatcher
//! silently drops rather than treating as an error.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::multispace1,
    combinator::opt,
    multi::separated_list0,
    sequence::preceded,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
    pub trailing: Option<String>,
}

impl Message {
    /// Parses one line. Never fails: a malformed or empty line simply comes
    /// back with an empty `command`, which callers treat as a no-op.
    pub fn parse(line: &str) -> Message {
        let (rest, prefix) = parse_prefix(line).unwrap_or((line, None));

        let (before_trailing, trailing) = match rest.find(" :") {
            Some(idx) => (&rest[..idx], Some(rest[idx + 2..].to_string())),
            None => (rest, None),
        };

        let mut words = tokenize(before_trailing).into_iter();
        let command = words.next().unwrap_or_default().to_string();
        let params = words.map(str::to_string).collect();

        Message {
            prefix,
            command,
            params,
            trailing,
        }
    }
}

/// `[ ":" prefix SPACE ]` — consumes the colon, the prefix word, and the
/// single space that must follow it. If the prefix runs to the end of the
/// line with no following space, the whole remainder is the prefix and
/// there is no command (matches the reference parser's behavior).
fn parse_prefix(input: &str) -> IResult<&str, Option<String>> {
    let (rest, colon_prefix) =
        opt(preceded(tag(":"), take_while(|c: char| c != ' '))).parse(input)?;
    let Some(prefix) = colon_prefix else {
        return Ok((rest, None));
    };
    if rest.is_empty() {
        // No space after the prefix: nothing left to parse as a command.
        return Ok(("", Some(prefix.to_string())));
    }
    let (rest, _) = multispace1(rest)?;
    Ok((rest, Some(prefix.to_string())))
}

/// Splits on runs of spaces, the way `middle` params are delimited.
fn tokenize(input: &str) -> Vec<&str> {
    separated_list0(multispace1, take_while1(|c: char| c != ' '))
        .parse(input)
        .map(|(_, words)| words)
        .unwrap_or_default()
}
