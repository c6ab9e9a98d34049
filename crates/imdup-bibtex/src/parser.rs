//! BibTeX parser built on nom
//!
//! Parses entries directly into [`imdup_core::Record`]s. Entry types and
//! field names are kept as supplied; value-level conventions handled here:
//! - @string definitions and references, with # concatenation
//! - @preamble and @comment sections (consumed, not retained)
//! - % line comments between items
//! - Braced values with nested braces, quoted values, bare numbers
//!
//! Anything that fails to parse is skipped up to the next `@` and recorded
//! as a line-numbered [`ParseIssue`] so callers can surface it.

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
    IResult,
};

use imdup_core::Record;

/// A chunk of input the parser had to skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub line: u32,
    pub message: String,
}

/// Everything recovered from one BibTeX source
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<Record>,
    pub issues: Vec<ParseIssue>,
}

/// Parse a BibTeX string into records, recovering from malformed items.
pub fn parse(input: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let mut strings: HashMap<String, String> = HashMap::new();

    let mut remaining = input;
    let mut line = 1u32;

    while !remaining.is_empty() {
        let (rest, skipped) = skip_whitespace_and_comments(remaining);
        line += skipped.matches('\n').count() as u32;
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        if !remaining.starts_with('@') {
            // Stray text between items; skip to the next @ or end.
            match remaining.find('@') {
                Some(pos) => {
                    line += remaining[..pos].matches('\n').count() as u32;
                    remaining = &remaining[pos..];
                }
                None => break,
            }
            continue;
        }

        match parse_item(remaining, &strings) {
            Ok((rest, item)) => {
                let consumed = &remaining[..remaining.len() - rest.len()];
                line += consumed.matches('\n').count() as u32;
                match item {
                    Item::Record(record) => outcome.records.push(record),
                    Item::StringDef(name, value) => {
                        strings.insert(name, value);
                    }
                    Item::Skipped => {}
                }
                remaining = rest;
            }
            Err(_) => {
                outcome.issues.push(ParseIssue {
                    line,
                    message: "failed to parse entry".to_string(),
                });
                match remaining[1..].find('@') {
                    Some(pos) => {
                        line += remaining[..pos + 1].matches('\n').count() as u32;
                        remaining = &remaining[pos + 1..];
                    }
                    None => break,
                }
            }
        }
    }

    outcome
}

enum Item {
    Record(Record),
    StringDef(String, String),
    /// @comment or @preamble, consumed without retention
    Skipped,
}

fn skip_whitespace_and_comments(input: &str) -> (&str, &str) {
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
        } else if bytes[pos] == b'%' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
        } else {
            break;
        }
    }

    (&input[pos..], &input[..pos])
}

fn parse_item<'a>(input: &'a str, strings: &HashMap<String, String>) -> IResult<&'a str, Item> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, item_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match item_type.to_lowercase().as_str() {
        "string" => {
            let (rest, (name, value)) = parse_string_def(rest, strings)?;
            Ok((rest, Item::StringDef(name, value)))
        }
        "preamble" => {
            let (rest, _) = parse_preamble(rest, strings)?;
            Ok((rest, Item::Skipped))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, Item::Skipped))
        }
        _ => {
            let (rest, record) = parse_record_body(rest, item_type, strings)?;
            Ok((rest, Item::Record(record)))
        }
    }
}

fn parse_string_def<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, name) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_value(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    Ok((rest, (name.to_string(), value)))
}

fn parse_preamble<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_value(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    Ok((rest, value))
}

fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = braced_span(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

fn parse_record_body<'a>(
    input: &'a str,
    entry_type: &str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, Record> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;

    let (rest, key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:./+".contains(c))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(',')(rest)?;

    let mut record = Record::new(key, entry_type);

    let mut remaining = rest;
    loop {
        let (rest, _) = multispace0(remaining)?;
        if rest.starts_with('}') {
            remaining = rest;
            break;
        }

        match parse_field(rest, strings) {
            Ok((rest, (name, value))) => {
                record.add_field(name, value);
                let (rest, _) = multispace0(rest)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            // No further fields; let the closing brace check decide.
            Err(_) => break,
        }
    }

    let (rest, _) = multispace0(remaining)?;
    let (rest, _) = char('}')(rest)?;

    Ok((rest, record))
}

fn parse_field<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, name) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_value(rest, strings)?;

    Ok((rest, (name.to_string(), value)))
}

/// Parse a field value: braced, quoted, bare number, or @string reference,
/// possibly joined with `#`.
fn parse_value<'a>(input: &'a str, strings: &HashMap<String, String>) -> IResult<&'a str, String> {
    let mut result = String::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;
        let (rest, part) = alt((
            braced_value,
            quoted_value,
            map(take_while1(|c: char| c.is_ascii_digit()), str::to_string),
            map(
                take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                |name: &str| strings.get(name).cloned().unwrap_or_else(|| name.to_string()),
            ),
        ))(rest)?;

        result.push_str(&part);

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, result)),
        }
    }
}

fn braced_value(input: &str) -> IResult<&str, String> {
    let (rest, span) = braced_span(input)?;
    Ok((rest, span[1..span.len() - 1].to_string()))
}

/// Match a `{...}` span including nested braces, returning it with braces.
fn braced_span(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom_error(input));
    }

    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(nom_error(input))
}

fn quoted_value(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    if !matches!(chars.next(), Some((_, '"'))) {
        return Err(nom_error(input));
    }

    let mut result = String::new();
    let mut brace_depth = 0;

    while let Some((pos, c)) = chars.next() {
        match c {
            '"' if brace_depth == 0 => return Ok((&input[pos + 1..], result)),
            '{' => {
                brace_depth += 1;
                result.push('{');
            }
            '}' => {
                brace_depth -= 1;
                result.push('}');
            }
            '\\' => {
                result.push('\\');
                if let Some((_, escaped)) = chars.next() {
                    result.push(escaped);
                }
            }
            c => result.push(c),
        }
    }

    Err(nom_error(input))
}

fn nom_error(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char))
}
