//! parse a task document: sections with a title line followed by `key: value` lines
//!
//! ```text
//! // find the root of a cubic
//! bisection
//! function: x^3 - 9x + 4
//! interval: 0; 1
//!
//! linear
//! matrix: 2; 1 | 1; 3
//! rhs: 3; 5
//! ```
//! The value is the rest of the line. Numeric values are split on `;`, matrix rows on `|`,
//! and every number may use `.` or `,` as decimal separator.
//! Comment lines start with //, # or %.
use crate::Utils::number_input::parse_real;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{alpha1, alphanumeric1, line_ending, not_line_ending, space0},
    combinator::{all_consuming, eof, map, map_opt, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, terminated},
};
use std::fmt;
use std::fs;
use std::path::Path;

/// Errors of reading and interpreting a task document
#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    Io(String),
    /// the line where parsing stopped
    Syntax { line: String },
    Empty,
    UnknownSection(String),
    UnknownKey { section: String, key: String },
    DuplicateKey { section: String, key: String },
    MissingKey { section: String, key: String },
    InvalidValue {
        section: String,
        key: String,
        value: String,
        expected: String,
    },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskError::Io(msg) => write!(f, "Cannot read task file: {}", msg),
            TaskError::Syntax { line } => write!(f, "Syntax error in task document at '{}'", line),
            TaskError::Empty => write!(f, "Task document has no sections"),
            TaskError::UnknownSection(title) => write!(
                f,
                "Unknown section '{}' (expected evaluate, bisection, scan or linear)",
                title
            ),
            TaskError::UnknownKey { section, key } => {
                write!(f, "Unknown key '{}' in section '{}'", key, section)
            }
            TaskError::DuplicateKey { section, key } => {
                write!(f, "Key '{}' is given twice in section '{}'", key, section)
            }
            TaskError::MissingKey { section, key } => {
                write!(f, "Section '{}' needs the key '{}'", section, key)
            }
            TaskError::InvalidValue {
                section,
                key,
                value,
                expected,
            } => write!(
                f,
                "Invalid value '{}' for '{}' in section '{}': expected {}",
                value, key, section, expected
            ),
        }
    }
}

impl std::error::Error for TaskError {}

/// one `key: value` line
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub entries: Vec<Entry>,
}

/// word characters, starting with a letter or underscore
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

fn end_of_line(input: &str) -> IResult<&str, &str> {
    alt((line_ending, eof)).parse(input)
}

/// a title stands alone on its line
fn parse_title(input: &str) -> IResult<&str, String> {
    terminated(delimited(space0, parse_identifier, space0), end_of_line).parse(input)
}

/// Parses a key-value pair, the value is the trimmed rest of the line
fn parse_key_value_pair(input: &str) -> IResult<&str, Entry> {
    let (input, (key, _, value, _)) = (
        delimited(space0, parse_identifier, space0),
        tag(":"),
        not_line_ending,
        end_of_line,
    )
        .parse(input)?;
    Ok((
        input,
        Entry {
            key,
            value: value.trim().to_string(),
        },
    ))
}

/// Parses a section with a title and at least one key-value pair
fn parse_section(input: &str) -> IResult<&str, Section> {
    let (input, (title, entries)) = (parse_title, many1(parse_key_value_pair)).parse(input)?;
    Ok((input, Section { title, entries }))
}

/// Filters out comment lines (starting with //, # or %) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into its sections, in document order
pub fn parse_document(input: &str) -> Result<Vec<Section>, TaskError> {
    let filtered = filter_comments(input);
    if filtered.is_empty() {
        return Err(TaskError::Empty);
    }
    // sections are read while they parse, the first line left over is the error position
    let (rest, sections) = many0(parse_section)
        .parse(filtered.as_str())
        .map_err(|_| TaskError::Syntax {
            line: String::new(),
        })?;
    if !rest.is_empty() {
        return Err(TaskError::Syntax {
            line: rest.lines().next().unwrap_or_default().trim().to_string(),
        });
    }
    Ok(sections)
}

pub fn parse_task_file(path: &Path) -> Result<Vec<Section>, TaskError> {
    let content = fs::read_to_string(path)
        .map_err(|e| TaskError::Io(format!("{}: {}", path.display(), e)))?;
    parse_document(&content)
}

/// one number, up to the next separator
fn parse_real_value(input: &str) -> IResult<&str, f64> {
    map_opt(take_till1(|c: char| c == ';' || c == '|'), parse_real).parse(input)
}

/// `1; 2,5; -3`
pub fn parse_real_list(input: &str) -> IResult<&str, Vec<f64>> {
    separated_list1(tag(";"), parse_real_value).parse(input)
}

/// `2; 1 | 1; 3`
pub fn parse_rows(input: &str) -> IResult<&str, Vec<Vec<f64>>> {
    separated_list1(tag("|"), parse_real_list).parse(input)
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn require(&self, key: &str) -> Result<&str, TaskError> {
        self.get(key).ok_or_else(|| TaskError::MissingKey {
            section: self.title.clone(),
            key: key.to_string(),
        })
    }

    /// every key must be one of `allowed` and appear once
    pub fn check_keys(&self, allowed: &[&str]) -> Result<(), TaskError> {
        for (i, entry) in self.entries.iter().enumerate() {
            if !allowed.contains(&entry.key.as_str()) {
                return Err(TaskError::UnknownKey {
                    section: self.title.clone(),
                    key: entry.key.clone(),
                });
            }
            if self.entries[..i].iter().any(|e| e.key == entry.key) {
                return Err(TaskError::DuplicateKey {
                    section: self.title.clone(),
                    key: entry.key.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn invalid(&self, key: &str, value: &str, expected: &str) -> TaskError {
        TaskError::InvalidValue {
            section: self.title.clone(),
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// the whole value parsed by `parser`, None if the key is absent
    fn typed<T, P>(&self, key: &str, parser: P, expected: &str) -> Result<Option<T>, TaskError>
    where
        P: FnMut(&str) -> IResult<&str, T>,
    {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        all_consuming(parser)
            .parse(value)
            .map(|(_, parsed)| Some(parsed))
            .map_err(|_| self.invalid(key, value, expected))
    }

    pub fn real(&self, key: &str) -> Result<Option<f64>, TaskError> {
        self.typed(key, parse_real_value, "a number")
    }

    pub fn reals(&self, key: &str) -> Result<Option<Vec<f64>>, TaskError> {
        self.typed(key, parse_real_list, "numbers separated by ';'")
    }

    pub fn rows(&self, key: &str) -> Result<Option<Vec<Vec<f64>>>, TaskError> {
        self.typed(
            key,
            parse_rows,
            "rows separated by '|' with numbers separated by ';'",
        )
    }

    pub fn count(&self, key: &str) -> Result<Option<usize>, TaskError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .parse::<usize>()
                .map(Some)
                .map_err(|_| self.invalid(key, value, "a non-negative integer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("bisection\nfunction: x").unwrap();
        assert_eq!(title, "bisection");
        assert_eq!(remaining, "function: x");
        let (remaining, title) = parse_title("  linear_2  ").unwrap();
        assert_eq!(title, "linear_2");
        assert_eq!(remaining, "");
        assert!(parse_title("function: x").is_err());
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, entry) = parse_key_value_pair("function : x^2 - 4  \nnext").unwrap();
        assert_eq!(entry.key, "function");
        assert_eq!(entry.value, "x^2 - 4");
        assert_eq!(remaining, "next");
        let (_, entry) = parse_key_value_pair("points:").unwrap();
        assert_eq!(entry.value, "");
    }

    #[test]
    fn test_filter_comments() {
        let filtered = filter_comments("// c\n# c\n% c\n\nevaluate\n  \npoints: 1");
        assert_eq!(filtered, "evaluate\npoints: 1");
    }
}
