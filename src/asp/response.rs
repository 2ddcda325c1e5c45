//! Protocol response encoding and decoding.

use std::fmt::{self, Write};

use thiserror::Error;

/// Error code sent for malformed requests.
pub const SYNTAX_ERROR_CODE: u32 = 107;
const SYNTAX_ERROR_MESSAGE: &str = "Invalid Syntax!";

/// First line of every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error(u32),
}

/// A header row and the data rows described by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A complete protocol response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    sections: Vec<Section>,
}

/// Reasons a body is not a valid protocol response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing trailer")]
    MissingTrailer,

    #[error("malformed trailer: {0:?}")]
    InvalidTrailer(String),

    #[error("trailer announces {announced}, content has {actual}")]
    TrailerMismatch { announced: usize, actual: usize },

    #[error("malformed status line: {0:?}")]
    InvalidStatus(String),

    #[error("line {0}: data row without header")]
    DataWithoutHeader(usize),

    #[error("line {line}: {actual} values for {expected} fields")]
    ArityMismatch { line: usize, expected: usize, actual: usize },

    #[error("line {0}: unknown row type")]
    UnknownRow(usize),
}

impl Response {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            sections: Vec::new(),
        }
    }

    pub fn error(code: u32) -> Self {
        Self {
            status: Status::Error(code),
            sections: Vec::new(),
        }
    }

    /// Canonical `Invalid Syntax!` response.
    pub fn syntax_error(asof: i64) -> Self {
        Self::error(SYNTAX_ERROR_CODE).section(
            ["asof", "err"],
            [asof.to_string(), SYNTAX_ERROR_MESSAGE.to_string()],
        )
    }

    /// Append a header row and a single data row of the same arity.
    pub fn section<const N: usize>(mut self, header: [&str; N], data: [String; N]) -> Self {
        self.sections.push(Section {
            header: header.iter().map(|f| f.to_string()).collect(),
            rows: vec![Vec::from(data)],
        });
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Encode with the trailer computed over the content.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        match self.status {
            Status::Ok => out.push('O'),
            Status::Error(code) => {
                let _ = write!(out, "E\t{}", code);
            }
        }
        out.push('\n');

        for section in &self.sections {
            write_row(&mut out, 'H', &section.header);
            for row in &section.rows {
                write_row(&mut out, 'D', row);
            }
        }

        let n = content_length(&out);
        let _ = write!(out, "$\t{}\t$", n);
        out
    }

    /// Decode a serialized response, checking structure and trailer.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        let (content, trailer) = match body.rfind('\n') {
            Some(idx) => body.split_at(idx + 1),
            None => return Err(ParseError::MissingTrailer),
        };

        let announced = trailer
            .strip_prefix("$\t")
            .and_then(|rest| rest.strip_suffix("\t$"))
            .ok_or(ParseError::MissingTrailer)?
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidTrailer(trailer.to_string()))?;
        let actual = content_length(content);
        if announced != actual {
            return Err(ParseError::TrailerMismatch { announced, actual });
        }

        let mut lines = content.split_terminator('\n');
        let status_line = lines.next().unwrap_or_default();
        let status = parse_status(status_line)?;

        let mut sections: Vec<Section> = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line_no = idx + 2;
            let mut fields = line.split('\t');
            match fields.next() {
                Some("H") => sections.push(Section {
                    header: fields.map(str::to_string).collect(),
                    rows: Vec::new(),
                }),
                Some("D") => {
                    let section = sections
                        .last_mut()
                        .ok_or(ParseError::DataWithoutHeader(line_no))?;
                    let values: Vec<String> = fields.map(str::to_string).collect();
                    if values.len() != section.header.len() {
                        return Err(ParseError::ArityMismatch {
                            line: line_no,
                            expected: section.header.len(),
                            actual: values.len(),
                        });
                    }
                    section.rows.push(values);
                }
                _ => return Err(ParseError::UnknownRow(line_no)),
            }
        }

        Ok(Self { status, sections })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn write_row(out: &mut String, kind: char, values: &[String]) {
    out.push(kind);
    for value in values {
        out.push('\t');
        out.push_str(value);
    }
    out.push('\n');
}

fn parse_status(line: &str) -> Result<Status, ParseError> {
    if line == "O" {
        return Ok(Status::Ok);
    }
    line.strip_prefix("E\t")
        .and_then(|code| code.parse().ok())
        .map(Status::Error)
        .ok_or_else(|| ParseError::InvalidStatus(line.to_string()))
}

/// Trailer value: content bytes without the tab and newline separators.
fn content_length(content: &str) -> usize {
    content.bytes().filter(|b| *b != b'\t' && *b != b'\n').count()
}
