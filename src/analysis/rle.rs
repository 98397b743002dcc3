//! RLE snapshot decoding - CXRLE headers and run-length-encoded bodies.
//!
//! A snapshot arrives as two header lines followed by a body string over
//! the alphabet `{digits, o, b, $, !}`. Headers are parsed once per
//! generation to size the unified board; bodies are decoded again during
//! the fill pass, so decoding is restartable by construction (the decoder
//! borrows an in-memory string and a fresh pass simply starts over).

use std::iter::Peekable;
use std::str::Chars;

use crate::schema::SnapshotGeometry;

/// Errors raised by malformed snapshot headers or bodies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Header line 1 carries no pos=<x>,<y> token")]
    MissingPos,
    #[error("Header line 2 is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("Header field `{field}` is not an integer: {value:?}")]
    InvalidNumber {
        field: &'static str,
        value: String,
    },
    #[error("Snapshot extent `{field}` is negative: {value}")]
    NegativeExtent { field: &'static str, value: i64 },
    #[error("Unrecognized body tag {0:?}")]
    UnexpectedTag(char),
    #[error("Body ends with a repeat count and no tag")]
    DanglingCount,
    #[error("Body repeat count overflows")]
    CountOverflow,
    #[error("Body run at row {row}, column {col} leaves the declared snapshot rectangle")]
    RunOutsideSnapshot { row: i64, col: i64 },
}

/// Parsed snapshot header: declared geometry plus the rule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub geometry: SnapshotGeometry,
    pub rule: String,
}

impl Header {
    /// Parse the two header lines of one snapshot.
    ///
    /// Line 1 must carry a `pos=<x>,<y>` token (Golly writes
    /// `#CXRLE Pos=...`; the qualifier is matched case-insensitively).
    /// Line 2 is `x = <W>, y = <H>, rule = <rule>`.
    pub fn parse(line1: &str, line2: &str) -> Result<Self, FormatError> {
        let offset = parse_pos(line1)?;
        let (width, height, rule) = parse_extents(line2)?;
        Ok(Self {
            geometry: SnapshotGeometry {
                offset,
                width,
                height,
            },
            rule,
        })
    }
}

/// Extract the `pos=<x>,<y>` offset from header line 1.
fn parse_pos(line: &str) -> Result<(i64, i64), FormatError> {
    for token in line.split_whitespace() {
        if token.len() > 4 && token.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("pos=")) {
            let value = &token[4..];
            let Some((x_str, y_str)) = value.split_once(',') else {
                return Err(FormatError::InvalidNumber {
                    field: "pos",
                    value: value.to_string(),
                });
            };
            let x = parse_int("pos", x_str)?;
            let y = parse_int("pos", y_str)?;
            return Ok((x, y));
        }
    }
    Err(FormatError::MissingPos)
}

/// Extract width, height, and the rule string from header line 2.
fn parse_extents(line: &str) -> Result<(i64, i64, String), FormatError> {
    let mut width = None;
    let mut height = None;
    let mut rule = None;
    for part in line.split(',') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "x" => width = Some(parse_int("x", value)?),
            "y" => height = Some(parse_int("y", value)?),
            "rule" => rule = Some(value.to_string()),
            _ => {}
        }
    }
    let width = width.ok_or(FormatError::MissingField("x"))?;
    let height = height.ok_or(FormatError::MissingField("y"))?;
    let rule = rule.ok_or(FormatError::MissingField("rule"))?;
    if width < 0 {
        return Err(FormatError::NegativeExtent {
            field: "x",
            value: width,
        });
    }
    if height < 0 {
        return Err(FormatError::NegativeExtent {
            field: "y",
            value: height,
        });
    }
    Ok((width, height, rule))
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, FormatError> {
    value.trim().parse().map_err(|_| FormatError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// One horizontal run of live cells, relative to the snapshot's own
/// top-left corner (row 0, column 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveRun {
    pub row: i64,
    pub col: i64,
    pub len: i64,
}

/// Decode a snapshot body into live-cell runs.
///
/// The iterator yields only `o` runs; `b` advances the column, `$` moves
/// the cursor to the left edge of a following row, and `!` (or end of
/// input) terminates the stream. Anything after `!` is ignored. ASCII
/// whitespace between tokens is skipped, so Golly's 70-column line
/// wrapping is transparent.
pub fn decode_body(body: &str) -> LiveRuns<'_> {
    LiveRuns {
        chars: body.chars().peekable(),
        row: 0,
        col: 0,
        done: false,
    }
}

/// Iterator over the live-cell runs of one snapshot body.
pub struct LiveRuns<'a> {
    chars: Peekable<Chars<'a>>,
    row: i64,
    col: i64,
    done: bool,
}

impl Iterator for LiveRuns<'_> {
    type Item = Result<LiveRun, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            while self
                .chars
                .peek()
                .is_some_and(|c| c.is_ascii_whitespace())
            {
                self.chars.next();
            }
            // End of input without `!` still ends the body cleanly.
            let Some(&first) = self.chars.peek() else {
                self.done = true;
                return None;
            };
            let count = if first.is_ascii_digit() {
                match self.read_count() {
                    Ok(count) => Some(count),
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                }
            } else {
                None
            };
            let Some(tag) = self.chars.next() else {
                self.done = true;
                return Some(Err(FormatError::DanglingCount));
            };
            let repeat = count.unwrap_or(1);
            match tag {
                'o' => {
                    let run = LiveRun {
                        row: self.row,
                        col: self.col,
                        len: repeat,
                    };
                    self.col = self.col.saturating_add(repeat);
                    if repeat > 0 {
                        return Some(Ok(run));
                    }
                }
                'b' => self.col = self.col.saturating_add(repeat),
                '$' => {
                    self.row = self.row.saturating_add(repeat);
                    self.col = 0;
                }
                '!' => {
                    self.done = true;
                    return None;
                }
                other => {
                    self.done = true;
                    return Some(Err(FormatError::UnexpectedTag(other)));
                }
            }
        }
    }
}

impl LiveRuns<'_> {
    /// Accumulate a multi-digit repeat count. A count split from its tag
    /// by whitespace or end of input is malformed.
    fn read_count(&mut self) -> Result<i64, FormatError> {
        let mut count: i64 = 0;
        while let Some(&c) = self.chars.peek() {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            self.chars.next();
            count = count
                .checked_mul(10)
                .and_then(|n| n.checked_add(i64::from(digit)))
                .ok_or(FormatError::CountOverflow)?;
        }
        match self.chars.peek() {
            Some(c) if !c.is_ascii_whitespace() => Ok(count),
            _ => Err(FormatError::DanglingCount),
        }
    }
}

/// Decode a body into the sorted list of live cells relative to the
/// snapshot's own rectangle. This is the canonical encoding used by the
/// cycle check: two snapshots with the same relative pattern produce the
/// same list regardless of where they sit on the global board.
pub fn decode_cells(body: &str) -> Result<Vec<(i64, i64)>, FormatError> {
    let mut cells = Vec::new();
    for run in decode_body(body) {
        let run = run?;
        for i in 0..run.len {
            cells.push((run.row, run.col + i));
        }
    }
    // Decode order is already row-major ascending, so the list is sorted.
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(body: &str) -> Vec<LiveRun> {
        decode_body(body).collect::<Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn test_header_parse() {
        let header = Header::parse(
            "#CXRLE Pos=-11,4 Gen=0",
            "x = 30, y = 20, rule = B3/S23",
        )
        .unwrap();
        assert_eq!(header.geometry.offset, (-11, 4));
        assert_eq!(header.geometry.width, 30);
        assert_eq!(header.geometry.height, 20);
        assert_eq!(header.rule, "B3/S23");
    }

    #[test]
    fn test_header_missing_pos() {
        let err = Header::parse("#CXRLE Gen=0", "x = 3, y = 1, rule = B3/S23");
        assert_eq!(err.unwrap_err(), FormatError::MissingPos);
    }

    #[test]
    fn test_header_missing_rule() {
        let err = Header::parse("#CXRLE Pos=0,0", "x = 3, y = 1");
        assert_eq!(err.unwrap_err(), FormatError::MissingField("rule"));
    }

    #[test]
    fn test_header_non_numeric_width() {
        let err = Header::parse("#CXRLE Pos=0,0", "x = wat, y = 1, rule = B3/S23");
        assert!(matches!(
            err.unwrap_err(),
            FormatError::InvalidNumber { field: "x", .. }
        ));
    }

    #[test]
    fn test_header_negative_extent() {
        let err = Header::parse("#CXRLE Pos=0,0", "x = -3, y = 1, rule = B3/S23");
        assert!(matches!(
            err.unwrap_err(),
            FormatError::NegativeExtent { field: "x", .. }
        ));
    }

    #[test]
    fn test_body_basic_runs() {
        assert_eq!(
            runs("3o2b o$o!"),
            vec![
                LiveRun { row: 0, col: 0, len: 3 },
                LiveRun { row: 0, col: 5, len: 1 },
                LiveRun { row: 1, col: 0, len: 1 },
            ]
        );
    }

    #[test]
    fn test_body_multi_digit_count() {
        assert_eq!(
            runs("12b34o!"),
            vec![LiveRun { row: 0, col: 12, len: 34 }]
        );
    }

    #[test]
    fn test_body_multi_row_skip() {
        // `3$` skips two blank rows.
        assert_eq!(
            runs("o3$o!"),
            vec![
                LiveRun { row: 0, col: 0, len: 1 },
                LiveRun { row: 3, col: 0, len: 1 },
            ]
        );
    }

    #[test]
    fn test_body_ignores_trailing_garbage_after_bang() {
        assert_eq!(runs("o!x y z"), vec![LiveRun { row: 0, col: 0, len: 1 }]);
    }

    #[test]
    fn test_body_without_terminator_ends_cleanly() {
        assert_eq!(runs("2o"), vec![LiveRun { row: 0, col: 0, len: 2 }]);
    }

    #[test]
    fn test_body_unexpected_tag() {
        let result: Result<Vec<_>, _> = decode_body("oxo!").collect();
        assert_eq!(result.unwrap_err(), FormatError::UnexpectedTag('x'));
    }

    #[test]
    fn test_body_dangling_count() {
        let result: Result<Vec<_>, _> = decode_body("2o3").collect();
        assert_eq!(result.unwrap_err(), FormatError::DanglingCount);
    }

    #[test]
    fn test_body_newlines_between_tokens() {
        assert_eq!(
            runs("2o\r\n2b\no!"),
            vec![
                LiveRun { row: 0, col: 0, len: 2 },
                LiveRun { row: 0, col: 4, len: 1 },
            ]
        );
    }

    #[test]
    fn test_decode_is_restartable() {
        let body = "2o$2o!";
        assert_eq!(runs(body), runs(body));
    }

    #[test]
    fn test_decode_cells_expands_runs() {
        assert_eq!(
            decode_cells("2o$bo!").unwrap(),
            vec![(0, 0), (0, 1), (1, 1)]
        );
    }

    #[test]
    fn test_decode_cells_empty_body() {
        assert!(decode_cells("!").unwrap().is_empty());
    }
}
