use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use super::engine::CalibrationEngine;
use super::error::{MalformedKind, ParseError};
use super::fit::FitType;
use super::source::read_calibration_source;

const DEFINITION_FIELDS: usize = 7;
const VARIABLE_FIELD_LENGTH: &str = "V";

/// One calibrated variable from an instrument file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationEntry {
    pub key: String,
    pub type_code: String,
    pub id: String,
    pub units: String,
    /// Field width in bytes; `None` for variable-length (`V`) fields.
    pub field_length: Option<usize>,
    pub data_type: String,
    pub coefficient_lines: usize,
    pub fit_type: FitType,
    pub coefficients: Vec<f64>,
}

/// Parsed calibration file, keyed by variable name.
///
/// Immutable once built; share it behind an `Arc` to calibrate frames from
/// several threads.
///
/// # Examples
/// ```
/// use seaframe_core::calibration::CalibrationCatalog;
///
/// let text = "\
/// ## ISUS calibration
/// NITRATE NONE 'uM' 4 BF 1 POLYU
/// 0.0 1.0
/// UV 200.61 'counts' 2 BU 0 COUNT
/// ";
/// let catalog: CalibrationCatalog = text.parse().unwrap();
/// assert_eq!(catalog.variable_names(), vec!["NITRATE", "UV_200.61"]);
/// assert_eq!(catalog.get("NITRATE").unwrap().units, "uM");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalibrationCatalog {
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    entries: BTreeMap<String, CalibrationEntry>,
}

impl CalibrationCatalog {
    /// Read and parse the calibration file at `location`: a filesystem path,
    /// a `file://` URL or an `http(s)://` URL.
    pub fn parse(location: &str) -> Result<Self, ParseError> {
        let text = read_calibration_source(location)?;
        let mut catalog: CalibrationCatalog = text.parse()?;
        catalog.location = Some(location.to_string());
        Ok(catalog)
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&CalibrationEntry> {
        self.entries.get(key)
    }

    /// Variable keys in sorted order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalibrationEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn engine(&self) -> CalibrationEngine<'_> {
        CalibrationEngine::new(self)
    }
}

impl FromStr for CalibrationCatalog {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parser = CatalogParser::default();
        for (index, line) in text.lines().enumerate() {
            parser.feed(index + 1, line)?;
        }
        parser.finish(text.lines().count())
    }
}

struct PendingEntry {
    entry: CalibrationEntry,
    remaining: usize,
}

#[derive(Default)]
struct CatalogParser {
    entries: BTreeMap<String, CalibrationEntry>,
    pending: Option<PendingEntry>,
}

impl CatalogParser {
    fn feed(&mut self, line_number: usize, raw: &str) -> Result<(), ParseError> {
        let line = raw.trim();
        match classify(line) {
            LineKind::Definition => {
                if let Some(pending) = self.pending.take() {
                    return Err(mismatch(line_number, &pending));
                }
                let entry = parse_definition(line_number, line)?;
                if entry.coefficient_lines == 0 {
                    self.entries.insert(entry.key.clone(), entry);
                } else {
                    let remaining = entry.coefficient_lines;
                    self.pending = Some(PendingEntry { entry, remaining });
                }
            }
            LineKind::Coefficients => {
                let Some(mut pending) = self.pending.take() else {
                    return Err(ParseError::Malformed {
                        line: line_number,
                        kind: MalformedKind::UnexpectedCoefficientLine,
                    });
                };
                pending
                    .entry
                    .coefficients
                    .extend(parse_coefficients(line_number, line)?);
                pending.remaining -= 1;
                if pending.remaining == 0 {
                    self.entries
                        .insert(pending.entry.key.clone(), pending.entry);
                } else {
                    self.pending = Some(pending);
                }
            }
            LineKind::Skipped => {}
        }
        Ok(())
    }

    fn finish(self, line_count: usize) -> Result<CalibrationCatalog, ParseError> {
        if let Some(pending) = self.pending {
            return Err(mismatch(line_count + 1, &pending));
        }
        Ok(CalibrationCatalog {
            location: None,
            entries: self.entries,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    Definition,
    Coefficients,
    Skipped,
}

fn classify(line: &str) -> LineKind {
    let bytes = line.as_bytes();
    let Some(&first) = bytes.first() else {
        return LineKind::Skipped;
    };
    if first.is_ascii_alphabetic() {
        return LineKind::Definition;
    }
    let mut rest = bytes;
    if matches!(first, b'+' | b'-') {
        rest = &rest[1..];
    }
    if rest.first() == Some(&b'.') {
        rest = &rest[1..];
    }
    match rest.first() {
        Some(b) if b.is_ascii_digit() => LineKind::Coefficients,
        _ => LineKind::Skipped,
    }
}

fn mismatch(line: usize, pending: &PendingEntry) -> ParseError {
    let declared = pending.entry.coefficient_lines;
    ParseError::Malformed {
        line,
        kind: MalformedKind::CoefficientLinesMismatch {
            key: pending.entry.key.clone(),
            declared,
            found: declared - pending.remaining,
        },
    }
}

fn parse_definition(line_number: usize, line: &str) -> Result<CalibrationEntry, ParseError> {
    let malformed = |kind| ParseError::Malformed {
        line: line_number,
        kind,
    };
    let fields = tokenize(line);
    if fields.len() < DEFINITION_FIELDS {
        return Err(malformed(MalformedKind::TooFewFields {
            found: fields.len(),
        }));
    }

    let type_code = fields[0].clone();
    let id = fields[1].clone();
    let units = fields[2].replace('\'', "");
    let field_length = if fields[3].eq_ignore_ascii_case(VARIABLE_FIELD_LENGTH) {
        None
    } else {
        Some(parse_count(&fields[3], "fieldLength").map_err(malformed)?)
    };
    let data_type = fields[4].clone();
    let coefficient_lines = parse_count(&fields[5], "coeffLines").map_err(malformed)?;
    let fit_type = match fields[6].parse::<FitType>() {
        Ok(fit) => fit,
        Err(never) => match never {},
    };
    let key = if id.eq_ignore_ascii_case("NONE") {
        type_code.clone()
    } else {
        format!("{type_code}_{id}")
    };

    Ok(CalibrationEntry {
        key,
        type_code,
        id,
        units,
        field_length,
        data_type,
        coefficient_lines,
        fit_type,
        coefficients: Vec::new(),
    })
}

fn parse_count(token: &str, field: &'static str) -> Result<usize, MalformedKind> {
    token.parse::<usize>().map_err(|_| MalformedKind::InvalidInteger {
        field,
        token: token.to_string(),
    })
}

fn parse_coefficients(line_number: usize, line: &str) -> Result<Vec<f64>, ParseError> {
    line.split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseError::Malformed {
                line: line_number,
                kind: MalformedKind::InvalidNumber {
                    token: token.to_string(),
                },
            }),
        })
        .collect()
}

/// Split a definition line on whitespace, keeping a single-quoted token
/// (possibly empty or containing spaces) together.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        if c == '\'' {
            token.push(c);
            chars.next();
            for c in chars.by_ref() {
                token.push(c);
                if c == '\'' {
                    break;
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::{CalibrationCatalog, LineKind, classify, tokenize};
    use crate::calibration::error::{MalformedKind, ParseError};
    use crate::calibration::fit::FitType;

    const ISUS_CAL: &str = "\
# Satlantic ISUS calibration
INSTRUMENT SATNLB '' 6 AS 0 NONE
SN 0265 '' 4 AS 0 NONE

NITRATE NONE 'uM' 4 BF 1 POLYU
0.0 1.0
T_LAMP NONE 'deg C' 4 BF 1 POLYU
-2.5 0.01
UV 200.61 'uW/cm^2' 2 BU 0 COUNT
UV 201.42 'uW/cm^2' 2 BU 0 COUNT
FIELD NONE '' V AS 0 DELIMITER
";

    #[test]
    fn parses_definitions_and_coefficients() {
        let catalog: CalibrationCatalog = ISUS_CAL.parse().unwrap();
        assert_eq!(catalog.len(), 7);
        let nitrate = catalog.get("NITRATE").unwrap();
        assert_eq!(nitrate.fit_type, FitType::PolyU);
        assert_eq!(nitrate.coefficients, vec![0.0, 1.0]);
        assert_eq!(nitrate.field_length, Some(4));
        let lamp = catalog.get("T_LAMP").unwrap();
        assert_eq!(lamp.units, "deg C");
        assert_eq!(lamp.coefficients, vec![-2.5, 0.01]);
        assert_eq!(catalog.get("SN_0265").unwrap().data_type, "AS");
        assert_eq!(catalog.get("FIELD").unwrap().field_length, None);
        assert!(catalog.location().is_none());
    }

    #[test]
    fn keys_are_sorted() {
        let catalog: CalibrationCatalog = ISUS_CAL.parse().unwrap();
        assert_eq!(
            catalog.variable_names(),
            vec![
                "FIELD",
                "INSTRUMENT_SATNLB",
                "NITRATE",
                "SN_0265",
                "T_LAMP",
                "UV_200.61",
                "UV_201.42"
            ]
        );
    }

    #[test]
    fn none_id_is_case_insensitive() {
        let catalog: CalibrationCatalog = "SV none 'V' 2 BU 0 COUNT\n".parse().unwrap();
        assert!(catalog.get("SV").is_some());
    }

    #[test]
    fn coefficients_may_span_lines() {
        let text = "AUX_1 NONE 'V' 2 BU 3 POLYU\n1.0\n2.0 3.0\n+4.0\n";
        let catalog: CalibrationCatalog = text.parse().unwrap();
        assert_eq!(
            catalog.get("AUX_1").unwrap().coefficients,
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn missing_coefficient_line_before_next_definition() {
        let text = "AUX_1 NONE 'V' 2 BU 3 POLYU\n1.0\n2.0\nAUX_2 NONE 'V' 2 BU 0 COUNT\n";
        let err = text.parse::<CalibrationCatalog>().unwrap_err();
        match err {
            ParseError::Malformed { line, kind } => {
                assert_eq!(line, 4);
                assert_eq!(
                    kind,
                    MalformedKind::CoefficientLinesMismatch {
                        key: "AUX_1".to_string(),
                        declared: 3,
                        found: 2
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_coefficient_line_at_end_of_input() {
        let text = "AUX_1 NONE 'V' 2 BU 3 POLYU\n1.0\n2.0\n";
        let err = text.parse::<CalibrationCatalog>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::Malformed {
                kind: MalformedKind::CoefficientLinesMismatch { found: 2, .. },
                ..
            }
        ));
        assert!(err.to_string().contains("declares 3 coefficient lines"));
    }

    #[test]
    fn non_numeric_coefficient_is_rejected() {
        let text = "AUX_1 NONE 'V' 2 BU 1 POLYU\n1.0 abc\n";
        let err = text.parse::<CalibrationCatalog>().unwrap_err();
        match err {
            ParseError::Malformed { line, kind } => {
                assert_eq!(line, 2);
                assert_eq!(
                    kind,
                    MalformedKind::InvalidNumber {
                        token: "abc".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        let text = "AUX_1 NONE 'V' 2 BU 1 POLYU\n1.0 NaN\n";
        assert!(text.parse::<CalibrationCatalog>().is_err());
    }

    #[test]
    fn definition_errors() {
        let err = "AUX_1 NONE 'V' 2 BU\n".parse::<CalibrationCatalog>().unwrap_err();
        assert!(err.to_string().contains("expected 7"));
        let err = "AUX_1 NONE 'V' 2 BU x POLYU\n"
            .parse::<CalibrationCatalog>()
            .unwrap_err();
        assert!(err.to_string().contains("coeffLines is not an integer"));
    }

    #[test]
    fn orphan_coefficient_line_is_rejected() {
        let err = "1.0 2.0\n".parse::<CalibrationCatalog>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::Malformed {
                line: 1,
                kind: MalformedKind::UnexpectedCoefficientLine
            }
        ));
    }

    #[test]
    fn later_definition_replaces_earlier() {
        let text = "SV NONE 'V' 2 BU 1 POLYU\n1.0\nSV NONE 'mV' 2 BU 0 COUNT\n";
        let catalog: CalibrationCatalog = text.parse().unwrap();
        let entry = catalog.get("SV").unwrap();
        assert_eq!(entry.units, "mV");
        assert_eq!(entry.fit_type, FitType::Count);
    }

    #[test]
    fn line_classification() {
        assert_eq!(classify(""), LineKind::Skipped);
        assert_eq!(classify("# note"), LineKind::Skipped);
        assert_eq!(classify("NITRATE NONE"), LineKind::Definition);
        assert_eq!(classify("3.5"), LineKind::Coefficients);
        assert_eq!(classify("-0.5 1"), LineKind::Coefficients);
        assert_eq!(classify(".5"), LineKind::Coefficients);
        assert_eq!(classify("-.5"), LineKind::Coefficients);
        assert_eq!(classify("- 5"), LineKind::Skipped);
        assert_eq!(classify("!!"), LineKind::Skipped);
    }

    #[test]
    fn tokenizer_keeps_quoted_units() {
        assert_eq!(
            tokenize("T_LAMP NONE 'deg C' 4 BF 1 POLYU"),
            vec!["T_LAMP", "NONE", "'deg C'", "4", "BF", "1", "POLYU"]
        );
        assert_eq!(tokenize("A  B\t''  C"), vec!["A", "B", "''", "C"]);
    }
}
