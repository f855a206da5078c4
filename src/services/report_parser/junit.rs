//! JUnit decoder.
//!
//! Walks the event stream instead of going through serde: property bodies are
//! de-indented, which needs their text exactly as written.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::models::{CaseStatus, ParsedCase, ParsedProperty, ParsedReport, ParsedSuite};

use super::text::{dedent, lenient_f64, lenient_i32, normalize_newlines};
use super::{DecodeResult, root_element};

/// Decode a `<testsuites>` document.
pub fn decode(xml: &str) -> DecodeResult<ParsedReport> {
    let root = root_element(xml)?.ok_or("document has no root element")?;
    if root.name != "testsuites" {
        return Err(format!("root element is <{}>, expected <testsuites>", root.name));
    }

    let mut reader = Reader::from_str(xml);
    let mut report = ParsedReport::default();

    loop {
        match next_event(&mut reader)? {
            Event::Start(e) if e.name().as_ref() == b"testsuites" => break,
            Event::Empty(e) if e.name().as_ref() == b"testsuites" => return Ok(report),
            Event::Eof => return Err("unexpected end of document".to_string()),
            _ => {}
        }
    }

    loop {
        match next_event(&mut reader)? {
            Event::Start(e) if e.name().as_ref() == b"testsuite" => {
                let suite = suite_from_attributes(&e)?;
                report.suites.push(read_suite(&mut reader, suite)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"testsuite" => {
                report.suites.push(suite_from_attributes(&e)?);
            }
            Event::Start(e) => skip(&mut reader, &e)?,
            Event::End(_) => break,
            Event::Eof => return Err("unexpected end of document".to_string()),
            _ => {}
        }
    }

    Ok(report)
}

fn next_event<'a>(reader: &mut Reader<&'a [u8]>) -> DecodeResult<Event<'a>> {
    reader.read_event().map_err(|e| {
        format!(
            "malformed XML at byte {}: {}",
            reader.error_position(),
            e
        )
    })
}

fn skip(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> DecodeResult<()> {
    reader
        .read_to_end(start.name())
        .map(|_| ())
        .map_err(|e| format!("malformed XML: {}", e))
}

/// Collect the attributes of an element as `(name, value)` pairs.
fn attributes(element: &BytesStart<'_>) -> DecodeResult<Vec<(Vec<u8>, String)>> {
    let mut pairs = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| format!("malformed attribute: {}", e))?;
        let value = attr
            .unescape_value()
            .map_err(|e| format!("malformed attribute value: {}", e))?
            .into_owned();
        pairs.push((attr.key.as_ref().to_vec(), value));
    }
    Ok(pairs)
}

fn suite_from_attributes(element: &BytesStart<'_>) -> DecodeResult<ParsedSuite> {
    let mut suite = ParsedSuite::default();
    for (key, value) in attributes(element)? {
        match key.as_slice() {
            b"name" => suite.name = value,
            b"tests" => suite.tests = lenient_i32(&value),
            b"failures" => suite.failures = lenient_i32(&value),
            b"errors" => suite.errors = lenient_i32(&value),
            b"skipped" => suite.skipped = lenient_i32(&value),
            b"assertions" => suite.assertions = lenient_i32(&value),
            b"time" => suite.time = lenient_f64(&value),
            b"file" => suite.file = Some(value),
            _ => {}
        }
    }
    Ok(suite)
}

fn read_suite(reader: &mut Reader<&[u8]>, mut suite: ParsedSuite) -> DecodeResult<ParsedSuite> {
    loop {
        match next_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"properties" => suite.properties.extend(read_properties(reader)?),
                b"testcase" => {
                    let case = case_from_attributes(&e)?;
                    suite.cases.push(read_case(reader, case)?);
                }
                b"system-out" => suite.system_out = Some(read_text(reader)?),
                b"system-err" => suite.system_err = Some(read_text(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"testcase" => suite.cases.push(case_from_attributes(&e)?),
                b"system-out" => suite.system_out = Some(String::new()),
                b"system-err" => suite.system_err = Some(String::new()),
                _ => {}
            },
            Event::End(_) => return Ok(suite),
            Event::Eof => return Err("unexpected end of document".to_string()),
            _ => {}
        }
    }
}

fn case_from_attributes(element: &BytesStart<'_>) -> DecodeResult<ParsedCase> {
    let mut case = ParsedCase::default();
    for (key, value) in attributes(element)? {
        match key.as_slice() {
            b"classname" => case.classname = value,
            b"name" => case.name = value,
            b"time" => case.time = lenient_f64(&value),
            b"assertions" => case.assertions = lenient_i32(&value),
            b"file" => case.file = Some(value),
            b"line" => case.line = lenient_i32(&value),
            _ => {}
        }
    }
    Ok(case)
}

/// Outcome markers seen inside one `<testcase>`.
#[derive(Debug, Default)]
struct Markers {
    failure: Option<(String, String)>,
    error: Option<(String, String)>,
    skipped: Option<String>,
}

impl Markers {
    fn record(&mut self, element: &BytesStart<'_>) -> DecodeResult<()> {
        let mut message = String::new();
        let mut kind = String::new();
        for (key, value) in attributes(element)? {
            match key.as_slice() {
                b"message" => message = value,
                b"type" => kind = value,
                _ => {}
            }
        }

        match element.name().as_ref() {
            b"failure" if self.failure.is_none() => self.failure = Some((message, kind)),
            b"error" if self.error.is_none() => self.error = Some((message, kind)),
            b"skipped" if self.skipped.is_none() => self.skipped = Some(message),
            _ => {}
        }
        Ok(())
    }

    /// Apply the first matching marker: failure, then error, then skipped.
    fn apply(self, case: &mut ParsedCase) {
        if let Some((message, kind)) = self.failure {
            case.status = CaseStatus::Fail;
            case.message = Some(message);
            case.failure_type = Some(kind);
        } else if let Some((message, kind)) = self.error {
            case.status = CaseStatus::Error;
            case.message = Some(message);
            case.failure_type = Some(kind);
        } else if let Some(message) = self.skipped {
            case.status = CaseStatus::Skipped;
            case.message = Some(message);
            case.failure_type = None;
        } else {
            case.status = CaseStatus::Pass;
            case.message = None;
            case.failure_type = None;
        }
    }
}

fn is_marker(name: &[u8]) -> bool {
    matches!(name, b"failure" | b"error" | b"skipped")
}

fn read_case(reader: &mut Reader<&[u8]>, mut case: ParsedCase) -> DecodeResult<ParsedCase> {
    let mut markers = Markers::default();
    loop {
        match next_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                name if is_marker(name) => {
                    markers.record(&e)?;
                    skip(reader, &e)?;
                }
                b"properties" => case.properties.extend(read_properties(reader)?),
                b"system-out" => case.system_out = Some(read_text(reader)?),
                b"system-err" => case.system_err = Some(read_text(reader)?),
                _ => skip(reader, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                name if is_marker(name) => markers.record(&e)?,
                b"system-out" => case.system_out = Some(String::new()),
                b"system-err" => case.system_err = Some(String::new()),
                _ => {}
            },
            Event::End(_) => {
                markers.apply(&mut case);
                return Ok(case);
            }
            Event::Eof => return Err("unexpected end of document".to_string()),
            _ => {}
        }
    }
}

fn read_properties(reader: &mut Reader<&[u8]>) -> DecodeResult<Vec<ParsedProperty>> {
    let mut properties = Vec::new();
    loop {
        match next_event(reader)? {
            Event::Start(e) if e.name().as_ref() == b"property" => {
                let (name, value) = property_attributes(&e)?;
                let body = read_text(reader)?;
                properties.push(ParsedProperty::new(name, resolve_value(value, &body)));
            }
            Event::Empty(e) if e.name().as_ref() == b"property" => {
                let (name, value) = property_attributes(&e)?;
                properties.push(ParsedProperty::new(name, value));
            }
            Event::Start(e) => skip(reader, &e)?,
            Event::End(_) => return Ok(properties),
            Event::Eof => return Err("unexpected end of document".to_string()),
            _ => {}
        }
    }
}

fn property_attributes(element: &BytesStart<'_>) -> DecodeResult<(String, String)> {
    let mut name = String::new();
    let mut value = String::new();
    for (key, raw) in attributes(element)? {
        match key.as_slice() {
            b"name" => name = raw,
            b"value" => value = raw,
            _ => {}
        }
    }
    Ok((name, value))
}

/// The `value` attribute wins; an empty one falls back to the de-indented body.
fn resolve_value(value: String, body: &str) -> String {
    if value.is_empty() { dedent(body) } else { value }
}

/// Read the character data of the current element up to its end tag.
fn read_text(reader: &mut Reader<&[u8]>) -> DecodeResult<String> {
    let mut text = String::new();
    loop {
        match next_event(reader)? {
            Event::Text(t) => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| format!("malformed text content: {}", e))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Start(e) => skip(reader, &e)?,
            Event::End(_) => return Ok(normalize_newlines(&text)),
            Event::Eof => return Err("unexpected end of document".to_string()),
            _ => {}
        }
    }
}
