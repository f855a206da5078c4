//! Test report parsing.
//!
//! Accepts JUnit XML (with or without the `<testsuites>` wrapper) and xUnit v2
//! XML, and produces the canonical [`ParsedReport`] tree.

mod junit;
mod text;
mod xunit;

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::ParsedReport;

pub use text::dedent;

/// Dialect decoders report failures as plain reasons; [`parse_report`] wraps them.
pub(crate) type DecodeResult<T> = Result<T, String>;

/// Name and byte offset of a document's first element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RootElement {
    pub name: String,
    pub offset: usize,
}

/// Find the first element of `xml`, skipping the prolog.
pub(crate) fn root_element(xml: &str) -> DecodeResult<Option<RootElement>> {
    let mut reader = Reader::from_str(xml);
    loop {
        let offset = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Ok(Some(RootElement { name, offset }));
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "malformed XML at byte {}: {}",
                    reader.error_position(),
                    e
                ));
            }
        }
    }
}

/// Supply the wrapper element a bare `<testsuite>` or `<assembly>` document omits.
///
/// The wrapper opens right before the first element so any prolog stays in front.
pub(crate) fn wrap_bare_root(xml: &str) -> DecodeResult<Cow<'_, str>> {
    let Some(root) = root_element(xml)? else {
        return Ok(Cow::Borrowed(xml));
    };

    let wrapper = match root.name.as_str() {
        "testsuite" => "testsuites",
        "assembly" => "assemblies",
        _ => return Ok(Cow::Borrowed(xml)),
    };

    let (prolog, body) = xml.split_at(root.offset);
    Ok(Cow::Owned(format!(
        "{prolog}<{wrapper}>{body}</{wrapper}>"
    )))
}

/// Decode raw report bytes of unknown dialect.
///
/// JUnit is tried first, then xUnit. Each decoder rejects documents whose root
/// is not its own, so a report is never half-decoded by the wrong one.
pub fn parse_report(bytes: &[u8]) -> AppResult<ParsedReport> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| AppError::InvalidFormat(format!("report is not valid UTF-8: {}", e)))?;
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

    if xml.trim().is_empty() {
        return Err(AppError::InvalidFormat("report is empty".to_string()));
    }

    let prepared = wrap_bare_root(xml).map_err(AppError::InvalidFormat)?;

    let junit_err = match junit::decode(&prepared) {
        Ok(report) => {
            debug!(suites = report.suites.len(), "Decoded JUnit report");
            return Ok(report);
        }
        Err(e) => e,
    };

    match xunit::decode(&prepared) {
        Ok(report) => {
            debug!(suites = report.suites.len(), "Decoded xUnit report");
            Ok(report)
        }
        Err(xunit_err) => Err(AppError::InvalidFormat(format!(
            "not a JUnit report ({}); not an xUnit report ({})",
            junit_err, xunit_err
        ))),
    }
}
