//! Turning raw input text into validated data rows.
//!
//! Two modes: a plain list of URLs (one per line) and header-based CSV.
//! Rows are never dropped here — validation problems are recorded on the
//! row so the export stage can skip and report them.

use crate::types::Result;
use card_layout::DataRow;
use std::collections::HashMap;

/// CSV ingestion settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    pub payload_column: String,
    pub label_column: String,
    /// Label template with `{label}`, `{index}`, `{id}`/`{short}` and
    /// `{col:Header}` placeholders. The literal `"{label}"` means "use the
    /// label column as-is".
    pub label_template: String,
    pub allow_non_http: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            payload_column: "url".to_string(),
            label_column: "label".to_string(),
            label_template: "{label}".to_string(),
            allow_non_http: false,
        }
    }
}

/// One row per non-empty trimmed line. Labels default to the last path
/// segment of the URL.
pub fn rows_from_urls(text: &str, allow_non_http: bool) -> Vec<DataRow> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, url)| {
            let mut errors = Vec::new();
            if !is_valid_url(url, allow_non_http) {
                errors.push(format!("Invalid URL: {url}"));
            }
            DataRow {
                payload: url.to_string(),
                label: last_path_segment(url),
                index: i + 1,
                errors,
            }
        })
        .collect()
}

/// Parse header-based CSV into rows, selecting payload and label columns and
/// applying the label template.
pub fn rows_from_csv(text: &str, options: &CsvOptions) -> Result<Vec<DataRow>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let index = i + 1;
        let columns: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();

        let mut errors = Vec::new();
        let payload = columns
            .get(&options.payload_column)
            .cloned()
            .unwrap_or_default();
        if payload.is_empty() {
            errors.push(format!("Missing payload column: {}", options.payload_column));
        } else if !is_valid_url(&payload, options.allow_non_http) {
            errors.push(format!("Invalid URL: {payload}"));
        }

        let mut label = columns
            .get(&options.label_column)
            .cloned()
            .unwrap_or_default();
        let derived = last_path_segment(&payload);
        if label.is_empty() {
            label = derived.clone();
        }
        if !options.label_template.is_empty() && options.label_template != "{label}" {
            label = render_label_template(&options.label_template, &label, index, &derived, &columns);
        }

        rows.push(DataRow {
            payload,
            label,
            index,
            errors,
        });
    }

    Ok(rows)
}

pub fn valid_row_count(rows: &[DataRow]) -> usize {
    rows.iter().filter(|r| r.is_valid()).count()
}

/// Minimal scheme check: `scheme://rest`, http/https only unless other
/// schemes are explicitly allowed.
fn is_valid_url(value: &str, allow_non_http: bool) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };
    if scheme.is_empty() || rest.is_empty() {
        return false;
    }
    let scheme_ok = scheme
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return false;
    }
    allow_non_http || scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

/// The last non-empty path segment of a URL, with query and fragment
/// stripped; empty when the URL has no path.
fn last_path_segment(url: &str) -> String {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or("");
    let path = after_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or("");
    let mut segments = path.split('/');
    // first component is the host
    segments.next();
    segments
        .filter(|s| !s.is_empty())
        .next_back()
        .unwrap_or("")
        .to_string()
}

fn render_label_template(
    template: &str,
    label: &str,
    index: usize,
    derived: &str,
    columns: &HashMap<String, String>,
) -> String {
    let mut result = template
        .replace("{label}", label)
        .replace("{index}", &index.to_string())
        .replace("{id}", derived)
        .replace("{short}", derived);

    // {col:Header} placeholders
    while let Some(start) = result.find("{col:") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let end = start + end;
        let name = &result[start + 5..end];
        let value = columns.get(name).cloned().unwrap_or_default();
        result.replace_range(start..=end, &value);
    }

    result
}
