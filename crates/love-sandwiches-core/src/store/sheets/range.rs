//! A1 notation and request URL helpers.

use reqwest::Url;

use crate::store::StoreError;

/// Converts a 1-based column index to its A1 letter (1 → A, 27 → AA).
pub fn column_letter(index: usize) -> Option<String> {
    if index == 0 {
        return None;
    }

    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).ok()
}

/// Quotes a worksheet title for use in a range, doubling embedded quotes.
pub fn quote_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Range covering one whole column of a worksheet, e.g. `'sales'!C:C`.
pub fn column_range(title: &str, index: usize) -> Option<String> {
    let letter = column_letter(index)?;
    Some(format!("{}!{}:{}", quote_sheet(title), letter, letter))
}

fn with_segments(base: &str, segments: &[&str]) -> Result<Url, StoreError> {
    let mut url = Url::parse(base)
        .map_err(|e| StoreError::Transport(format!("invalid API base '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::Transport(format!("API base '{}' cannot hold a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `{base}/spreadsheets/{id}/values/{range}{suffix}`; `suffix` is e.g. `:append`.
pub fn values_url(base: &str, spreadsheet_id: &str, range: &str, suffix: &str) -> Result<Url, StoreError> {
    let last = format!("{}{}", range, suffix);
    with_segments(base, &["spreadsheets", spreadsheet_id, "values", &last])
}

/// `{base}/files`, the Drive search endpoint.
pub fn drive_files_url(base: &str) -> Result<Url, StoreError> {
    with_segments(base, &["files"])
}

/// Drive search query for a spreadsheet by exact title.
pub fn drive_query(title: &str) -> String {
    let escaped = title.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false",
        escaped
    )
}
