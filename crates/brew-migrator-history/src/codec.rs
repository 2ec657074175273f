use brew_migrator_core::{History, MigrationRecord, MigrationStatus};

pub(crate) const FIELD_SEPARATOR: char = ':';

/// Parses `app:status:detail` lines. Only the first two separators split
/// fields, so `detail` may contain `:`. Lines that are not UTF-8, or do not
/// carry all three fields or a known status, are dropped on their own.
pub(crate) fn parse_history(raw: &[u8]) -> History {
    raw.split(|byte| *byte == b'\n')
        .filter_map(|line| std::str::from_utf8(line).ok())
        .filter_map(parse_history_line)
        .collect()
}

pub(crate) fn parse_history_line(line: &str) -> Option<(String, MigrationRecord)> {
    let line = line.trim_end_matches('\r');
    let mut fields = line.splitn(3, FIELD_SEPARATOR);
    let app = fields.next()?;
    let status = fields.next()?;
    let detail = fields.next()?;
    if app.is_empty() {
        return None;
    }

    let status = MigrationStatus::parse(status).ok()?;
    Some((
        decode_app_name(app),
        MigrationRecord {
            status,
            detail: detail.to_string(),
        },
    ))
}

pub(crate) fn format_history(history: &History) -> String {
    let mut payload = String::new();
    for (app, record) in history.iter() {
        payload.push_str(&format_history_line(app, record));
    }
    payload
}

pub(crate) fn format_history_line(app: &str, record: &MigrationRecord) -> String {
    format!(
        "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}\n",
        encode_app_name(app),
        record.status.as_str(),
        single_line(&record.detail)
    )
}

// Newlines would split a record in two.
fn single_line(detail: &str) -> String {
    detail.replace(['\r', '\n'], " ")
}

pub(crate) fn encode_app_name(app: &str) -> String {
    let mut encoded = String::with_capacity(app.len());
    for ch in app.chars() {
        match ch {
            '%' => encoded.push_str("%25"),
            FIELD_SEPARATOR => encoded.push_str("%3A"),
            _ => encoded.push(ch),
        }
    }
    encoded
}

pub(crate) fn decode_app_name(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(index) = rest.find('%') {
        decoded.push_str(&rest[..index]);
        let escape = &rest[index..];
        if escape.starts_with("%25") {
            decoded.push('%');
            rest = &escape[3..];
        } else if escape.starts_with("%3A") || escape.starts_with("%3a") {
            decoded.push(FIELD_SEPARATOR);
            rest = &escape[3..];
        } else {
            decoded.push('%');
            rest = &escape[1..];
        }
    }
    decoded.push_str(rest);
    decoded
}
