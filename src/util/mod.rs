//! Utility functions: tracing, HTML escaping, view helpers.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

/// Initialize pretty CLI logging.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  fmt()
    .with_env_filter(filter)
    .with_target(false)
    .pretty()
    .init();
}

/// Minimal HTML escaping for user text interpolated into views. Quotes are
/// covered so escaped text is safe inside attribute values too.
pub fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
}

/// Render a UTC timestamp with a caller-supplied strftime pattern.
pub fn format_date(date: &DateTime<Utc>, pattern: &str) -> String {
  date.format(pattern).to_string()
}

/// Shorten `text` to at most `max_len` characters for previews. The cut is
/// pulled back to the last space so no word is split; with no usable space
/// the raw prefix is kept. Truncated output always ends in `...`.
pub fn truncate(text: &str, max_len: usize) -> String {
  let chars: Vec<char> = text.chars().collect();
  if chars.len() <= max_len {
    return text.to_string();
  }
  let prefix: String = chars[..max_len].iter().collect();
  let cut = match prefix.rfind(' ') {
    Some(pos) if pos > 0 => &prefix[..pos],
    _ => prefix.as_str(),
  };
  format!("{cut}...")
}

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<.*?>").expect("tag pattern"));

/// Drop anything that looks like an HTML tag, including tags spanning
/// lines. Best effort for previews, not a sanitizer; rendered text still
/// goes through `html_escape`.
pub fn strip_tags(input: &str) -> String {
  TAG.replace_all(input, "").into_owned()
}

/// Anchor markup linking to the edit page, shown only to the entry's owner.
/// `floating` picks the corner-of-the-card variant over the inline one.
pub fn edit_icon(owner: Uuid, viewer: Uuid, entry_id: Uuid, floating: bool) -> String {
  if owner != viewer {
    return String::new();
  }
  let class = if floating {
    "edit-icon floating"
  } else {
    "edit-icon"
  };
  format!(r##"<a href="/logs/edit/{entry_id}" class="{class}" title="Edit">&#9998;</a>"##)
}
