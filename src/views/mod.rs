//! Server-rendered HTML pages.
//!
//! Each public function is one named view: it takes the typed context it
//! needs and returns a complete page. Markup is assembled with the helpers
//! in `util`; user text goes through `html_escape` on the way in. The edit
//! form and the delete buttons submit PUT/DELETE through `fetch`, since
//! plain HTML forms only speak GET and POST.

use crate::{
  auth::CurrentUser,
  models::entry::{
    db_entry::{DbEntry, Visibility},
    entry_with_author::EntryWithAuthor,
  },
  util::{edit_icon, format_date, html_escape, strip_tags, truncate},
};
use axum::{
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};

const DATE_LONG: &str = "%B %e, %Y";
const DATE_SHORT: &str = "%Y-%m-%d %H:%M";
const PREVIEW_LEN: usize = 120;

const NAV_AUTHED: &str = concat!(
  r#"<a href="/logs">Public logs</a> <a href="/logs/add">Add</a> "#,
  r#"<a href="/dashboard">Dashboard</a> <a href="/auth/logout">Log out</a>"#
);
const NAV_GUEST: &str = r#"<a href="/">Log in</a>"#;

fn page(title: &str, nav: &str, main: &str) -> Html<String> {
  let tmpl = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>__TITLE__ | logbook</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
    nav { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
    nav a { text-decoration: none; }
    h1 { margin: 0 0 1rem 0; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; position: relative; }
    .card h2 { margin: 0 0 .25rem 0; font-size: 1.1rem; }
    .meta { color: #666; font-size: .85rem; margin-bottom: .5rem; }
    .badge { border-radius: 4px; padding: .1rem .4rem; font-size: .75rem; background: #e7f0fe; }
    .badge.private { background: #fde8e8; }
    .edit-icon.floating { position: absolute; top: .75rem; right: .75rem; }
    form label { display: block; margin: .75rem 0 .25rem; }
    input[type=text], textarea, select { width: 100%; padding: .4rem; box-sizing: border-box; }
    button { margin-top: 1rem; padding: .4rem 1rem; }
    .danger { color: #b00; }
    table { width: 100%; border-collapse: collapse; }
    th, td { border-bottom: 1px solid #ddd; text-align: left; padding: .5rem; }
  </style>
  <script>
    async function removeEntry(id) {
      if (!confirm('Delete this entry?')) return;
      await fetch('/logs/' + id, { method: 'DELETE' });
      window.location = '/dashboard';
    }
    async function submitEdit(ev) {
      ev.preventDefault();
      const form = ev.target;
      await fetch(form.getAttribute('action'), {
        method: 'PUT',
        headers: { 'Content-Type': 'application/x-www-form-urlencoded' },
        body: new URLSearchParams(new FormData(form)),
      });
      window.location = '/dashboard';
    }
  </script>
</head>
<body>
  <nav>__NAV__</nav>
  <h1>__TITLE__</h1>
  __MAIN__
</body>
</html>
"#;
  Html(
    tmpl
      .replace("__TITLE__", title)
      .replace("__NAV__", nav)
      .replace("__MAIN__", main),
  )
}

/// Shared title/visibility/body fields of the add and edit forms.
fn entry_fields(title: &str, body: &str, visibility: Visibility) -> String {
  let selected = |v: Visibility| if v == visibility { " selected" } else { "" };
  format!(
    r#"<label for="title">Title</label>
<input type="text" id="title" name="title" value="{title}" required />
<label for="visibility">Visibility</label>
<select id="visibility" name="visibility">
  <option value="public"{public_sel}>Public</option>
  <option value="private"{private_sel}>Private</option>
</select>
<label for="body">Body</label>
<textarea id="body" name="body" rows="8">{body}</textarea>"#,
    title = html_escape(title),
    body = html_escape(body),
    public_sel = selected(Visibility::Public),
    private_sel = selected(Visibility::Private),
  )
}

pub fn login_page() -> Html<String> {
  page(
    "Log in",
    NAV_GUEST,
    r#"<form method="post" action="/auth/login">
  <label for="name">Display name</label>
  <input type="text" id="name" name="name" required />
  <button type="submit">Log in</button>
</form>"#,
  )
}

pub fn add_page() -> Html<String> {
  let main = format!(
    r#"<form method="post" action="/logs">
{fields}
  <button type="submit">Save</button>
</form>"#,
    fields = entry_fields("", "", Visibility::Public),
  );
  page("Add log", NAV_AUTHED, &main)
}

/// The public feed. Bodies are stripped of markup and shortened for the
/// cards; owners get a floating edit icon on their own entries.
pub fn index_page(entries: &[EntryWithAuthor], viewer: &CurrentUser) -> Html<String> {
  let main = if entries.is_empty() {
    "<p>No public logs yet.</p>".to_string()
  } else {
    let mut cards = String::new();
    for entry in entries {
      let preview = truncate(&strip_tags(&entry.body), PREVIEW_LEN);
      cards.push_str(&format!(
        r#"<div class="card">
  {icon}
  <h2><a href="/logs/{id}">{title}</a></h2>
  <div class="meta">{author} &middot; {when}</div>
  <p>{preview}</p>
</div>
"#,
        icon = edit_icon(entry.user_id, viewer.id, entry.id, true),
        id = entry.id,
        title = html_escape(&entry.title),
        author = html_escape(&entry.author_name),
        when = format_date(&entry.created_at, DATE_LONG),
        preview = html_escape(&preview),
      ));
    }
    cards
  };
  page("Public logs", NAV_AUTHED, &main)
}

pub fn show_page(entry: &EntryWithAuthor, viewer: &CurrentUser) -> Html<String> {
  let main = format!(
    r#"<div class="meta">{author} &middot; {when} {icon}</div>
<div class="card"><p>{body}</p></div>"#,
    author = html_escape(&entry.author_name),
    when = format_date(&entry.created_at, DATE_LONG),
    icon = edit_icon(entry.user_id, viewer.id, entry.id, false),
    body = html_escape(&entry.body),
  );
  page(&html_escape(&entry.title), NAV_AUTHED, &main)
}

pub fn edit_page(entry: &EntryWithAuthor) -> Html<String> {
  let main = format!(
    r#"<form action="/logs/{id}" onsubmit="submitEdit(event)">
{fields}
  <button type="submit">Save changes</button>
  <button type="button" class="danger" onclick="removeEntry('{id}')">Delete</button>
</form>"#,
    id = entry.id,
    fields = entry_fields(&entry.title, &entry.body, entry.visibility),
  );
  page("Edit log", NAV_AUTHED, &main)
}

pub fn dashboard_page(viewer: &CurrentUser, entries: &[DbEntry]) -> Html<String> {
  let main = if entries.is_empty() {
    r#"<p>You have not written anything yet. <a href="/logs/add">Add your first log.</a></p>"#
      .to_string()
  } else {
    let mut rows = String::new();
    for entry in entries {
      rows.push_str(&format!(
        r##"<tr><td><a href="/logs/{id}">{title}</a></td><td>{when}</td><td><span class="badge {vis}">{vis}</span></td><td><a href="/logs/edit/{id}">Edit</a> <a href="#" class="danger" onclick="removeEntry('{id}'); return false">Delete</a></td></tr>
"##,
        id = entry.id,
        title = html_escape(&entry.title),
        when = format_date(&entry.created_at, DATE_SHORT),
        vis = entry.visibility.as_str(),
      ));
    }
    format!(
      "<table><thead><tr><th>Title</th><th>Created</th><th>Visibility</th><th></th></tr></thead><tbody>{rows}</tbody></table>"
    )
  };
  let title = format!("{}'s logbook", html_escape(&viewer.name));
  page(&title, NAV_AUTHED, &main)
}

/// Generic not-found page.
pub fn not_found() -> Response {
  (
    StatusCode::NOT_FOUND,
    page("Not found", NAV_AUTHED, "<p>That log does not exist.</p>"),
  )
    .into_response()
}

/// Generic failure page.
pub fn server_error() -> Response {
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    page(
      "Something went wrong",
      NAV_AUTHED,
      "<p>Please try again.</p>",
    ),
  )
    .into_response()
}
