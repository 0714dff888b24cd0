//! Server-side HTML rendering
//!
//! Every value that did not originate in this module passes through
//! [`escape_html`] before it reaches the page.

use qms_core::{AdminView, Draft, TableView};
use qms_records::{ChangeType, Choice, DeviationType, RecordType, Severity};

pub const APP_TITLE: &str = "Pharmaceutical QMS (Quality Management System)";

/// Escape text for element content and quoted attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Banner above a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

impl Banner {
    fn render(&self) -> String {
        let (class, text) = match self {
            Banner::Success(text) => ("success", text),
            Banner::Error(text) => ("error", text),
        };
        format!(r#"<p class="{class}">{}</p>"#, escape_html(text))
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} - {APP_TITLE}</title></head>
<body>
<h1>{APP_TITLE}</h1>
<nav>{nav}</nav>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        nav = nav(),
    )
}

fn nav() -> String {
    let mut links: Vec<String> = RecordType::ALL
        .iter()
        .map(|rt| format!(r#"<a href="/{}">{}</a>"#, rt.slug(), rt.table_name()))
        .collect();
    links.push(r#"<a href="/admin">Admin View</a>"#.to_string());
    links.join(" | ")
}

/// Landing page
#[must_use]
pub fn index_page() -> String {
    layout("Home", "<p>Select a register above to file a record.</p>")
}

enum Input {
    Text,
    Area,
    Select(Vec<&'static str>),
}

struct Field<'a> {
    name: &'static str,
    label: &'static str,
    input: Input,
    value: &'a str,
}

impl<'a> Field<'a> {
    fn text(name: &'static str, label: &'static str, value: &'a str) -> Self {
        Field { name, label, input: Input::Text, value }
    }

    fn area(name: &'static str, label: &'static str, value: &'a str) -> Self {
        Field { name, label, input: Input::Area, value }
    }

    fn select<C: Choice>(name: &'static str, value: &'a str) -> Self {
        Field {
            name,
            label: C::FIELD,
            input: Input::Select(C::option_labels()),
            value,
        }
    }

    fn render(&self) -> String {
        let name = self.name;
        let value = escape_html(self.value);
        let control = match &self.input {
            Input::Text => format!(r#"<input type="text" id="{name}" name="{name}" value="{value}">"#),
            Input::Area => format!(r#"<textarea id="{name}" name="{name}">{value}</textarea>"#),
            Input::Select(options) => {
                let options: String = options
                    .iter()
                    .map(|opt| {
                        let selected = if opt.eq_ignore_ascii_case(self.value.trim()) {
                            " selected"
                        } else {
                            ""
                        };
                        format!(r#"<option value="{opt}"{selected}>{opt}</option>"#)
                    })
                    .collect();
                format!(r#"<select id="{name}" name="{name}">{options}</select>"#)
            }
        };
        format!(
            r#"<p><label for="{name}">{label}</label><br>{control}</p>"#,
            label = self.label
        )
    }
}

fn fields(draft: &Draft) -> Vec<Field<'_>> {
    match draft {
        Draft::Complaint(d) => vec![
            Field::text("product_name", "Product Name", &d.product_name),
            Field::select::<Severity>("severity", &d.severity),
            Field::text("contact_number", "Contact Number", &d.contact_number),
            Field::area("details", "Complaint Details", &d.details),
            Field::text("submitted_by", "Submitted By (Optional)", &d.submitted_by),
        ],
        Draft::Deviation(d) => vec![
            Field::text("department", "Responsible Department", &d.department),
            Field::select::<DeviationType>("deviation_type", &d.deviation_type),
            Field::area("details", "Deviation Details", &d.details),
            Field::text("reported_by", "Reported By", &d.reported_by),
        ],
        Draft::ChangeControl(d) => vec![
            Field::select::<ChangeType>("change_type", &d.change_type),
            Field::area("justification", "Justification for Change", &d.justification),
            Field::area("impact_analysis", "Impact Analysis", &d.impact_analysis),
            Field::text("requested_by", "Requested By", &d.requested_by),
        ],
    }
}

fn heading(record_type: RecordType) -> (&'static str, &'static str) {
    match record_type {
        RecordType::Complaint => ("Register a New Complaint", "Submit Complaint"),
        RecordType::Deviation => ("Register a New Deviation", "Submit Deviation"),
        RecordType::ChangeControl => ("Register a Change Request", "Submit Change Request"),
    }
}

/// Intake form, pre-filled from `draft`
#[must_use]
pub fn form_page(draft: &Draft, banner: Option<&Banner>) -> String {
    let record_type = draft.record_type();
    let (title, button) = heading(record_type);
    let id = escape_html(draft.id_text());
    let controls: String = fields(draft).iter().map(Field::render).collect();

    let body = format!(
        r#"<h2>{title}</h2>
{banner}
<form method="post" action="/{slug}">
<p>Record ID: <strong class="record-id">{id}</strong></p>
<input type="hidden" name="id" value="{id}">
{controls}
<button type="submit">{button}</button>
</form>"#,
        banner = banner.map(Banner::render).unwrap_or_default(),
        slug = record_type.slug(),
    );
    layout(title, &body)
}

/// Admin password prompt
#[must_use]
pub fn admin_login_page(banner: Option<&Banner>) -> String {
    let body = format!(
        r#"<h2>Admin Panel - View All Records</h2>
{banner}
<form method="post" action="/admin">
<p><label for="password">Enter Admin Password</label><br>
<input type="password" id="password" name="password"></p>
<button type="submit">Access Admin Panel</button>
</form>"#,
        banner = banner.map(Banner::render).unwrap_or_default(),
    );
    layout("Admin View", &body)
}

fn list_title(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Complaint => "Complaints List",
        RecordType::Deviation => "Deviation List",
        RecordType::ChangeControl => "Change Control List",
    }
}

fn render_table(view: &TableView) -> String {
    let title = list_title(view.record_type);
    if let Some(notice) = view.notice() {
        return format!(r#"<h3>{title}</h3><p class="info">{notice}</p>"#);
    }
    let row = |cells: &[String], tag: &str| -> String {
        let cells: String = cells
            .iter()
            .map(|c| format!("<{tag}>{}</{tag}>", escape_html(c)))
            .collect();
        format!("<tr>{cells}</tr>")
    };
    let body: String = view.rows.iter().map(|r| row(r, "td")).collect();
    format!(
        "<h3>{title}</h3><table><thead>{}</thead><tbody>{body}</tbody></table>",
        row(&view.headers, "th")
    )
}

/// Every stored record
#[must_use]
pub fn admin_view_page(view: &AdminView) -> String {
    let tables: String = view.tables.iter().map(render_table).collect();
    let body = format!(
        "<h2>Admin Panel - View All Records</h2>\n{}\n{tables}",
        Banner::Success("Access Granted! Viewing all records.".into()).render()
    );
    layout("Admin View", &body)
}

/// Failure page for errors the user cannot correct
#[must_use]
pub fn error_page(message: &str, reference: &str) -> String {
    let body = format!(
        r#"<h2>Something went wrong</h2>
<p class="error">{}</p>
<p>Reference: <code>{}</code></p>"#,
        escape_html(message),
        escape_html(reference),
    );
    layout("Error", &body)
}
