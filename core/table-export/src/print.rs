//! FILENAME: core/table-export/src/print.rs
//! Print-oriented HTML document.
//!
//! The document is self-contained: inline styles sized for the chosen paper
//! and orientation, an optional title/timestamp banner, the data table,
//! optional page-number footer markup, then any caller CSS.

use chrono::{DateTime, Utc};

use crate::options::PrintOptions;
use crate::pipeline::PreparedTable;

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn base_styles(options: &PrintOptions) -> String {
    format!(
        r#"@page {{ size: {size} {orientation}; margin: 15mm; }}
body {{ font-family: -apple-system, "Segoe UI", Roboto, Arial, sans-serif; font-size: 10pt; color: #111; margin: 0; }}
.print-header {{ margin-bottom: 12px; }}
.print-header h1 {{ font-size: 16pt; margin: 0 0 4px 0; }}
.print-timestamp {{ font-size: 9pt; color: #555; }}
table {{ width: 100%; border-collapse: collapse; }}
thead {{ display: table-header-group; }}
tr {{ page-break-inside: avoid; }}
th, td {{ border: 1px solid #ccc; padding: 4px 6px; text-align: left; vertical-align: top; }}
th {{ background: #f2f2f2; font-weight: 600; }}
tbody tr:nth-child(even) td {{ background: #fafafa; }}
.print-footer {{ position: fixed; bottom: 0; width: 100%; text-align: center; font-size: 8pt; color: #555; }}
.print-footer .page-number::after {{ content: "Page " counter(page); }}"#,
        size = options.paper_size.css_name(),
        orientation = options.orientation.css_name(),
    )
}

/// Renders the print document for a prepared table.
pub fn write_print_document(
    table: &PreparedTable,
    include_headers: bool,
    options: &PrintOptions,
    generated_at: DateTime<Utc>,
) -> String {
    let title = options.title.as_deref().unwrap_or("Export");
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(&base_styles(options));
    if !options.additional_css.is_empty() {
        html.push('\n');
        html.push_str(&options.additional_css);
    }
    html.push_str("\n</style>\n</head>\n<body>\n");

    if options.title.is_some() || options.show_timestamp {
        html.push_str("<div class=\"print-header\">\n");
        if let Some(title) = &options.title {
            html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
        }
        if options.show_timestamp {
            html.push_str(&format!(
                "<div class=\"print-timestamp\">Generated on {}</div>\n",
                generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str("<table>\n");
    if include_headers {
        html.push_str("<thead>\n<tr>");
        for header in &table.headers {
            html.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        html.push_str("</tr>\n</thead>\n");
    }
    html.push_str("<tbody>\n");
    for row in table.text_rows() {
        html.push_str("<tr>");
        for cell in &row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");

    if options.show_page_numbers {
        html.push_str("<div class=\"print-footer\"><span class=\"page-number\"></span></div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
