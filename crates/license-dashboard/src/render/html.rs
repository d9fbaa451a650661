//! HTML building blocks shared by the section renderers.

use std::fmt::Write;

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Single full-width placeholder row.
pub fn placeholder_row(columns: usize, message: &str) -> String {
    format!(
        "<tr><td colspan=\"{}\" class=\"text-center\">{}</td></tr>",
        columns,
        escape_html(message)
    )
}

/// One table cell. `content` must already be escaped.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    pub content: &'a str,
    pub class: Option<&'static str>,
}

impl<'a> Cell<'a> {
    pub fn text(content: &'a str) -> Self {
        Self {
            content,
            class: None,
        }
    }

    pub fn right(content: &'a str) -> Self {
        Self {
            content,
            class: Some("text-right"),
        }
    }
}

/// Render one `<tr>` from pre-escaped cells.
pub fn row(cells: &[Cell<'_>]) -> String {
    let mut out = String::from("<tr>");
    for cell in cells {
        // Writing to a String cannot fail.
        let _ = match cell.class {
            Some(class) => write!(out, "<td class=\"{}\">{}</td>", class, cell.content),
            None => write!(out, "<td>{}</td>", cell.content),
        };
    }
    out.push_str("</tr>");
    out
}

/// Table body for `items`: one row per item in input order, or the
/// placeholder when empty.
pub fn table_body<T, F>(items: &[T], columns: usize, empty_message: &str, render_row: F) -> String
where
    F: Fn(&T) -> String,
{
    if items.is_empty() {
        return placeholder_row(columns, empty_message);
    }

    items.iter().map(render_row).collect::<Vec<_>>().join("\n")
}
