//! Server-side HTML for the shopping-list pages.
//!
//! Links and form targets are relative so the pages keep working under the
//! Home Assistant ingress prefix.

use crate::domain::model::{EnrichedItem, ItemListing};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 1rem; color: #1f2937; }}
        table {{ border-collapse: collapse; width: 100%; }}
        td, th {{ padding: .4rem; border-bottom: 1px solid #e5e7eb; text-align: left; }}
        .notice {{ background: #dbeafe; padding: .5rem; margin-bottom: .5rem; }}
        .warning {{ background: #fef3c7; padding: .5rem; margin-bottom: .5rem; }}
        .actions {{ display: flex; gap: .5rem; margin: .75rem 0; flex-wrap: wrap; }}
        iframe {{ width: 100%; height: 60vh; border: 1px solid #e5e7eb; }}
    </style>
</head>
<body>
{content}
</body>
</html>"#,
        title = text(title),
    )
}

fn flash(class: &str, message: &str) -> String {
    format!(r#"<div class="{class}">{}</div>"#, text(message))
}

fn toolbar(query: &str) -> String {
    format!(
        r#"<div class="actions">
    <a href="./import">Load shopping list</a>
    <form action="./search" method="get">
        <input type="search" name="q" value="{}" placeholder="Search online shops">
        <button type="submit">Search</button>
    </form>
    <form action="./delete_data" method="post" onsubmit="return confirm('Delete the whole shopping list?')">
        <button type="submit">Clear list</button>
    </form>
</div>"#,
        attr(query)
    )
}

fn item_row(item: &EnrichedItem) -> String {
    let product = if item.product_name.is_empty() {
        item.note.as_deref().unwrap_or("")
    } else {
        item.product_name.as_str()
    };

    format!(
        r#"<tr>
    <td><input type="checkbox" name="id" value="{id}" id="item-{id}"></td>
    <td><label for="item-{id}">{product}</label></td>
    <td>{quantity}</td>
    <td>{unit}</td>
</tr>"#,
        id = item.id,
        product = text(product),
        quantity = item.quantity,
        unit = text(&item.unit_name),
    )
}

fn item_table(items: &[EnrichedItem]) -> String {
    if items.is_empty() {
        return "<p>The shopping list is empty.</p>".to_string();
    }

    let rows: String = items.iter().map(item_row).collect();
    format!(
        r#"<form action="./delete" method="post">
<table>
    <thead><tr><th></th><th>Product</th><th>Amount</th><th>Unit</th></tr></thead>
    <tbody>
{rows}
    </tbody>
</table>
<div class="actions"><button type="submit">Delete selected</button></div>
</form>"#
    )
}

/// Landing page before anything has been loaded from Grocy.
pub fn landing_page(notice: Option<&str>) -> String {
    let notice_html = notice.map(|n| flash("notice", n)).unwrap_or_default();
    let content = format!(
        "<h1>Shopping list</h1>\n{notice_html}\n{}\n{}",
        toolbar(""),
        item_table(&[])
    );
    layout("Shopping list", &content)
}

/// Shopping list, with an optional external search frame below it.
pub fn list_page(listing: &ItemListing, notice: Option<&str>, search: Option<(&str, &str)>) -> String {
    let notice_html = notice.map(|n| flash("notice", n)).unwrap_or_default();
    let warnings: String = listing
        .issues
        .iter()
        .map(|issue| flash("warning", &issue.to_string()))
        .collect();

    let (query, search_html) = match search {
        Some((query, url)) => (
            query,
            format!(
                r#"<h2>Results for "{}"</h2>
<p><a href="{url}" target="_blank" rel="noopener">Open in a new tab</a></p>
<iframe src="{url}" title="Search results"></iframe>"#,
                text(query),
                url = attr(url),
            ),
        ),
        None => ("", String::new()),
    };

    let content = format!(
        "<h1>Shopping list</h1>\n{notice_html}\n{warnings}\n{}\n{}\n{search_html}",
        toolbar(query),
        item_table(&listing.items)
    );
    layout("Shopping list", &content)
}

pub fn login_page(error: Option<&str>) -> String {
    let error_html = error.map(|e| flash("warning", e)).unwrap_or_default();
    let content = format!(
        r#"<h1>Sign in</h1>
{error_html}
<form action="./login" method="post">
    <p><label>Username <input name="username" autocomplete="username" required></label></p>
    <p><label>Password <input name="password" type="password" autocomplete="current-password" required></label></p>
    <button type="submit">Sign in</button>
</form>"#
    );
    layout("Sign in", &content)
}
