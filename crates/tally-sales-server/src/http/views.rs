//! Server-rendered pages, written the same way the JSON handlers are:
//! plain `format!` into [`axum::response::Html`].

use tally_sales_query::SalePage;

pub(crate) fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn landing() -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Tally Sales</title></head><body>\
<h1>Tally Sales</h1>\
<p>Service is running. Version: <code>{}</code></p>\
<ul>\
<li><code>GET /api/search</code> - search page</li>\
<li><code>GET /api/sales?page=1&amp;perPage=20</code> - list sales</li>\
</ul>\
</body></html>",
        env!("CARGO_PKG_VERSION")
    )
}

pub(crate) fn search_form() -> String {
    // The form posts JSON so the body matches the API contract, and the
    // key input rides along as the API-Key header.
    "<!doctype html><html><head><meta charset=\"utf-8\"><title>Search Sales</title></head><body>\
<h1>Search Sales</h1>\
<form id=\"search\">\
<label>Page <input name=\"page\" type=\"number\" min=\"1\" value=\"1\"></label><br>\
<label>Per page <input name=\"perPage\" type=\"number\" min=\"1\" value=\"20\"></label><br>\
<label>Store location <input name=\"storeLocation\" type=\"text\"></label><br>\
<label>API key <input name=\"apiKey\" type=\"password\"></label><br>\
<button type=\"submit\">Search</button>\
</form>\
<script>\
document.getElementById('search').addEventListener('submit', async (event) => {\
  event.preventDefault();\
  const form = new FormData(event.target);\
  const response = await fetch('/api/search', {\
    method: 'POST',\
    headers: {'Content-Type': 'application/json', 'API-Key': form.get('apiKey')},\
    body: JSON.stringify({\
      page: Number(form.get('page')),\
      perPage: Number(form.get('perPage')),\
      storeLocation: form.get('storeLocation')\
    })\
  });\
  document.open();\
  document.write(await response.text());\
  document.close();\
});\
</script>\
</body></html>"
        .to_string()
}

pub(crate) fn results_page(page: &SalePage) -> String {
    let mut rows = String::new();
    for record in &page.data {
        let sale = &record.sale;
        let items = sale
            .items
            .iter()
            .map(|item| format!("{} x{} @ {}", html_escape(&item.name), item.quantity, item.price))
            .collect::<Vec<_>>()
            .join(", ");
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            record.id,
            sale.sale_date.to_rfc3339(),
            html_escape(&sale.store_location),
            items,
            html_escape(&sale.customer.email),
            if sale.coupon_used { "yes" } else { "no" },
            html_escape(&sale.purchase_method),
        ));
    }
    if rows.is_empty() {
        rows.push_str("<tr><td colspan=\"7\">No matching sales.</td></tr>");
    }
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Sales Results</title></head><body>\
<h1>Sales</h1>\
<table border=\"1\">\
<tr><th>Id</th><th>Date</th><th>Store</th><th>Items</th><th>Customer</th><th>Coupon</th><th>Method</th></tr>\
{rows}\
</table>\
<p>Page {} of {} &mdash; {} records</p>\
<p><a href=\"/api/search\">Back to search</a></p>\
</body></html>",
        page.current_page, page.total_pages, page.total_records
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            html_escape("<Store & \"Co\">"),
            "&lt;Store &amp; &quot;Co&quot;&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }
}
