//! Static HTML table.

use crate::report::{rows, RenderOptions, HEADERS};
use crate::schema::BenchReport;

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:4px 10px;text-align:right}\
th:nth-child(2),td:nth-child(2){text-align:left}\
tr.fastest{background:#d9f2d9;font-weight:bold}\
tr.excluded{color:#999;font-style:italic}";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

pub fn render(report: &BenchReport, options: &RenderOptions) -> String {
    let title = escape(&options.title);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(&format!("<style>{STYLE}</style>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&format!(
        "<p>profile {} &middot; {} iterations &middot; {} warm-up &middot; seed {} &middot; fixture {}</p>\n",
        escape(&report.run.profile),
        report.run.iters,
        report.run.warmup_iters,
        report.run.seed,
        escape(&report.run.fixture_sha256),
    ));

    html.push_str("<table>\n<tr>");
    for header in HEADERS {
        html.push_str(&format!("<th>{header}</th>"));
    }
    html.push_str("</tr>\n");

    for row in rows(report) {
        let class = if row.excluded {
            " class=\"excluded\""
        } else if row.fastest && options.highlight_fastest {
            " class=\"fastest\""
        } else {
            ""
        };
        html.push_str(&format!("<tr{class}>"));
        for cell in row.cells() {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");

    if !report.excluded.is_empty() {
        html.push_str("<h2>Excluded</h2>\n<ul>\n");
        for ex in &report.excluded {
            html.push_str(&format!(
                "<li><strong>{}</strong>: {} ({} failures)</li>\n",
                escape(&ex.name),
                escape(&ex.reason),
                ex.failures
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
