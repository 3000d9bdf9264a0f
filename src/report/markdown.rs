//! Markdown table.

use crate::report::{rows, RenderOptions, HEADERS};
use crate::schema::BenchReport;

/// Keep user-supplied text inside one table cell or list line.
fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

pub fn render(report: &BenchReport, options: &RenderOptions) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", escape(&options.title)));
    md.push_str(&format!(
        "Profile `{}`, {} iterations, {} warm-up, seed {}, fixture `{}`\n\n",
        report.run.profile,
        report.run.iters,
        report.run.warmup_iters,
        report.run.seed,
        report.run.fixture_sha256
    ));

    md.push_str(&format!("| {} |\n", HEADERS.join(" | ")));
    md.push_str(&format!("|{}\n", "---|".repeat(HEADERS.len())));

    for row in rows(report) {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .map(|cell| {
                let cell = escape(cell);
                if row.fastest && options.highlight_fastest {
                    format!("**{cell}**")
                } else if row.excluded {
                    format!("_{cell}_")
                } else {
                    cell
                }
            })
            .collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    if !report.excluded.is_empty() {
        md.push_str("\n## Excluded\n\n");
        for ex in &report.excluded {
            md.push_str(&format!(
                "- **{}**: {} ({} failures)\n",
                escape(&ex.name),
                escape(&ex.reason),
                ex.failures
            ));
        }
    }

    md
}
