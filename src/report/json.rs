use serde::Serialize;

use crate::error::Result;
use crate::report::RenderOptions;
use crate::schema::BenchReport;

#[derive(Serialize)]
struct TitledReport<'a> {
    title: &'a str,
    #[serde(flatten)]
    report: &'a BenchReport,
}

/// Pretty JSON of the full report, including run metadata.
pub fn render(report: &BenchReport, options: &RenderOptions) -> Result<String> {
    let titled = TitledReport {
        title: &options.title,
        report,
    };
    Ok(serde_json::to_string_pretty(&titled)?)
}
