//! Rendering of ranked results into a static report file.
//!
//! The output format follows the destination's extension:
//!
//! | extension       | renderer   |
//! |-----------------|------------|
//! | `.html`, `.htm` | [`html`]     |
//! | `.md`           | [`markdown`] |
//! | `.json`         | [`json`]     |

pub mod html;
pub mod json;
pub mod markdown;

use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};
use crate::rank;
use crate::schema::{AggregateStat, BenchReport};
use crate::OrderPolicy;

pub const DEFAULT_TITLE: &str = "Mappers battle Benchmark";
pub const DEFAULT_OUTPUT: &str = "Benchmark.html";

/// Cell text for a strategy that ran zero samples.
pub const NO_DATA: &str = "no data";

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub title: String,
    /// Mark the fastest strategy's row.
    pub highlight_fastest: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            highlight_fastest: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("html") | Some("htm") => Ok(ReportFormat::Html),
            Some("md") => Ok(ReportFormat::Markdown),
            Some("json") => Ok(ReportFormat::Json),
            _ => Err(BenchError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// One table row, already formatted for display.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub rank: String,
    pub name: String,
    pub ratio: String,
    pub mean: String,
    pub std_dev: String,
    pub median: String,
    pub allocated: String,
    pub samples: String,
    /// Set on the fastest measured strategy.
    pub fastest: bool,
    /// Set on strategies dropped from the ranking.
    pub excluded: bool,
}

pub const HEADERS: [&str; 8] = [
    "Rank",
    "Strategy",
    "Ratio",
    "Mean",
    "StdDev",
    "Median",
    "Allocated",
    "Samples",
];

impl Row {
    pub fn cells(&self) -> [&str; 8] {
        [
            &self.rank,
            &self.name,
            &self.ratio,
            &self.mean,
            &self.std_dev,
            &self.median,
            &self.allocated,
            &self.samples,
        ]
    }
}

pub fn format_ns(ns: f64) -> String {
    if ns >= 1e9 {
        format!("{:.3} s", ns / 1e9)
    } else if ns >= 1e6 {
        format!("{:.3} ms", ns / 1e6)
    } else if ns >= 1e3 {
        format!("{:.3} us", ns / 1e3)
    } else {
        format!("{ns:.2} ns")
    }
}

pub fn format_bytes(bytes: f64) -> String {
    if bytes >= 1_048_576.0 {
        format!("{:.2} MB", bytes / 1_048_576.0)
    } else if bytes >= 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else {
        format!("{bytes:.0} B")
    }
}

fn stat_row(report: &BenchReport, speed_rank: Option<usize>, stat: &AggregateStat) -> Row {
    let measured = stat.sample_count > 0;
    let cell = |value: String| if measured { value } else { NO_DATA.to_string() };

    Row {
        rank: speed_rank.map_or_else(|| "-".to_string(), |r| r.to_string()),
        name: stat.name.clone(),
        ratio: report
            .ratio(stat)
            .map(|r| format!("{r:.2}x"))
            .unwrap_or_else(|| NO_DATA.to_string()),
        mean: cell(format_ns(stat.mean_ns)),
        std_dev: cell(format_ns(stat.std_dev_ns)),
        median: cell(format_ns(stat.median_ns)),
        allocated: match stat.mean_allocated_bytes {
            Some(bytes) => cell(format_bytes(bytes)),
            None => "-".to_string(),
        },
        samples: stat.sample_count.to_string(),
        fastest: speed_rank == Some(1),
        excluded: false,
    }
}

/// Table rows: ranked stats first, then excluded strategies.
///
/// The rank column is the speed rank among measured strategies, whatever
/// order the report lists them in. Strategies without samples get `-`.
pub fn rows(report: &BenchReport) -> Vec<Row> {
    let measured: Vec<AggregateStat> = report
        .ranked
        .iter()
        .filter(|s| s.sample_count > 0)
        .cloned()
        .collect();
    let by_speed = rank::rank(&measured, OrderPolicy::FastestToSlowest);
    let speed_rank = |stat: &AggregateStat| {
        by_speed
            .iter()
            .position(|s| s.declared_index == stat.declared_index)
            .map(|p| p + 1)
    };

    let mut rows: Vec<Row> = report
        .ranked
        .iter()
        .map(|stat| stat_row(report, speed_rank(stat), stat))
        .collect();

    rows.extend(report.excluded.iter().map(|ex| Row {
        rank: "-".to_string(),
        name: ex.name.clone(),
        ratio: "excluded".to_string(),
        mean: "-".to_string(),
        std_dev: "-".to_string(),
        median: "-".to_string(),
        allocated: "-".to_string(),
        samples: "0".to_string(),
        fastest: false,
        excluded: true,
    }));

    rows
}

/// Plain-text table for logs and the terminal.
pub fn console_table(report: &BenchReport, options: &RenderOptions) -> String {
    let rows = rows(report);
    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 8]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };

    let mut out = format!("{}\n", options.title);
    out.push_str(&line(HEADERS));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("|-{}-|\n", rule.join("-|-")));
    for row in &rows {
        out.push_str(&line(row.cells()));
    }
    for ex in &report.excluded {
        out.push_str(&format!("excluded {}: {}\n", ex.name, ex.reason));
    }
    out
}

/// Write `report` to `path` in the format its extension names, overwriting
/// any existing file.
pub fn render(report: &BenchReport, path: &Path, options: &RenderOptions) -> Result<()> {
    render_as(report, path, ReportFormat::from_path(path)?, options)
}

/// Write `report` to `path` in an explicit format.
pub fn render_as(
    report: &BenchReport,
    path: &Path,
    format: ReportFormat,
    options: &RenderOptions,
) -> Result<()> {
    let body = match format {
        ReportFormat::Html => html::render(report, options),
        ReportFormat::Markdown => markdown::render(report, options),
        ReportFormat::Json => json::render(report, options)?,
    };

    fs::write(path, body).map_err(|source| BenchError::Render {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::schema::{ExcludedStrategy, RunMeta};
    use crate::OrderPolicy;
    use tempfile::tempdir;

    pub(crate) fn stat(name: &str, idx: usize, mean_ns: f64, samples: u64) -> AggregateStat {
        AggregateStat {
            name: name.to_string(),
            declared_index: idx,
            mean_ns,
            std_dev_ns: 1.0,
            median_ns: mean_ns,
            min_ns: mean_ns,
            max_ns: mean_ns,
            mean_allocated_bytes: Some(256.0),
            sample_count: samples,
            retries: 0,
        }
    }

    pub(crate) fn report(ranked: Vec<AggregateStat>, excluded: Vec<ExcludedStrategy>) -> BenchReport {
        BenchReport {
            run: RunMeta {
                schema_version: 1,
                bench_version: "test".to_string(),
                profile: "quick".to_string(),
                seed: 0,
                timestamp_utc: "unix:0".to_string(),
                git_sha: None,
                fixture_sha256: "00".to_string(),
                iters: 10,
                warmup_iters: 1,
                order: OrderPolicy::FastestToSlowest,
            },
            ranked,
            excluded,
        }
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ReportFormat::from_path(Path::new("a.HTML")).unwrap(), ReportFormat::Html);
        assert_eq!(ReportFormat::from_path(Path::new("a.md")).unwrap(), ReportFormat::Markdown);
        assert_eq!(ReportFormat::from_path(Path::new("a.json")).unwrap(), ReportFormat::Json);
        assert!(matches!(
            ReportFormat::from_path(Path::new("Benchmark.png")),
            Err(BenchError::UnsupportedFormat { .. })
        ));
        assert!(ReportFormat::from_path(Path::new("Benchmark")).is_err());
    }

    #[test]
    fn test_rows_ratio_and_fastest() {
        let r = report(vec![stat("fast", 2, 10.0, 5), stat("slow", 0, 25.0, 5)], vec![]);
        let rows = rows(&r);
        assert_eq!(rows[0].rank, "1");
        assert_eq!(rows[0].ratio, "1.00x");
        assert!(rows[0].fastest);
        assert_eq!(rows[1].ratio, "2.50x");
        assert!(!rows[1].fastest);
        assert_eq!(rows[1].allocated, "256 B");
    }

    #[test]
    fn test_rows_declared_order_keeps_speed_rank() {
        let ranked = rank::rank(
            &[stat("slow", 0, 90.0, 5), stat("fast", 1, 10.0, 5)],
            OrderPolicy::Declared,
        );
        let mut r = report(ranked, vec![]);
        r.run.order = OrderPolicy::Declared;

        let rows = rows(&r);
        assert_eq!(rows[0].name, "slow");
        assert_eq!(rows[0].rank, "2");
        assert_eq!(rows[0].ratio, "9.00x");
        assert!(!rows[0].fastest);
        assert_eq!(rows[1].name, "fast");
        assert_eq!(rows[1].rank, "1");
        assert!(rows[1].fastest);

        let md = markdown::render(&r, &RenderOptions::default());
        assert!(md.contains("| 2 | slow | 9.00x |"));
        assert!(md.contains("| **1** | **fast** | **1.00x** |"));
    }

    #[test]
    fn test_rows_unmeasured_have_no_rank() {
        let r = report(vec![stat("a", 0, 20.0, 5), stat("b", 1, 0.0, 0)], vec![]);
        let rows = rows(&r);
        assert_eq!(rows[0].rank, "1");
        assert_eq!(rows[1].rank, "-");
        assert!(!rows[1].fastest);
    }

    #[test]
    fn test_rows_no_data() {
        let r = report(vec![stat("a", 0, 0.0, 0), stat("b", 1, 0.0, 0)], vec![]);
        for row in rows(&r) {
            assert_eq!(row.mean, NO_DATA);
            assert_eq!(row.ratio, NO_DATA);
            assert_eq!(row.allocated, NO_DATA);
            assert!(!row.fastest);
        }
    }

    #[test]
    fn test_rows_list_excluded_last() {
        let excluded = ExcludedStrategy {
            name: "broken".to_string(),
            declared_index: 0,
            reason: "strategy `broken` failed: boom".to_string(),
            failures: 4,
        };
        let r = report(vec![stat("ok", 1, 10.0, 5)], vec![excluded]);
        let rows = rows(&r);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "broken");
        assert_eq!(rows[1].ratio, "excluded");
        assert!(rows[1].excluded);
    }

    #[test]
    fn test_console_table_alignment() {
        let r = report(vec![stat("manual", 0, 42.0, 5)], vec![]);
        let table = console_table(&r, &RenderOptions::default());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], DEFAULT_TITLE);
        assert_eq!(lines[1].len(), lines[3].len());
        assert!(lines[3].contains("42.00 ns"));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_ns(12.5), "12.50 ns");
        assert_eq!(format_ns(1_500.0), "1.500 us");
        assert_eq!(format_ns(2_000_000.0), "2.000 ms");
        assert_eq!(format_bytes(2048.0), "2.00 KB");
    }

    #[test]
    fn test_render_writes_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.md");
        std::fs::write(&path, "stale").unwrap();

        let r = report(vec![stat("manual", 0, 42.0, 5)], vec![]);
        render(&r, &path, &RenderOptions::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.contains("manual"));
    }

    #[test]
    fn test_render_unwritable_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("report.html");
        let r = report(vec![stat("manual", 0, 42.0, 5)], vec![]);
        let err = render(&r, &path, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, BenchError::Render { .. }));
        assert_eq!(r.ranked.len(), 1);
    }

    #[test]
    fn test_render_as_ignores_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.txt");
        let r = report(vec![stat("manual", 0, 42.0, 5)], vec![]);
        render_as(&r, &path, ReportFormat::Json, &RenderOptions::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["ranked"][0]["name"], "manual");
    }

    #[test]
    fn test_render_unsupported_format_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Benchmark.png");
        let r = report(vec![], vec![]);
        assert!(render(&r, &path, &RenderOptions::default()).is_err());
        assert!(!path.exists());
    }
}
