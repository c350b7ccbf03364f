use std::fmt::Write as _;

use chrono::NaiveDateTime;

use crate::pipeline::{IssuerIndex, LateFilingRecord};

/// Everything the renderer needs for one obligation's document.
#[derive(Debug)]
pub struct ReportContext<'a> {
    pub title: &'a str,
    pub records: &'a [LateFilingRecord],
    pub issuers: &'a IssuerIndex,
    pub population_size: usize,
    pub generated_at: NaiveDateTime,
}

/// Renders a standalone HTML document: a summary line and a table of name,
/// due date, and days late, with listed issuers highlighted. Rows appear in
/// pipeline order; sorting is left to the reader.
pub fn render_report(ctx: &ReportContext<'_>) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    writeln!(html, "<title>{}</title>", escape_html(ctx.title)).expect("write title");
    html.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2em; }\n\
         table { border-collapse: collapse; }\n\
         th, td { border: 1px solid #ccc; padding: 0.4em 0.8em; text-align: left; }\n\
         thead { background-color: #007bff; color: white; }\n\
         tr.highlighted { background-color: yellow; }\n\
         </style>\n",
    );
    html.push_str("</head>\n<body>\n");

    writeln!(html, "<h1>{}</h1>", escape_html(ctx.title)).expect("write heading");
    writeln!(
        html,
        "<p>Total late PLCs: {} (out of {} total PLCs). Data last updated: {}.</p>",
        ctx.records.len(),
        ctx.population_size,
        timestamp(ctx.generated_at)
    )
    .expect("write summary");

    html.push_str("<table>\n<thead>\n<tr><th>Name</th><th>Due Date</th><th>Days Late</th></tr>\n</thead>\n<tbody>\n");
    for record in ctx.records {
        let row_class = if ctx.issuers.is_listed(&record.name) {
            " class=\"highlighted\""
        } else {
            ""
        };
        writeln!(
            html,
            "<tr{}><td><a href=\"{}\" target=\"_blank\">{}</a></td><td>{}</td><td>{}</td></tr>",
            row_class,
            escape_html(&record.link),
            escape_html(&record.name),
            record.due_date,
            record.days_late
        )
        .expect("write row");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

    html
}

fn timestamp(generated_at: NaiveDateTime) -> String {
    generated_at
        .format("%-d %B %Y, %-I:%M%p")
        .to_string()
        .replace("AM", "am")
        .replace("PM", "pm")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuers::IssuerList;
    use chrono::NaiveDate;

    fn record(name: &str, days_late: i64) -> LateFilingRecord {
        LateFilingRecord {
            name: name.to_string(),
            link: format!("https://example.test/company/{name}"),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            days_late,
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(15, 4, 0)
            .unwrap()
    }

    fn index(names: &[&str]) -> IssuerIndex {
        IssuerIndex::from_lists(&[IssuerList {
            label: "test".to_string(),
            names: names.iter().map(|name| name.to_string()).collect(),
        }])
    }

    #[test]
    fn summary_line_reports_late_and_total_counts() {
        let records = vec![record("ALPHA PLC", 9)];
        let html = render_report(&ReportContext {
            title: "Late annual accounts",
            records: &records,
            issuers: &index(&[]),
            population_size: 4500,
            generated_at: generated_at(),
        });

        assert!(html.contains("Total late PLCs: 1 (out of 4500 total PLCs)"));
        assert!(html.contains("10 January 2024, 3:04pm"));
    }

    #[test]
    fn listed_issuers_are_highlighted_and_others_are_not() {
        let records = vec![record("ALPHA PLC", 9), record("BETA PLC", 3)];
        let html = render_report(&ReportContext {
            title: "Late annual accounts",
            records: &records,
            issuers: &index(&["ALPHA PLC"]),
            population_size: 2,
            generated_at: generated_at(),
        });

        let alpha_row = html
            .lines()
            .find(|line| line.contains("ALPHA PLC"))
            .expect("alpha row");
        let beta_row = html
            .lines()
            .find(|line| line.contains("BETA PLC"))
            .expect("beta row");
        assert!(alpha_row.contains("class=\"highlighted\""));
        assert!(!beta_row.contains("class=\"highlighted\""));
    }

    #[test]
    fn names_are_html_escaped() {
        let records = vec![record("EVIL <script> & CO PLC", 1)];
        let html = render_report(&ReportContext {
            title: "Late annual accounts",
            records: &records,
            issuers: &index(&[]),
            population_size: 1,
            generated_at: generated_at(),
        });

        assert!(html.contains("EVIL &lt;script&gt; &amp; CO PLC"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn rows_keep_pipeline_order() {
        let records = vec![record("ZULU PLC", 1), record("ALPHA PLC", 99)];
        let html = render_report(&ReportContext {
            title: "Late annual accounts",
            records: &records,
            issuers: &index(&[]),
            population_size: 2,
            generated_at: generated_at(),
        });

        let zulu = html.find("ZULU PLC").expect("zulu present");
        let alpha = html.find("ALPHA PLC").expect("alpha present");
        assert!(zulu < alpha);
    }
}
