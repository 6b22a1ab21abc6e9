use tracing::info;

use crate::domain::ttl::model::histogram_row::HistogramRow;
use crate::domain::ttl::model::schema_ttl_report::SchemaTtlReport;
use crate::domain::ttl::service::histogram_report_parser::parse_histogram_report;
use crate::domain::ttl::service::schema_ttl_extractor::{
    extract_schema_ttls, extract_write_ttls, SchemaMatchMode,
};
use crate::domain::ttl::service::text_decoder::decode_text;
use crate::errors::AppResult;

pub fn parse_schema_upload(bytes: &[u8], mode: SchemaMatchMode) -> AppResult<SchemaTtlReport> {
    let text = decode_text(bytes, "schema file")?;

    let report = SchemaTtlReport {
        tables: extract_schema_ttls(text, mode),
        write_overrides: extract_write_ttls(text),
    };

    if report.is_empty() {
        info!("No default_time_to_live settings found in uploaded schema");
    } else {
        info!(
            "Schema upload: {} TTL table(s), {} write override(s)",
            report.tables.len(),
            report.write_overrides.len()
        );
    }
    Ok(report)
}

pub fn parse_histogram_upload(bytes: &[u8]) -> AppResult<Vec<HistogramRow>> {
    let text = decode_text(bytes, "histogram report")?;
    let rows = parse_histogram_report(text);

    info!("Histogram upload: {} row(s)", rows.len());
    Ok(rows)
}
