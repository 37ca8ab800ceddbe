/// Formatter adapters for the run report
mod json_report_formatter;

pub use json_report_formatter::JsonReportFormatter;
