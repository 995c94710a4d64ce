use std::io::Write;
use std::sync::Arc;

use super::column::Column;
use super::error::Result;

/// Caller-chosen file name with a `.csv` extension.
pub fn export_filename(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "export" } else { name };
    if name.to_ascii_lowercase().ends_with(".csv") {
        name.to_string()
    } else {
        format!("{name}.csv")
    }
}

/// Write a header row plus one record per row; returns the record count.
pub fn write_csv<'r, R: 'r, W: Write>(
    columns: &[Arc<dyn Column<R>>],
    rows: impl IntoIterator<Item = &'r R>,
    writer: W,
) -> Result<usize> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns.iter().map(|column| column.header()))?;
    let mut count = 0;
    for row in rows {
        out.write_record(columns.iter().map(|column| column.value(row).to_string()))?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::BaseColumn;
    use serde_json::{Value, json};

    #[test]
    fn appends_extension_once() {
        assert_eq!(export_filename("users"), "users.csv");
        assert_eq!(export_filename("Users.CSV"), "Users.CSV");
        assert_eq!(export_filename("  "), "export.csv");
    }

    #[test]
    fn writes_headers_and_quotes_commas() {
        let columns: Vec<Arc<dyn Column<Value>>> = vec![
            Arc::new(BaseColumn::json("name", "Name")),
            Arc::new(BaseColumn::json("city", "City")),
        ];
        let rows = [json!({ "name": "Ada", "city": "London, UK" })];
        let mut buffer = Vec::new();
        assert_eq!(write_csv(&columns, rows.iter(), &mut buffer).unwrap(), 1);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Name,City\nAda,\"London, UK\"\n"
        );
    }
}
