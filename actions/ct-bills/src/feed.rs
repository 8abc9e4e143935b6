//! Decoding of the legislature's comma-delimited data dumps.

use crate::error::Result;
use serde::de::DeserializeOwned;

/// Decode a headed, comma-delimited feed into typed rows.
///
/// Columns are matched to fields by header name, extra columns are ignored,
/// and every field is trimmed.
pub fn read_rows<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        code: String,
        name: String,
        #[serde(default)]
        note: String,
    }

    #[test]
    fn test_reads_by_header_and_ignores_extra_columns() {
        let text = "name,extra,code\n\"Judiciary, Joint\",x, JUD \nAging,y,AGE\n";
        let rows: Vec<Row> = read_rows(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "JUD");
        assert_eq!(rows[0].name, "Judiciary, Joint");
        assert_eq!(rows[0].note, "");
        assert_eq!(rows[1].code, "AGE");
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let text = "code\nJUD\n";
        let rows: Result<Vec<Row>> = read_rows(text);
        assert!(matches!(rows, Err(Error::Csv(_))));
    }
}
