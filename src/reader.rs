//! Reading data sets from tabular sources.

use crate::error::Result;
use crate::model::{CellValue, DataSet, Record};
use crate::store::{Sheet, TabularStore};
use log::{debug, warn};

/// Turn a header cell into a placeholder key.
pub fn to_key(header: &CellValue) -> String {
    header.to_string().to_lowercase()
}

/// Read the data set and its display name from a tabular store.
///
/// Row 1 of the used range is the header row; its lower-cased cells become
/// record keys. Every following row up to the last populated one becomes a
/// record, in row order. A sheet with no data rows yields an empty data set.
pub fn read_data_set<T>(store: &T, sheet_id: &str) -> Result<(DataSet, String)>
where
    T: TabularStore + ?Sized,
{
    let sheet = store.open(sheet_id)?;
    let data = data_set_from_sheet(&sheet);
    debug!(
        "Read {} records with {} columns from '{}'",
        data.len(),
        data.headers.len(),
        sheet.name
    );
    Ok((data, sheet.name))
}

/// Build a data set from the used range of a sheet.
///
/// When two headers lower-case to the same key, the later column wins.
pub fn data_set_from_sheet(sheet: &Sheet) -> DataSet {
    let last_row = sheet.last_row();
    let last_column = sheet.last_column();
    if last_row == 0 {
        warn!("Sheet '{}' is empty", sheet.name);
        return DataSet::default();
    }

    let headers: Vec<String> = sheet
        .values(1, 1, 1, last_column)
        .into_iter()
        .next()
        .unwrap_or_default()
        .iter()
        .map(to_key)
        .collect();

    for (idx, key) in headers.iter().enumerate() {
        if headers[..idx].contains(key) {
            warn!(
                "Duplicate column '{}' in sheet '{}'; column {} wins",
                key,
                sheet.name,
                idx + 1
            );
        }
    }

    let records = if last_row < 2 {
        Vec::new()
    } else {
        sheet
            .values(2, 1, last_row - 1, last_column)
            .into_iter()
            .map(|row| headers.iter().cloned().zip(row).collect::<Record>())
            .collect()
    };

    DataSet::new(headers, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::MemoryTabularStore;

    fn store_with(rows: Vec<Vec<&str>>) -> MemoryTabularStore {
        let mut store = MemoryTabularStore::new();
        store.insert("sheet", Sheet::from_text_rows("Addresses", rows));
        store
    }

    #[test]
    fn test_read_data_set() {
        let store = store_with(vec![
            vec!["Name", "Address"],
            vec!["Jeroen", "Terlinden"],
            vec!["Ada", "London"],
        ]);

        let (data, name) = read_data_set(&store, "sheet").unwrap();
        assert_eq!(name, "Addresses");
        assert_eq!(data.headers, vec!["name".to_string(), "address".to_string()]);
        assert_eq!(data.len(), 2);
        assert_eq!(data.records[0].get("name"), Some(&CellValue::from("Jeroen")));
        assert_eq!(data.records[1].get("address"), Some(&CellValue::from("London")));
    }

    #[test]
    fn test_header_only_sheet() {
        let store = store_with(vec![vec!["Name", "Address"]]);
        let (data, _) = read_data_set(&store, "sheet").unwrap();
        assert!(data.is_empty());
        assert_eq!(data.headers.len(), 2);
    }

    #[test]
    fn test_empty_sheet() {
        let store = store_with(vec![]);
        let (data, name) = read_data_set(&store, "sheet").unwrap();
        assert!(data.is_empty());
        assert!(data.headers.is_empty());
        assert_eq!(name, "Addresses");
    }

    #[test]
    fn test_duplicate_headers_last_column_wins() {
        let store = store_with(vec![vec!["Name", "NAME"], vec!["first", "second"]]);
        let (data, _) = read_data_set(&store, "sheet").unwrap();
        assert_eq!(data.records[0].len(), 1);
        assert_eq!(data.records[0].get("name"), Some(&CellValue::from("second")));
    }

    #[test]
    fn test_short_rows_and_trailing_blanks() {
        let store = store_with(vec![
            vec!["a", "b", ""],
            vec!["1"],
            vec!["", "", ""],
            vec!["x", "y"],
            vec!["", ""],
        ]);
        let (data, _) = read_data_set(&store, "sheet").unwrap();

        // Blank rows inside the used range are records; trailing ones are not.
        assert_eq!(data.len(), 3);
        assert_eq!(data.records[0].get("b"), Some(&CellValue::Empty));
        assert!(data.records[1].iter().all(|(_, v)| v.is_empty()));
        assert_eq!(data.records[2].get("a"), Some(&CellValue::from("x")));
        assert_eq!(data.headers.len(), 2);
    }

    #[test]
    fn test_numeric_header_becomes_key() {
        let store = store_with(vec![vec!["2024", "Total"], vec!["a", "b"]]);
        let (data, _) = read_data_set(&store, "sheet").unwrap();
        assert_eq!(data.headers, vec!["2024".to_string(), "total".to_string()]);
    }

    #[test]
    fn test_missing_sheet() {
        let store = MemoryTabularStore::new();
        let result = read_data_set(&store, "missing");
        assert!(matches!(result, Err(Error::SheetNotFound(_))));
    }
}
