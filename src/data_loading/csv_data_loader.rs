use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use tracing::debug;

use super::data_loader::{DataLoader, Dataset, DatasetSpec, FeatureMatrix};
use crate::error::{AnalysisError, Result};

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// CSV loader for the sensor table.
pub struct CsvDataLoader;

impl CsvDataLoader {
    pub fn new() -> Self {
        Self
    }

    fn parse_csv(&self, csv_text: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());

        let headers: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();

        let mut records = Vec::new();
        for record in rdr.records() {
            records.push(record?.iter().map(|v| v.to_string()).collect());
        }

        if records.is_empty() {
            return Err(AnalysisError::EmptyDataset);
        }

        Ok((headers, records))
    }

    fn column_index(headers: &[String], column: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| AnalysisError::MissingColumn {
                column: column.to_string(),
                available: headers.to_vec(),
            })
    }

    fn parse_numeric_value(val: &str) -> Option<f64> {
        let trimmed = val.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed
            .parse::<f64>()
            .or_else(|_| trimmed.replace(',', ".").parse::<f64>())
            .ok()
    }

    fn parse_required(val: &str, column: &str, row: usize) -> Result<f64> {
        Self::parse_numeric_value(val).ok_or_else(|| AnalysisError::InvalidValue {
            column: column.to_string(),
            row: row + 1,
            value: val.to_string(),
        })
    }

    fn parse_timestamp(val: &str, row: usize) -> Result<NaiveDateTime> {
        let trimmed = val.trim();
        for format in TIMESTAMP_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(ts);
            }
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(ts.naive_utc());
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| AnalysisError::InvalidTimestamp {
                row: row + 1,
                value: val.to_string(),
            })
    }
}

impl DataLoader for CsvDataLoader {
    fn get_name(&self) -> &str {
        "CSV Data Loader"
    }

    fn load_from_string(&self, data: &str, spec: &DatasetSpec) -> Result<Dataset> {
        self.validate_format(data)?;
        let (headers, records) = self.parse_csv(data)?;

        let index_idx = Self::column_index(&headers, &spec.index_column)?;
        let target_idx = Self::column_index(&headers, &spec.target_column)?;
        let feature_idx = spec
            .feature_columns
            .iter()
            .map(|c| Self::column_index(&headers, c))
            .collect::<Result<Vec<_>>>()?;

        let mut index = Vec::with_capacity(records.len());
        let mut x_rows = Vec::with_capacity(records.len());
        let mut y = Vec::with_capacity(records.len());

        for (row_idx, record) in records.iter().enumerate() {
            index.push(Self::parse_timestamp(&record[index_idx], row_idx)?);
            y.push(Self::parse_required(
                &record[target_idx],
                &spec.target_column,
                row_idx,
            )?);
            let row = feature_idx
                .iter()
                .zip(&spec.feature_columns)
                .map(|(&i, name)| Self::parse_required(&record[i], name, row_idx))
                .collect::<Result<Vec<_>>>()?;
            x_rows.push(row);
        }

        let mut numeric_columns = Vec::new();
        for (col_idx, header) in headers.iter().enumerate() {
            if col_idx == index_idx {
                continue;
            }
            let values: Option<Vec<f64>> = records
                .iter()
                .map(|r| Self::parse_numeric_value(&r[col_idx]))
                .collect();
            match values {
                Some(values) => numeric_columns.push((header.clone(), values)),
                None => debug!(column = %header, "skipping non-numeric column"),
            }
        }

        debug!(
            rows = records.len(),
            features = spec.feature_columns.len(),
            "parsed CSV"
        );

        Ok(Dataset {
            index,
            feature_names: spec.feature_columns.clone(),
            target_name: spec.target_column.clone(),
            x: FeatureMatrix::from_rows(x_rows)?,
            y,
            numeric_columns,
        })
    }

    fn validate_format(&self, data: &str) -> Result<()> {
        if data.trim().is_empty() || data.lines().count() < 2 {
            return Err(AnalysisError::EmptyDataset);
        }
        Ok(())
    }
}

impl Default for CsvDataLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
timestamp,q_cms,temp,DO_mgL,NO3_mgNL,DO_sat,spCond,dewPoint,note
2017-10-21 13:45:00,0.12,14.1,9.8,1.20,95.1,410,8.2,ok
2017-10-21 14:00:00,0.13,14.3,9.7,1.18,95.4,412,8.4,ok
2017-10-21 14:15:00,0.11,14.6,9.5,1.15,95.9,415,8.9,gust
";

    #[test]
    fn loads_selected_columns_in_spec_order() {
        let data = CsvDataLoader::new()
            .load_from_string(SAMPLE, &DatasetSpec::default())
            .unwrap();
        assert_eq!(data.num_samples(), 3);
        assert_eq!(data.num_features(), 5);
        assert_eq!(data.y, vec![14.1, 14.3, 14.6]);
        assert_eq!(data.x.rows()[0], vec![9.8, 1.20, 95.1, 410.0, 8.2]);
        assert_eq!(
            data.index[2],
            NaiveDateTime::parse_from_str("2017-10-21 14:15:00", "%Y-%m-%d %H:%M:%S").unwrap()
        );
    }

    #[test]
    fn numeric_columns_skip_index_and_text() {
        let data = CsvDataLoader::new()
            .load_from_string(SAMPLE, &DatasetSpec::default())
            .unwrap();
        let names: Vec<&str> = data.numeric_columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["q_cms", "temp", "DO_mgL", "NO3_mgNL", "DO_sat", "spCond", "dewPoint"]
        );
        assert_eq!(data.numeric_column("q_cms"), Some(&[0.12, 0.13, 0.11][..]));
    }

    #[test]
    fn missing_feature_column_is_an_error() {
        let spec = DatasetSpec {
            feature_columns: vec!["DO_mgL".into(), "turb".into()],
            ..DatasetSpec::default()
        };
        let err = CsvDataLoader::new().load_from_string(SAMPLE, &spec).unwrap_err();
        match err {
            AnalysisError::MissingColumn { column, available } => {
                assert_eq!(column, "turb");
                assert!(available.contains(&"temp".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_selected_cell_is_not_zero_filled() {
        let text = "timestamp,temp,DO_mgL,NO3_mgNL,DO_sat,spCond,dewPoint\n\
                    2017-10-21 13:45:00,14.1,,1.2,95.1,410,8.2\n";
        let err = CsvDataLoader::new()
            .load_from_string(text, &DatasetSpec::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidValue { ref column, row: 1, .. } if column == "DO_mgL"
        ));
    }

    #[test]
    fn decimal_comma_is_accepted() {
        let spec = DatasetSpec {
            feature_columns: vec!["DO_mgL".into()],
            ..DatasetSpec::default()
        };
        let text = "timestamp,temp,DO_mgL\n2017-10-21,\"14,5\",9\n";
        let data = CsvDataLoader::new().load_from_string(text, &spec).unwrap();
        assert_eq!(data.y, vec![14.5]);
    }

    #[test]
    fn bad_timestamp_is_reported_with_row() {
        let text = "timestamp,temp,DO_mgL\nyesterday,14.1,9.0\n";
        let spec = DatasetSpec {
            feature_columns: vec!["DO_mgL".into()],
            ..DatasetSpec::default()
        };
        let err = CsvDataLoader::new().load_from_string(text, &spec).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidTimestamp { row: 1, .. }));
    }

    #[test]
    fn header_only_file_is_empty() {
        let text = "timestamp,temp\n";
        assert!(matches!(
            CsvDataLoader::new().load_from_string(text, &DatasetSpec::default()),
            Err(AnalysisError::EmptyDataset)
        ));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let data = CsvDataLoader::new()
            .load_from_path(file.path(), &DatasetSpec::default())
            .unwrap();
        assert_eq!(data.num_samples(), 3);
        let (first, last) = data.time_range().unwrap();
        assert!(first < last);
    }
}
