pub mod data_loader; // Strategy trait and dataset types
pub mod csv_data_loader; // CSV implementation of strategy

pub use csv_data_loader::CsvDataLoader;
pub use data_loader::{
    check_aligned, select_targets, DataLoader, Dataset, DatasetSpec, FeatureMatrix,
    DEFAULT_FEATURES,
};
