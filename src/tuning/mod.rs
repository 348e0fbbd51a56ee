pub mod tuner;

pub use tuner::{alpha_grid, tune, GridSearchResult, Tuner, TunerConfig};
