use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::IModel;

static NON_ALPHABETIC: Lazy<Regex> = Lazy::new(|| Regex::new("[^a-zA-Z]").unwrap());
static CAPITALIZED_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new("[A-Z][^A-Z]*").unwrap());

/// Spaced label from a type name: `RandomForestRegressor` -> `Random Forest Regressor`.
///
/// Only the last path segment is used. Tokens start at capital letters and
/// lose any non-alphabetic characters.
pub fn derive_label(type_name: &str) -> String {
    let last = type_name.rsplit("::").next().unwrap_or(type_name);
    let mut label = String::new();
    for token in CAPITALIZED_TOKEN.find_iter(last) {
        label.push(' ');
        label.push_str(&NON_ALPHABETIC.replace_all(token.as_str(), ""));
    }
    label.trim().to_string()
}

/// Display name of a model, used for report lines and plot titles.
pub fn name(model: &dyn IModel) -> String {
    derive_label(model.kind().type_name())
}
