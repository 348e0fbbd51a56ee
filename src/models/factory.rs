use super::{ForestWrapper, IModel, LassoWrapper, LinRegWrapper, ModelKind, RidgeWrapper};

/// Factory for building models by kind.
pub struct ModelFactory;

impl ModelFactory {
    /// Unfitted model of the given kind with default hyperparameters.
    pub fn create_kind(kind: ModelKind) -> Box<dyn IModel> {
        match kind {
            ModelKind::LinearRegression => Box::new(LinRegWrapper::new()),
            ModelKind::Lasso => Box::new(LassoWrapper::new()),
            ModelKind::Ridge => Box::new(RidgeWrapper::new()),
            ModelKind::RandomForest => Box::new(ForestWrapper::new()),
        }
    }
}
