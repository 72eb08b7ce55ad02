mod layout;
mod predictor;

pub use layout::Layout;
pub use predictor::StockPredictor;
