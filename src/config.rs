//! Configuration module
//!
//! ビルド時定数（params）と実行時の測定設定（settings）を提供します。

pub mod calibration;
pub mod params;
pub mod settings;

// params.rsから主要な定数を再エクスポート
pub use params::*;

pub use calibration::CalibrationSet;
pub use settings::{
    Accuracy, AccuracyOption, CalibrationMode, MeasurementSettings, MenuItem, MenuSelection,
    RepeatMode, ResultMode, SettingsUpdate,
};
