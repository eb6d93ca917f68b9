//! タスクモジュール
//!
//! 各タスクの実装を分離して管理します。

pub mod acquisition;
pub mod button;
pub mod control;
pub mod led;
pub mod report;

// タスク関数を再エクスポート
pub use acquisition::acquisition_task;
pub use button::button_task;
pub use control::control_task;
pub use led::led_task;
pub use report::report_task;
