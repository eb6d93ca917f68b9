//! タスク間共有状態
//!
//! タスク間の受け渡しはSignal（最新値のみ保持）で行います。
//! 未取得の値に新しい値が届いた場合は上書きされます。

use core::sync::atomic::AtomicBool;

use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::signal::Signal;

use cable_monitor::config::SettingsUpdate;
use cable_monitor::{AnalysisResult, ChannelPair};

/// 取得対象のセンサー組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbePair {
    /// WPCセンサー（距離・角度）
    Wpc,
    /// Hallセンサー（電流）
    Hall,
}

/// 測定開始要求（ボタン → 制御タスク）
pub static START_REQUEST: Signal<ThreadModeRawMutex, ()> = Signal::new();

/// 設定変更（ボタン長押し → 制御タスク）
pub static SETTINGS_UPDATE: Signal<ThreadModeRawMutex, SettingsUpdate> = Signal::new();

/// 取得開始要求（制御タスク → 取得タスク）
pub static ACQUISITION_REQUEST: Signal<ThreadModeRawMutex, ProbePair> = Signal::new();

/// 取得完了と左右の振幅（取得タスク → 制御タスク）
pub static ACQUISITION_DONE: Signal<ThreadModeRawMutex, ChannelPair> = Signal::new();

/// 解析結果（制御タスク → 表示タスク）
pub static ANALYSIS_RESULT: Signal<ThreadModeRawMutex, AnalysisResult> = Signal::new();

/// 測定中フラグ（LED表示用）
pub static BUSY: AtomicBool = AtomicBool::new(false);
