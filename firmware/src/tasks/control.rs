//! 測定制御タスク
//!
//! シーケンサーを1ms周期でポーリングし、タスク間Signalと
//! MeasurementContextの間で入出力を橋渡しします。

use core::sync::atomic::Ordering;

use embassy_time::{Duration, Ticker};

use cable_monitor::config::{control, MeasurementSettings};
use cable_monitor::{MeasurementContext, Sequencer};

use crate::state::{
    ProbePair, ACQUISITION_DONE, ACQUISITION_REQUEST, ANALYSIS_RESULT, BUSY, SETTINGS_UPDATE,
    START_REQUEST,
};

/// 測定制御タスク（1kHzポーリング）
#[embassy_executor::task]
pub async fn control_task() {
    info!("Control task started");

    let mut sequencer = Sequencer::default();
    let mut ctx = MeasurementContext::new(MeasurementSettings::firmware_default());

    info!("Initial settings: {}", ctx.settings);

    let mut ticker = Ticker::every(Duration::from_millis(control::POLL_PERIOD_MS));

    loop {
        ticker.next().await;

        // 1. 入力を取り込み
        if START_REQUEST.try_take().is_some() {
            ctx.start_requested.raise();
        }
        if let Some(update) = SETTINGS_UPDATE.try_take() {
            // 不正な値はcommit側でログ出力し、現在の設定を維持
            if ctx.settings.commit(update).is_ok() {
                info!("Settings updated: {}", ctx.settings);
            }
        }
        if let Some(amplitudes) = ACQUISITION_DONE.try_take() {
            ctx.acquisition_ready.post(amplitudes);
        }

        // 2. シーケンサー更新
        sequencer.poll(&mut ctx);

        // 3. 出力を配信
        if ctx.start_wpc.take() {
            ACQUISITION_REQUEST.signal(ProbePair::Wpc);
        }
        if ctx.start_hall.take() {
            ACQUISITION_REQUEST.signal(ProbePair::Hall);
        }
        if let Some(result) = ctx.data_ready.take() {
            ANALYSIS_RESULT.signal(result);
        }
        if ctx.stalled.take() {
            error!("Measurement aborted: acquisition did not respond");
        }

        BUSY.store(ctx.busy, Ordering::Relaxed);
    }
}
