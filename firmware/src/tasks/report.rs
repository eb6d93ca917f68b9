//! 結果出力タスク
//!
//! 解析結果を分類してログに出力します。

use cable_monitor::Reading;

use crate::state::ANALYSIS_RESULT;

/// 結果出力タスク
#[embassy_executor::task]
pub async fn report_task() {
    info!("Report task started");

    loop {
        let result = ANALYSIS_RESULT.wait().await;

        match Reading::from_result(&result) {
            Reading::CableDetected(m) => info!(
                "Cable detected: distance={}mm (sd={}mm), angle={}deg, current={}A",
                m.distance_mm, m.std_deviation_mm, m.angle_deg, m.current_a
            ),
            Reading::CableNotDetected => info!("Cable not detected"),
            Reading::Raw(raw) => info!(
                "Raw means: hall R={} L={}, wpc R={} L={}",
                raw.hall_right, raw.hall_left, raw.wpc_right, raw.wpc_left
            ),
        }
    }
}
