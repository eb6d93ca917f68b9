//! ADC取得タスク
//!
//! 要求されたセンサー組から左右交互に60組のサンプルを600Hzで取得し、
//! 振幅を抽出して制御タスクへ返します。

use embassy_stm32::{adc::Adc, peripherals};
use embassy_time::{Duration, Ticker};

use cable_monitor::config::{ADC_SAMPLE_RATE_HZ, SAMPLES_PER_CHANNEL};
use cable_monitor::AmplitudeExtractor;

use crate::hardware::ProbeChannels;
use crate::state::{ProbePair, ACQUISITION_DONE, ACQUISITION_REQUEST};

/// ADC取得タスク
///
/// # 引数
/// * `adc` - ADC3
/// * `wpc` - WPCセンサーの左右チャネル
/// * `hall` - Hallセンサーの左右チャネル
#[embassy_executor::task]
pub async fn acquisition_task(
    mut adc: Adc<'static, peripherals::ADC3>,
    mut wpc: ProbeChannels,
    mut hall: ProbeChannels,
) {
    info!(
        "Acquisition task started ({} pairs @ {}Hz)",
        SAMPLES_PER_CHANNEL, ADC_SAMPLE_RATE_HZ
    );

    let extractor = AmplitudeExtractor::default();
    // 左右交互 [l0, r0, l1, r1, ...]
    let mut block = [0u16; 2 * SAMPLES_PER_CHANNEL];

    loop {
        let probe = ACQUISITION_REQUEST.wait().await;
        let channels = match probe {
            ProbePair::Wpc => &mut wpc,
            ProbePair::Hall => &mut hall,
        };

        let mut ticker = Ticker::every(Duration::from_hz(ADC_SAMPLE_RATE_HZ));
        for pair in block.chunks_exact_mut(2) {
            ticker.next().await;
            pair[0] = adc.blocking_read(&mut channels.left);
            pair[1] = adc.blocking_read(&mut channels.right);
        }

        match extractor.extract(&block) {
            Ok(amplitudes) => {
                debug!("{} amplitudes: {}", probe, amplitudes);
                ACQUISITION_DONE.signal(amplitudes);
            }
            // 通知しない場合、シーケンサー側のタイムアウトで中断される
            Err(e) => error!("{} amplitude extraction failed: {}", probe, e),
        }
    }
}
