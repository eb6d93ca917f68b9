//! LED制御タスク
//!
//! LED3（PG13）: ハートビート
//! LED4（PG14）: 測定中

use core::sync::atomic::Ordering;

use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Ticker};

use crate::state::BUSY;

/// LED制御タスク
///
/// 50msごとに測定中フラグを反映し、500msごとにハートビートを反転します。
#[embassy_executor::task]
pub async fn led_task(mut heartbeat: Output<'static>, mut busy: Output<'static>) {
    info!("LED task started");

    let mut ticker = Ticker::every(Duration::from_millis(50));
    let mut tick: u32 = 0;

    loop {
        ticker.next().await;

        tick = tick.wrapping_add(1);
        if tick % 10 == 0 {
            heartbeat.toggle();
        }

        if BUSY.load(Ordering::Relaxed) {
            busy.set_high();
        } else {
            busy.set_low();
        }
    }
}
