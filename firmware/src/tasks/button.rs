//! ユーザーボタンタスク
//!
//! 短押しで測定開始（連続モード中は停止要求）。
//! 長押しは1秒ごとに選択メニューが進み、離した時点のメニューを次の選択肢へ切り替えます。
//!
//! | 押下時間 | 切り替え対象 |
//! |---|---|
//! | 1秒 | 測定精度（1x → 5x → 10x） |
//! | 2秒 | 単発 / 連続 |
//! | 3秒 | 解析値 / 生データ |
//! | 4秒以上 | 配線モード（L → LN → LNPE） |

use embassy_futures::select::{select, Either};
use embassy_stm32::exti::ExtiInput;
use embassy_time::{Duration, Timer};

use cable_monitor::config::{control, MenuItem, MenuSelection};

use crate::state::{SETTINGS_UPDATE, START_REQUEST};

/// ユーザーボタンタスク（PA0、押下でHigh）
#[embassy_executor::task]
pub async fn button_task(mut button: ExtiInput<'static>) {
    info!("Button task started");

    // 起動時の設定（L、解析値、単発、1x）に対応
    let mut menu = MenuSelection::default();

    loop {
        button.wait_for_rising_edge().await;

        // チャタリング除去
        Timer::after(Duration::from_millis(control::BUTTON_DEBOUNCE_MS)).await;
        if button.is_low() {
            continue;
        }

        // 押下時間を長押し段数に換算
        let mut tier: u8 = 0;
        loop {
            if tier >= MenuItem::TIERS {
                button.wait_for_falling_edge().await;
                break;
            }

            let period = if tier == 0 {
                control::LONG_PRESS_MS - control::BUTTON_DEBOUNCE_MS
            } else {
                control::LONG_PRESS_MS
            };
            match select(
                button.wait_for_falling_edge(),
                Timer::after(Duration::from_millis(period)),
            )
            .await
            {
                Either::First(_) => break,
                Either::Second(_) => {
                    tier += 1;
                    if let Some(item) = MenuItem::from_hold_tier(tier) {
                        debug!("Button held: {}", item);
                    }
                }
            }
        }

        match MenuItem::from_hold_tier(tier) {
            None => {
                debug!("Button: short press");
                START_REQUEST.signal(());
            }
            Some(item) => {
                let update = menu.advance(item);
                info!("Button: {} changed, menu {}", item, menu);
                SETTINGS_UPDATE.signal(update);
            }
        }

        Timer::after(Duration::from_millis(control::BUTTON_DEBOUNCE_MS)).await;
    }
}
