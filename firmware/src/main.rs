#![no_std]
#![no_main]

mod fmt;
mod hardware;
mod state;
mod tasks;

#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

use embassy_executor::Spawner;
use embassy_stm32::{
    adc::AdcChannel,
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
};

use hardware::ProbeChannels;
use tasks::{acquisition_task, button_task, control_task, led_task, report_task};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // ハードウェア初期化
    let config = hardware::create_clock_config();
    let p = embassy_stm32::init(config);

    info!("═══════════════════════════════════════════════════════════════════");
    info!("");
    info!("        Cable Monitor • STM32F429ZI @ 168MHz");
    info!("        WPC distance / angle + Hall current");
    info!("");
    info!("═══════════════════════════════════════════════════════════════════");

    // LED初期化＆タスク起動（LED3=PG13 ハートビート、LED4=PG14 測定中）
    let heartbeat = Output::new(p.PG13, Level::Low, Speed::Low);
    let busy = Output::new(p.PG14, Level::Low, Speed::Low);
    spawner.spawn(led_task(heartbeat, busy)).unwrap();

    // ユーザーボタン（PA0、外部プルダウン付き）
    let button = ExtiInput::new(p.PA0, p.EXTI0, Pull::Down);
    spawner.spawn(button_task(button)).unwrap();

    // ADC初期化＆取得タスク起動
    let adc = hardware::init_adc(p.ADC3);
    let wpc = ProbeChannels::new(p.PC3.degrade_adc(), p.PF6.degrade_adc());
    let hall = ProbeChannels::new(p.PC1.degrade_adc(), p.PF8.degrade_adc());
    spawner.spawn(acquisition_task(adc, wpc, hall)).unwrap();
    info!("Acquisition on ADC3: WPC=PC3/PF6, Hall=PC1/PF8");

    // 結果出力・測定制御タスク起動
    spawner.spawn(report_task()).unwrap();
    spawner.spawn(control_task()).unwrap();

    info!("All tasks started. Press the user button to measure.");
}
