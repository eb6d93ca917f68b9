//! ハードウェア初期化モジュール
//!
//! STM32F429I-Discovery向けのクロックとADCの初期化を集約します。

use embassy_stm32::{
    adc::{Adc, AnyAdcChannel, SampleTime},
    peripherals, Config, Peri,
};


/// RCCクロック設定を初期化
///
/// HSE 8MHz → PLL（÷8 × 336 ÷ 2）で168MHz生成
pub fn create_clock_config() -> Config {
    let mut config = Config::default();
    {
        use embassy_stm32::rcc::{
            AHBPrescaler, APBPrescaler, Hse, HseMode, Pll, PllMul, PllPDiv, PllPreDiv, PllQDiv,
            PllSource, Sysclk,
        };
        use embassy_stm32::time::Hertz;

        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Oscillator,
        });
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV8,
            mul: PllMul::MUL336,
            divp: Some(PllPDiv::DIV2), // 168MHz
            divq: Some(PllQDiv::DIV7), // 48MHz
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4; // 42MHz
        config.rcc.apb2_pre = APBPrescaler::DIV2; // 84MHz
        config.rcc.sys = Sysclk::PLL1_P;
    }
    config
}

/// 左右センサーのADCチャネル組
pub struct ProbeChannels {
    pub left: AnyAdcChannel<peripherals::ADC3>,
    pub right: AnyAdcChannel<peripherals::ADC3>,
}

impl ProbeChannels {
    pub fn new(
        left: AnyAdcChannel<peripherals::ADC3>,
        right: AnyAdcChannel<peripherals::ADC3>,
    ) -> Self {
        Self { left, right }
    }
}

/// ADC3初期化
///
/// WPC: PC3=ADC3_IN13（左）、PF6=ADC3_IN4（右）
/// Hall: PC1=ADC3_IN11（左）、PF8=ADC3_IN6（右）
pub fn init_adc(adc3: Peri<'static, peripherals::ADC3>) -> Adc<'static, peripherals::ADC3> {
    info!("Initializing ADC3 (12bit, 112 cycles)...");
    let mut adc = Adc::new(adc3);
    adc.set_sample_time(SampleTime::CYCLES112);
    adc
}
