//! 測定とハードウェアの設定パラメータ

/// ADC分解能 [bit]
pub const ADC_RESOLUTION_BITS: u32 = 12;

/// ADC最大値（12ビット = 4095）
pub const ADC_MAX_VALUE: i32 = (1 << ADC_RESOLUTION_BITS) - 1;

/// ADC中点（正弦波の中心）
pub const ADC_MID_SCALE: i32 = ADC_MAX_VALUE / 2;

/// 1回の取得でのチャネルあたりサンプル数（600Hzで50Hz波形を5周期分）
pub const SAMPLES_PER_CHANNEL: usize = 60;

/// 振幅抽出で使う上下それぞれのサンプル数
pub const TRIM_COUNT: usize = 5;

/// 振幅抽出の作業バッファ容量 [サンプル/チャネル]
pub const MAX_SAMPLES_PER_CHANNEL: usize = 128;

/// サンプリング周波数 [Hz]
pub const ADC_SAMPLE_RATE_HZ: u64 = 600;

/// 測定サイクルバッファの容量（設定可能な最大精度）
pub const CYCLE_CAPACITY: usize = 10;

/// 電流計算用キャリブレーション定数
pub mod current {
    /// ADC 1デジットあたりの電圧 [V]（3.3V / 4096）
    pub const VOLTS_PER_CODE: f32 = 0.000_805_664_062_5;

    /// オペアンプ回路の増幅率
    pub const OPAMP_GAIN: f32 = 95.0;

    /// Hallセンサーの感度係数
    pub const HALL_SENSOR_GAIN: f32 = 90.0;

    /// 2π/μ0 に相当する係数
    pub const PERMEABILITY_CONSTANT: f32 = 4_998_556.330;

    /// これ以下の磁束密度 [T] では電流を計算しない
    pub const MIN_FIELD_TESLA: f32 = 1.0e-12;
}

/// 解析パラメータ
pub mod analysis {
    /// 電流計算を行う距離の上限 [mm]（近接条件）
    pub const CLOSE_RANGE_MM: f32 = 10.0;

    /// 角度判定の正規化マージン
    pub const ANGLE_MARGIN: f32 = 0.2;

    /// 傾き検出時に報告する角度 [deg]
    pub const ROTATED_ANGLE_DEG: f32 = 30.0;

    /// ケーブル検出と見なす距離の上限 [mm]
    pub const DETECTION_LIMIT_MM: f32 = 300.0;
}

/// 制御ループ設定
pub mod control {
    /// シーケンサのポーリング周期 [ms]
    pub const POLL_PERIOD_MS: u64 = 1;

    /// 取得停止とみなすまでのポーリング回数（1取得 ≈ 100ms）
    pub const DEFAULT_STALL_TIMEOUT_POLLS: u32 = 1_000;

    /// ボタンのチャタリング除去時間 [ms]
    pub const BUTTON_DEBOUNCE_MS: u64 = 50;

    /// 長押し判定時間 [ms]
    pub const LONG_PRESS_MS: u64 = 1_000;
}
