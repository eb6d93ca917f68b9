//! WPCセンサーのキャリブレーションテーブル
//!
//! 配線モード（L / LN / LNPE）ごとに左右2本、計6本のテーブルを持ちます。
//! 距離は全テーブル共通、強度は実測値です。

use super::settings::CalibrationMode;
use crate::analytics::{CalibrationPoint, CalibrationTable};

/// キャリブレーション距離 [mm]
pub const DISTANCES_MM: [f32; 11] = [
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 70.0, 100.0, 150.0, 200.0, 300.0,
];

/// 距離列と強度列からテーブル点を生成
const fn points(strengths: [f32; 11]) -> [CalibrationPoint; 11] {
    let mut out = [CalibrationPoint::new(0.0, 0.0); 11];
    let mut i = 0;
    while i < 11 {
        out[i] = CalibrationPoint::new(DISTANCES_MM[i], strengths[i]);
        i += 1;
    }
    out
}

// === L ===
const L_LEFT: [CalibrationPoint; 11] = points([
    795.0, 740.0, 683.0, 570.0, 540.0, 510.0, 490.0, 460.0, 430.0, 420.0, 410.0,
]);
const L_RIGHT: [CalibrationPoint; 11] = points([
    810.0, 690.0, 620.0, 565.0, 530.0, 510.0, 490.0, 450.0, 395.0, 380.0, 330.0,
]);

// === LN ===
// 左側10mmと20mmで同じ強度（実測値のまま）
const LN_LEFT: [CalibrationPoint; 11] = points([
    365.0, 350.0, 350.0, 325.0, 320.0, 305.0, 275.0, 265.0, 262.0, 215.0, 210.0,
]);
const LN_RIGHT: [CalibrationPoint; 11] = points([
    570.0, 510.0, 430.0, 375.0, 340.0, 330.0, 290.0, 265.0, 245.0, 195.0, 165.0,
]);

// === LNPE ===
const LNPE_LEFT: [CalibrationPoint; 11] = points([
    315.0, 292.0, 280.0, 263.0, 260.0, 255.0, 242.0, 235.0, 220.0, 211.0, 204.0,
]);
const LNPE_RIGHT: [CalibrationPoint; 11] = points([
    450.0, 363.0, 306.0, 283.0, 273.0, 267.0, 263.0, 237.0, 215.0, 198.0, 170.0,
]);

/// 左右のテーブル組
#[derive(Debug, Clone, Copy)]
pub struct CalibrationSet {
    pub left: CalibrationTable<'static>,
    pub right: CalibrationTable<'static>,
}

impl CalibrationSet {
    /// 配線モードに対応するテーブル組を取得
    pub const fn for_mode(mode: CalibrationMode) -> Self {
        match mode {
            CalibrationMode::L => Self {
                left: CalibrationTable::new(&L_LEFT),
                right: CalibrationTable::new(&L_RIGHT),
            },
            CalibrationMode::LN => Self {
                left: CalibrationTable::new(&LN_LEFT),
                right: CalibrationTable::new(&LN_RIGHT),
            },
            CalibrationMode::LNPE => Self {
                left: CalibrationTable::new(&LNPE_LEFT),
                right: CalibrationTable::new(&LNPE_RIGHT),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [CalibrationMode; 3] = [
        CalibrationMode::L,
        CalibrationMode::LN,
        CalibrationMode::LNPE,
    ];

    #[test]
    fn test_all_tables_are_valid() {
        for mode in MODES {
            let set = CalibrationSet::for_mode(mode);
            assert!(set.left.validate().is_ok(), "{:?} left", mode);
            assert!(set.right.validate().is_ok(), "{:?} right", mode);
        }
    }

    #[test]
    fn test_tables_share_distance_axis() {
        for mode in MODES {
            let set = CalibrationSet::for_mode(mode);
            for (point, distance) in set.left.points().iter().zip(DISTANCES_MM.iter()) {
                assert_eq!(point.distance_mm, *distance);
            }
            assert_eq!(set.right.max_distance(), 300.0);
        }
    }

    #[test]
    fn test_mode_selects_table() {
        assert_eq!(CalibrationSet::for_mode(CalibrationMode::L).left.max_strength(), 795.0);
        assert_eq!(CalibrationSet::for_mode(CalibrationMode::LN).right.max_strength(), 570.0);
        assert_eq!(CalibrationSet::for_mode(CalibrationMode::LNPE).left.min_strength(), 204.0);
    }

    #[test]
    fn test_weak_reading_clamps_to_max_distance() {
        let set = CalibrationSet::for_mode(CalibrationMode::L);
        assert_eq!(set.left.distance(100.0), 300.0);
        assert_eq!(set.right.distance(0.0), 300.0);
    }
}
