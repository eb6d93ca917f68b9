//! Cable monitor measurement core
//!
//! ケーブルモニターの測定シーケンスと解析を行うno_stdライブラリです。
//! ペリフェラルには依存しないため、ホスト上でテストできます。
//!
//! - [`amplitude`]: ADCサンプルブロックから左右の振幅を抽出
//! - [`sequencer`]: WPC/Hall取得サイクルのステートマシン
//! - [`analytics`]: 距離・角度・電流の算出
//! - [`report`]: 表示用の結果分類
#![cfg_attr(not(test), no_std)]

// fmtモジュールは最初に宣言（マクロを他モジュールで使用するため）
mod fmt;

pub mod amplitude;
pub mod analytics;
pub mod buffers;
pub mod config;
pub mod error;
pub mod report;
pub mod sequencer;
pub mod signal;

pub use amplitude::{AmplitudeExtractor, ChannelPair};
pub use analytics::{AnalysisResult, AnalyticsEngine, Measurement, RawMeans};
pub use buffers::CycleBuffers;
pub use error::{Error, Result};
pub use report::Reading;
pub use sequencer::{MeasurementContext, Phase, Sequencer};
pub use signal::{EdgeFlag, Mailbox};
