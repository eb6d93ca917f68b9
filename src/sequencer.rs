//! 測定シーケンサー
//!
//! WPC取得とHall取得を1サイクルとして `accuracy` 回繰り返し、
//! 最終サイクル完了時に解析エンジンを呼び出すステートマシンです。
//! 外部ループから1回/周期 `poll()` を呼び出して使用します。
//!
//! 入出力はすべて [`MeasurementContext`] 経由で受け渡します。
//! 1回の `poll()` 内では、到着したサンプルのバッファ記録が
//! 必ず次フェーズの判定より先に行われます。

use crate::amplitude::ChannelPair;
use crate::analytics::{AnalysisResult, AnalyticsEngine};
use crate::buffers::CycleBuffers;
use crate::config::{MeasurementSettings, RepeatMode};
use crate::signal::{EdgeFlag, Mailbox};

/// シーケンサーのフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// 待機中
    #[default]
    Idle,
    /// WPC取得の完了待ち
    RunningWpc,
    /// Hall取得の完了待ち
    RunningHall,
}

/// シーケンサーと外部（取得・UI・表示）との受け渡し領域
///
/// 制御ループが所有し、`Sequencer::poll()` に `&mut` で渡します。
/// 入力フラグは外部が立て、`poll()` 内で読み取りと同時にクリアされます。
/// 出力フラグは `poll()` が立て、外部が読み取りと同時にクリアします。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementContext {
    // === 入力 ===
    /// 測定開始要求（ボタン等）
    pub start_requested: EdgeFlag,
    /// 取得完了通知と左右の振幅
    pub acquisition_ready: Mailbox<ChannelPair>,
    /// UIから随時変更される設定（ラン開始時にのみ読み取り）
    pub settings: MeasurementSettings,

    // === 出力 ===
    /// WPC取得の開始要求
    pub start_wpc: EdgeFlag,
    /// Hall取得の開始要求
    pub start_hall: EdgeFlag,
    /// 測定中レベル（LED表示用）
    pub busy: bool,
    /// 解析結果
    pub data_ready: Mailbox<AnalysisResult>,
    /// 取得タイムアウトによる中断通知
    pub stalled: EdgeFlag,
}

impl MeasurementContext {
    pub fn new(settings: MeasurementSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }
}

/// 測定シーケンサー
pub struct Sequencer {
    /// 現在のフェーズ
    phase: Phase,
    /// 現在のサイクル番号（0..accuracy）
    cycle: usize,
    /// ラン開始時に取り込んだ設定
    active: MeasurementSettings,
    /// 生振幅バッファ
    buffers: CycleBuffers,
    /// 連続モードの停止要求（次のHall完了で停止）
    stop_requested: bool,
    /// 取得完了通知なしで経過したpoll回数
    idle_polls: u32,
    /// 解析エンジン
    engine: AnalyticsEngine,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(AnalyticsEngine::default())
    }
}

impl Sequencer {
    /// 新しいシーケンサーを作成
    ///
    /// # 引数
    /// * `engine` - 最終サイクル完了時に使用する解析エンジン
    pub fn new(engine: AnalyticsEngine) -> Self {
        Self {
            phase: Phase::Idle,
            cycle: 0,
            active: MeasurementSettings::default(),
            buffers: CycleBuffers::new(),
            stop_requested: false,
            idle_polls: 0,
            engine,
        }
    }

    /// 現在のフェーズを取得
    pub fn get_phase(&self) -> Phase {
        self.phase
    }

    /// 現在のサイクル番号を取得
    pub fn get_cycle_index(&self) -> usize {
        self.cycle
    }

    /// 実行中のランに適用されている設定を取得
    pub fn get_active_settings(&self) -> &MeasurementSettings {
        &self.active
    }

    /// 生振幅バッファを取得
    pub fn get_buffers(&self) -> &CycleBuffers {
        &self.buffers
    }

    /// 測定中かチェック
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// ステートマシンを1ステップ進める
    ///
    /// # 引数
    /// * `ctx` - 入出力の受け渡し領域
    pub fn poll(&mut self, ctx: &mut MeasurementContext) {
        let start = ctx.start_requested.take();
        let ready = ctx.acquisition_ready.take();

        // 1. 到着したサンプルを現在のサイクルに記録
        if let Some(pair) = ready {
            match self.phase {
                Phase::RunningWpc => self.buffers.record_wpc(self.cycle, pair),
                Phase::RunningHall => self.buffers.record_hall(self.cycle, pair),
                Phase::Idle => debug!("Acquisition result while idle ignored: {}", pair),
            }
        }

        // 2. 次のフェーズを判定
        match self.phase {
            Phase::Idle => {
                if start {
                    self.begin_run(ctx);
                }
            }
            Phase::RunningWpc | Phase::RunningHall => {
                if start {
                    self.request_stop();
                }
                if ready.is_some() {
                    self.idle_polls = 0;
                    if self.phase == Phase::RunningWpc {
                        self.phase = Phase::RunningHall;
                        ctx.start_hall.raise();
                        debug!("Cycle {}: WPC done, starting Hall", self.cycle);
                    } else {
                        self.complete_cycle(ctx);
                    }
                } else {
                    self.check_stall(ctx);
                }
            }
        }

        ctx.busy = self.is_busy();
    }

    /// ランを開始（設定を取り込み、WPC取得を要求）
    fn begin_run(&mut self, ctx: &mut MeasurementContext) {
        self.active = ctx.settings;
        self.cycle = 0;
        self.stop_requested = false;
        self.idle_polls = 0;
        self.phase = Phase::RunningWpc;
        ctx.start_wpc.raise();
        info!(
            "Run started: {} cycles, {}",
            self.active.accuracy.cycles(),
            self.active.calibration_mode
        );
    }

    fn request_stop(&mut self) {
        if self.active.repeat_mode == RepeatMode::Continuous {
            if !self.stop_requested {
                info!("Stop requested, finishing at next cycle boundary");
            }
            self.stop_requested = true;
        } else {
            debug!("Start request ignored, measurement in progress");
        }
    }

    /// Hall取得完了時の処理
    fn complete_cycle(&mut self, ctx: &mut MeasurementContext) {
        self.cycle += 1;

        if self.cycle >= self.active.accuracy.cycles() {
            let result = self.engine.analyse(
                &self.buffers,
                self.active.accuracy,
                self.active.result_mode,
                self.active.calibration_mode,
            );
            ctx.data_ready.post(result);
            self.cycle = 0;
            info!("Run finished");

            if self.active.repeat_mode == RepeatMode::Continuous && !self.stop_requested {
                self.begin_run(ctx);
            } else {
                self.enter_idle();
            }
        } else if self.stop_requested {
            info!("Run stopped after {} cycles, partial data discarded", self.cycle);
            self.enter_idle();
        } else {
            self.phase = Phase::RunningWpc;
            ctx.start_wpc.raise();
            debug!("Cycle {}: starting WPC", self.cycle);
        }
    }

    /// 取得タイムアウトの監視
    fn check_stall(&mut self, ctx: &mut MeasurementContext) {
        let Some(limit) = self.active.stall_timeout_polls else {
            return;
        };

        self.idle_polls = self.idle_polls.saturating_add(1);
        if self.idle_polls >= limit {
            warn!(
                "Acquisition stalled in {} after {} polls, run aborted",
                self.phase, self.idle_polls
            );
            ctx.stalled.raise();
            self.enter_idle();
        }
    }

    fn enter_idle(&mut self) {
        self.phase = Phase::Idle;
        self.cycle = 0;
        self.stop_requested = false;
        self.idle_polls = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Accuracy, CalibrationMode, ResultMode, SettingsUpdate};

    fn context(accuracy: u16, repeat_mode: RepeatMode) -> MeasurementContext {
        let mut settings = MeasurementSettings::default();
        settings
            .commit(SettingsUpdate {
                accuracy: Some(accuracy),
                repeat_mode: Some(repeat_mode),
                ..SettingsUpdate::default()
            })
            .unwrap();
        MeasurementContext::new(settings)
    }

    fn assert_invariant(seq: &Sequencer, ctx: &MeasurementContext) {
        let accuracy = seq.get_active_settings().accuracy.cycles();
        assert!(
            seq.get_cycle_index() < accuracy
                || (seq.get_cycle_index() == 0 && seq.get_phase() == Phase::Idle)
        );
        assert_eq!(ctx.busy, seq.is_busy());
    }

    /// WPC+Hallの1サイクルを進める
    fn run_cycle(seq: &mut Sequencer, ctx: &mut MeasurementContext, wpc: ChannelPair, hall: ChannelPair) {
        assert_eq!(seq.get_phase(), Phase::RunningWpc);
        assert!(ctx.start_wpc.take());
        ctx.acquisition_ready.post(wpc);
        seq.poll(ctx);
        assert_invariant(seq, ctx);

        assert!(ctx.start_hall.take());
        ctx.acquisition_ready.post(hall);
        seq.poll(ctx);
        assert_invariant(seq, ctx);
    }

    #[test]
    fn test_single_cycle_in_three_polls() {
        let mut seq = Sequencer::default();
        let mut ctx = context(1, RepeatMode::SingleShot);

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        assert_eq!(seq.get_phase(), Phase::RunningWpc);
        assert!(ctx.busy);
        assert!(ctx.start_wpc.take());

        ctx.acquisition_ready.post(ChannelPair::new(540, 530));
        seq.poll(&mut ctx);
        assert_eq!(seq.get_phase(), Phase::RunningHall);
        assert!(ctx.start_hall.take());
        assert!(!ctx.data_ready.is_full());

        ctx.acquisition_ready.post(ChannelPair::new(100, 100));
        seq.poll(&mut ctx);
        assert_eq!(seq.get_phase(), Phase::Idle);
        assert_eq!(seq.get_cycle_index(), 0);
        assert!(!ctx.busy);

        match ctx.data_ready.take() {
            Some(AnalysisResult::Analysed(m)) => assert_eq!(m.distance_mm, 40.0),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!ctx.data_ready.is_full());
    }

    #[test]
    fn test_samples_recorded_per_cycle() {
        let mut seq = Sequencer::default();
        let mut ctx = context(3, RepeatMode::SingleShot);

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        for i in 0..3 {
            run_cycle(
                &mut seq,
                &mut ctx,
                ChannelPair::new(500 + i, 600 + i),
                ChannelPair::new(-i, i),
            );
        }

        let buffers = seq.get_buffers();
        assert_eq!(buffers.wpc_left(3), &[500.0, 501.0, 502.0]);
        assert_eq!(buffers.wpc_right(3), &[600.0, 601.0, 602.0]);
        assert_eq!(buffers.hall_left(3), &[0.0, -1.0, -2.0]);
        assert_eq!(buffers.hall_right(3), &[0.0, 1.0, 2.0]);
        assert!(ctx.data_ready.is_full());
        assert_eq!(seq.get_phase(), Phase::Idle);
    }

    #[test]
    fn test_continuous_mode_restarts_without_new_start() {
        let mut seq = Sequencer::default();
        let mut ctx = context(5, RepeatMode::Continuous);

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        for _ in 0..5 {
            run_cycle(&mut seq, &mut ctx, ChannelPair::new(510, 510), ChannelPair::new(0, 0));
        }

        assert!(ctx.data_ready.take().is_some());
        assert_eq!(seq.get_phase(), Phase::RunningWpc);
        assert_eq!(seq.get_cycle_index(), 0);
        assert!(ctx.busy);
        assert!(ctx.start_wpc.is_raised());
    }

    #[test]
    fn test_start_while_running_single_shot_is_ignored() {
        let mut seq = Sequencer::default();
        let mut ctx = context(2, RepeatMode::SingleShot);

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        run_cycle(&mut seq, &mut ctx, ChannelPair::new(510, 510), ChannelPair::new(0, 0));
        assert_eq!(seq.get_cycle_index(), 1);

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        assert_eq!(seq.get_phase(), Phase::RunningWpc);
        assert_eq!(seq.get_cycle_index(), 1);

        run_cycle(&mut seq, &mut ctx, ChannelPair::new(510, 510), ChannelPair::new(0, 0));
        assert_eq!(seq.get_phase(), Phase::Idle);
        assert!(ctx.data_ready.is_full());
    }

    #[test]
    fn test_stop_in_continuous_mode_discards_partial_run() {
        let mut seq = Sequencer::default();
        let mut ctx = context(5, RepeatMode::Continuous);

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        run_cycle(&mut seq, &mut ctx, ChannelPair::new(510, 510), ChannelPair::new(0, 0));

        // 停止要求はHall完了まで保留される
        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        assert_eq!(seq.get_phase(), Phase::RunningWpc);

        run_cycle(&mut seq, &mut ctx, ChannelPair::new(510, 510), ChannelPair::new(0, 0));
        assert_eq!(seq.get_phase(), Phase::Idle);
        assert_eq!(seq.get_cycle_index(), 0);
        assert!(!ctx.busy);
        assert!(!ctx.data_ready.is_full());
    }

    #[test]
    fn test_stop_on_last_cycle_still_publishes() {
        let mut seq = Sequencer::default();
        let mut ctx = context(1, RepeatMode::Continuous);

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        assert!(ctx.start_wpc.take());
        ctx.acquisition_ready.post(ChannelPair::new(510, 510));
        seq.poll(&mut ctx);

        ctx.start_requested.raise();
        ctx.acquisition_ready.post(ChannelPair::new(0, 0));
        seq.poll(&mut ctx);

        assert!(ctx.data_ready.is_full());
        assert_eq!(seq.get_phase(), Phase::Idle);
    }

    #[test]
    fn test_ready_while_idle_is_ignored() {
        let mut seq = Sequencer::default();
        let mut ctx = context(1, RepeatMode::SingleShot);

        ctx.acquisition_ready.post(ChannelPair::new(1, 1));
        seq.poll(&mut ctx);
        assert_eq!(seq.get_phase(), Phase::Idle);
        assert!(!ctx.acquisition_ready.is_full());
        assert_eq!(*seq.get_buffers(), CycleBuffers::new());
    }

    #[test]
    fn test_stall_timeout_aborts_run() {
        let mut seq = Sequencer::default();
        let mut ctx = context(1, RepeatMode::SingleShot);
        ctx.settings
            .commit(SettingsUpdate {
                stall_timeout_polls: Some(Some(3)),
                ..SettingsUpdate::default()
            })
            .unwrap();

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        seq.poll(&mut ctx);
        seq.poll(&mut ctx);
        assert_eq!(seq.get_phase(), Phase::RunningWpc);
        assert!(!ctx.stalled.is_raised());

        seq.poll(&mut ctx);
        assert_eq!(seq.get_phase(), Phase::Idle);
        assert_eq!(seq.get_cycle_index(), 0);
        assert!(ctx.stalled.take());
        assert!(!ctx.busy);
    }

    #[test]
    fn test_without_timeout_waits_forever() {
        let mut seq = Sequencer::default();
        let mut ctx = context(1, RepeatMode::SingleShot);

        ctx.start_requested.raise();
        for _ in 0..10_000 {
            seq.poll(&mut ctx);
        }
        assert_eq!(seq.get_phase(), Phase::RunningWpc);
        assert!(!ctx.stalled.is_raised());
    }

    #[test]
    fn test_settings_change_applies_to_next_run() {
        let mut seq = Sequencer::default();
        let mut ctx = context(2, RepeatMode::SingleShot);

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        ctx.settings
            .commit(SettingsUpdate {
                accuracy: Some(1),
                result_mode: Some(ResultMode::RawPassthrough),
                calibration_mode: Some(CalibrationMode::LNPE),
                ..SettingsUpdate::default()
            })
            .unwrap();
        assert_eq!(seq.get_active_settings().accuracy.cycles(), 2);

        run_cycle(&mut seq, &mut ctx, ChannelPair::new(510, 510), ChannelPair::new(0, 0));
        assert_eq!(seq.get_phase(), Phase::RunningWpc);
        run_cycle(&mut seq, &mut ctx, ChannelPair::new(510, 510), ChannelPair::new(0, 0));
        assert!(matches!(ctx.data_ready.take(), Some(AnalysisResult::Analysed(_))));

        ctx.start_requested.raise();
        seq.poll(&mut ctx);
        assert_eq!(seq.get_active_settings().accuracy, Accuracy::ONE);
        run_cycle(&mut seq, &mut ctx, ChannelPair::new(200, 300), ChannelPair::new(-4, 4));
        assert_eq!(
            ctx.data_ready.take().map(|r| r.to_array()),
            Some([4.0, -4.0, 300.0, 200.0])
        );
    }
}
