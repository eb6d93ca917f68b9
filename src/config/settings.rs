//! Runtime measurement settings
//!
//! Settings are written by the UI side at any time. The sequencer copies them
//! when a run starts, so changes made mid-run apply to the next run.

use super::params::{control, CYCLE_CAPACITY};
use crate::error::{Error, Result};

/// Wiring configuration of the monitored cable, selects the calibration tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationMode {
    /// Single phase conductor only
    #[default]
    L,
    /// Phase and neutral
    LN,
    /// Phase, neutral and protective earth
    LNPE,
}

impl CalibrationMode {
    /// Map a menu index (0 = L, 1 = LN, 2 = LNPE)
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(CalibrationMode::L),
            1 => Some(CalibrationMode::LN),
            2 => Some(CalibrationMode::LNPE),
            _ => None,
        }
    }
}

/// Output format of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultMode {
    /// Angle, distance, standard deviation and current
    #[default]
    Analysed,
    /// Per-channel means of the raw amplitudes
    RawPassthrough,
}

/// Whether a run restarts by itself after completing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RepeatMode {
    #[default]
    SingleShot,
    Continuous,
}

/// Number of WPC+Hall cycles accumulated into one result
///
/// Always within `1..=CYCLE_CAPACITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Accuracy(u16);

impl Accuracy {
    pub const ONE: Accuracy = Accuracy(1);

    /// Validate a cycle count against the buffer capacity
    ///
    /// # Arguments
    /// * `cycles` - Requested number of cycles
    ///
    /// # Returns
    /// * `Ok(Accuracy)` if `1 <= cycles <= CYCLE_CAPACITY`
    /// * `Err(Error::AccuracyOutOfRange)` otherwise
    pub fn new(cycles: u16) -> Result<Self> {
        if cycles == 0 || cycles as usize > CYCLE_CAPACITY {
            return Err(Error::AccuracyOutOfRange {
                requested: cycles,
                capacity: CYCLE_CAPACITY,
            });
        }
        Ok(Accuracy(cycles))
    }

    /// Number of cycles
    pub fn cycles(self) -> usize {
        self.0 as usize
    }
}

impl Default for Accuracy {
    fn default() -> Self {
        Accuracy::ONE
    }
}

/// Accuracy choices offered by the options menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccuracyOption {
    X1,
    X5,
    X10,
}

impl AccuracyOption {
    /// Map a menu index (0 = 1x, 1 = 5x, 2 = 10x)
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(AccuracyOption::X1),
            1 => Some(AccuracyOption::X5),
            2 => Some(AccuracyOption::X10),
            _ => None,
        }
    }

    pub fn cycles(self) -> u16 {
        match self {
            AccuracyOption::X1 => 1,
            AccuracyOption::X5 => 5,
            AccuracyOption::X10 => 10,
        }
    }
}

/// Settings read by the sequencer at the start of each run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementSettings {
    pub calibration_mode: CalibrationMode,
    pub result_mode: ResultMode,
    pub repeat_mode: RepeatMode,
    pub accuracy: Accuracy,
    /// Polls without an acquisition-ready signal before a run is aborted.
    /// `None` waits forever; zero is rejected by `commit`.
    pub stall_timeout_polls: Option<u32>,
}

impl MeasurementSettings {
    /// Settings used by the firmware at power-up
    pub fn firmware_default() -> Self {
        Self {
            stall_timeout_polls: Some(control::DEFAULT_STALL_TIMEOUT_POLLS),
            ..Self::default()
        }
    }

    /// Apply a settings change
    ///
    /// The update is validated as a whole. On error nothing is changed.
    ///
    /// # Arguments
    /// * `update` - Fields to change; `None` fields keep their value
    pub fn commit(&mut self, update: SettingsUpdate) -> Result<()> {
        let accuracy = match update.accuracy {
            Some(cycles) => match Accuracy::new(cycles) {
                Ok(accuracy) => Some(accuracy),
                Err(e) => {
                    warn!("Settings rejected: {}", e);
                    return Err(e);
                }
            },
            None => None,
        };
        if update.stall_timeout_polls == Some(Some(0)) {
            let e = Error::ZeroStallTimeout;
            warn!("Settings rejected: {}", e);
            return Err(e);
        }

        if let Some(mode) = update.calibration_mode {
            self.calibration_mode = mode;
        }
        if let Some(mode) = update.result_mode {
            self.result_mode = mode;
        }
        if let Some(mode) = update.repeat_mode {
            self.repeat_mode = mode;
        }
        if let Some(accuracy) = accuracy {
            self.accuracy = accuracy;
        }
        if let Some(timeout) = update.stall_timeout_polls {
            self.stall_timeout_polls = timeout;
        }

        debug!("Settings committed: {}", self);
        Ok(())
    }
}

/// Partial settings change posted by the UI side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsUpdate {
    pub calibration_mode: Option<CalibrationMode>,
    pub result_mode: Option<ResultMode>,
    pub repeat_mode: Option<RepeatMode>,
    /// Raw cycle count, validated on commit
    pub accuracy: Option<u16>,
    pub stall_timeout_polls: Option<Option<u32>>,
}

impl SettingsUpdate {
    /// Build an update from the option menu indices
    ///
    /// # Arguments
    /// * `mode` - 0 = L, 1 = LN, 2 = LNPE
    /// * `data_type` - 0 = analysed, 1 = raw
    /// * `meas_type` - 0 = single, 1 = continuous
    /// * `accuracy` - 0 = 1x, 1 = 5x, 2 = 10x
    ///
    /// Unknown indices leave the corresponding setting unchanged.
    pub fn from_menu(mode: u16, data_type: u16, meas_type: u16, accuracy: u16) -> Self {
        Self {
            calibration_mode: CalibrationMode::from_index(mode),
            result_mode: match data_type {
                0 => Some(ResultMode::Analysed),
                1 => Some(ResultMode::RawPassthrough),
                _ => None,
            },
            repeat_mode: match meas_type {
                0 => Some(RepeatMode::SingleShot),
                1 => Some(RepeatMode::Continuous),
                _ => None,
            },
            accuracy: AccuracyOption::from_index(accuracy).map(AccuracyOption::cycles),
            stall_timeout_polls: None,
        }
    }
}

/// Option menu reachable from the push button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Accuracy,
    RepeatMode,
    ResultMode,
    CalibrationMode,
}

impl MenuItem {
    /// Number of long-press tiers that select a menu
    pub const TIERS: u8 = 4;

    /// Menu selected by holding the button through `tier` long-press periods
    ///
    /// Tier 0 is a short press and selects no menu. Tiers beyond the last
    /// menu stay on the last one.
    pub fn from_hold_tier(tier: u8) -> Option<Self> {
        match tier {
            0 => None,
            1 => Some(MenuItem::Accuracy),
            2 => Some(MenuItem::RepeatMode),
            3 => Some(MenuItem::ResultMode),
            _ => Some(MenuItem::CalibrationMode),
        }
    }
}

/// Current option index of every menu
///
/// Indices follow `SettingsUpdate::from_menu`; all zero matches the
/// power-up settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuSelection {
    pub mode: u16,
    pub data_type: u16,
    pub meas_type: u16,
    pub accuracy: u16,
}

impl MenuSelection {
    /// Step one menu to its next option, wrapping around
    ///
    /// # Returns
    /// The update describing the whole selection
    pub fn advance(&mut self, item: MenuItem) -> SettingsUpdate {
        match item {
            MenuItem::Accuracy => self.accuracy = (self.accuracy + 1) % 3,
            MenuItem::RepeatMode => self.meas_type = (self.meas_type + 1) % 2,
            MenuItem::ResultMode => self.data_type = (self.data_type + 1) % 2,
            MenuItem::CalibrationMode => self.mode = (self.mode + 1) % 3,
        }
        self.to_update()
    }

    pub fn to_update(&self) -> SettingsUpdate {
        SettingsUpdate::from_menu(self.mode, self.data_type, self.meas_type, self.accuracy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_bounds() {
        assert!(Accuracy::new(0).is_err());
        assert_eq!(Accuracy::new(1).map(Accuracy::cycles), Ok(1));
        assert_eq!(
            Accuracy::new(CYCLE_CAPACITY as u16).map(Accuracy::cycles),
            Ok(CYCLE_CAPACITY)
        );
        assert_eq!(
            Accuracy::new(CYCLE_CAPACITY as u16 + 1),
            Err(Error::AccuracyOutOfRange {
                requested: CYCLE_CAPACITY as u16 + 1,
                capacity: CYCLE_CAPACITY,
            })
        );
    }

    #[test]
    fn test_commit_applies_all_fields() {
        let mut settings = MeasurementSettings::default();
        let update = SettingsUpdate {
            calibration_mode: Some(CalibrationMode::LNPE),
            result_mode: Some(ResultMode::RawPassthrough),
            repeat_mode: Some(RepeatMode::Continuous),
            accuracy: Some(5),
            stall_timeout_polls: Some(Some(20)),
        };
        assert!(settings.commit(update).is_ok());
        assert_eq!(settings.calibration_mode, CalibrationMode::LNPE);
        assert_eq!(settings.result_mode, ResultMode::RawPassthrough);
        assert_eq!(settings.repeat_mode, RepeatMode::Continuous);
        assert_eq!(settings.accuracy.cycles(), 5);
        assert_eq!(settings.stall_timeout_polls, Some(20));
    }

    #[test]
    fn test_commit_rejects_invalid_accuracy_and_keeps_prior() {
        let mut settings = MeasurementSettings::default();
        settings
            .commit(SettingsUpdate {
                accuracy: Some(5),
                ..SettingsUpdate::default()
            })
            .unwrap();
        let before = settings;

        let update = SettingsUpdate {
            calibration_mode: Some(CalibrationMode::LN),
            accuracy: Some(0),
            ..SettingsUpdate::default()
        };
        assert!(settings.commit(update).is_err());
        assert_eq!(settings, before);
    }

    #[test]
    fn test_from_menu() {
        let update = SettingsUpdate::from_menu(1, 1, 1, 2);
        assert_eq!(update.calibration_mode, Some(CalibrationMode::LN));
        assert_eq!(update.result_mode, Some(ResultMode::RawPassthrough));
        assert_eq!(update.repeat_mode, Some(RepeatMode::Continuous));
        assert_eq!(update.accuracy, Some(10));

        let update = SettingsUpdate::from_menu(7, 0, 0, 9);
        assert_eq!(update.calibration_mode, None);
        assert_eq!(update.accuracy, None);
    }

    #[test]
    fn test_commit_rejects_zero_stall_timeout() {
        let mut settings = MeasurementSettings::firmware_default();
        let before = settings;

        let update = SettingsUpdate {
            repeat_mode: Some(RepeatMode::Continuous),
            stall_timeout_polls: Some(Some(0)),
            ..SettingsUpdate::default()
        };
        assert_eq!(settings.commit(update), Err(Error::ZeroStallTimeout));
        assert_eq!(settings, before);

        // disabling and non-zero limits are still accepted
        assert!(settings
            .commit(SettingsUpdate {
                stall_timeout_polls: Some(None),
                ..SettingsUpdate::default()
            })
            .is_ok());
        assert_eq!(settings.stall_timeout_polls, None);
        assert!(settings
            .commit(SettingsUpdate {
                stall_timeout_polls: Some(Some(1)),
                ..SettingsUpdate::default()
            })
            .is_ok());
        assert_eq!(settings.stall_timeout_polls, Some(1));
    }

    #[test]
    fn test_hold_tiers_select_menus() {
        assert_eq!(MenuItem::from_hold_tier(0), None);
        assert_eq!(MenuItem::from_hold_tier(1), Some(MenuItem::Accuracy));
        assert_eq!(MenuItem::from_hold_tier(2), Some(MenuItem::RepeatMode));
        assert_eq!(MenuItem::from_hold_tier(3), Some(MenuItem::ResultMode));
        assert_eq!(
            MenuItem::from_hold_tier(MenuItem::TIERS),
            Some(MenuItem::CalibrationMode)
        );
        assert_eq!(MenuItem::from_hold_tier(9), Some(MenuItem::CalibrationMode));
    }

    #[test]
    fn test_menu_reaches_every_setting() {
        let mut menu = MenuSelection::default();
        let mut settings = MeasurementSettings::firmware_default();
        assert!(settings.commit(menu.to_update()).is_ok());
        assert_eq!(settings, MeasurementSettings::firmware_default());

        settings.commit(menu.advance(MenuItem::RepeatMode)).unwrap();
        assert_eq!(settings.repeat_mode, RepeatMode::Continuous);

        settings.commit(menu.advance(MenuItem::ResultMode)).unwrap();
        assert_eq!(settings.result_mode, ResultMode::RawPassthrough);

        settings.commit(menu.advance(MenuItem::CalibrationMode)).unwrap();
        settings.commit(menu.advance(MenuItem::CalibrationMode)).unwrap();
        assert_eq!(settings.calibration_mode, CalibrationMode::LNPE);

        settings.commit(menu.advance(MenuItem::Accuracy)).unwrap();
        assert_eq!(settings.accuracy.cycles(), 5);

        // other menus are untouched by a later change
        assert_eq!(settings.repeat_mode, RepeatMode::Continuous);
        assert_eq!(settings.result_mode, ResultMode::RawPassthrough);
        assert_eq!(
            settings.stall_timeout_polls,
            Some(control::DEFAULT_STALL_TIMEOUT_POLLS)
        );
    }

    #[test]
    fn test_menu_wraps_around() {
        let mut menu = MenuSelection::default();
        for _ in 0..3 {
            menu.advance(MenuItem::Accuracy);
        }
        menu.advance(MenuItem::RepeatMode);
        menu.advance(MenuItem::RepeatMode);
        for _ in 0..3 {
            menu.advance(MenuItem::CalibrationMode);
        }
        assert_eq!(menu, MenuSelection::default());
        assert_eq!(menu.to_update().accuracy, Some(1));
        assert_eq!(menu.to_update().repeat_mode, Some(RepeatMode::SingleShot));
    }

    #[test]
    fn test_firmware_default_has_stall_timeout() {
        let settings = MeasurementSettings::firmware_default();
        assert_eq!(
            settings.stall_timeout_polls,
            Some(control::DEFAULT_STALL_TIMEOUT_POLLS)
        );
        assert_eq!(settings.accuracy, Accuracy::ONE);
    }
}
