// One-shot flags exchanged between the sequencer and its collaborators.
// Producers write outside of `Sequencer::poll`, the single consumer reads
// and clears inside it (or the other way round for outputs).

/// Edge-triggered boolean flag
///
/// Raising an already raised flag is a no-op, so a second edge before the
/// consumer polls is lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeFlag {
    raised: bool,
}

impl EdgeFlag {
    pub const fn new() -> Self {
        Self { raised: false }
    }

    /// Set the flag
    pub fn raise(&mut self) {
        self.raised = true;
    }

    /// Read and clear the flag
    pub fn take(&mut self) -> bool {
        core::mem::take(&mut self.raised)
    }

    /// Read the flag without clearing it
    pub fn is_raised(&self) -> bool {
        self.raised
    }
}

/// Single-slot mailbox carrying a value with its edge
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mailbox<T: Copy> {
    slot: Option<T>,
}

impl<T: Copy> Mailbox<T> {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Post a value, replacing one that was not consumed yet
    pub fn post(&mut self, value: T) {
        self.slot = Some(value);
    }

    /// Take the value and empty the slot
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Look at the value without consuming it
    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    pub fn is_full(&self) -> bool {
        self.slot.is_some()
    }
}

impl<T: Copy> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_flag_read_and_clear() {
        let mut flag = EdgeFlag::new();
        assert!(!flag.take());
        flag.raise();
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_mailbox_overwrites_unconsumed_value() {
        let mut mailbox = Mailbox::new();
        mailbox.post(1u32);
        mailbox.post(2u32);
        assert_eq!(mailbox.peek(), Some(&2));
        assert_eq!(mailbox.take(), Some(2));
        assert_eq!(mailbox.take(), None);
        assert!(!mailbox.is_full());
    }
}
