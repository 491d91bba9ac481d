//! Channel bank index - windows 24 host channels onto 8 strips
//!
//! The handle list is acquired once at startup and must keep its length and
//! order for the process lifetime. Reordering tracks while running is not
//! supported; the index never re-reads the host.

use crate::binding::BindingError;
use crate::controls::{Slot, STRIP_COUNT};
use crate::host::ChannelId;
use crate::state::FunctionBank;
use std::collections::HashMap;

/// Strips per function bank
pub const BANK_SIZE: usize = STRIP_COUNT;

/// Channels reachable through F1-F3
pub const TOTAL_TRACK_COUNT: usize = BANK_SIZE * FunctionBank::ALL.len();

#[derive(Debug, Clone)]
pub struct ChannelBank {
    handles: Vec<ChannelId>,
    positions: HashMap<ChannelId, (FunctionBank, Slot)>,
}

impl ChannelBank {
    /// Build the index, failing fast on a list of the wrong size or with
    /// repeated handles
    pub fn new(handles: Vec<ChannelId>) -> Result<Self, BindingError> {
        if handles.len() != TOTAL_TRACK_COUNT {
            return Err(BindingError::ChannelCount {
                expected: TOTAL_TRACK_COUNT,
                found: handles.len(),
            });
        }

        let mut positions = HashMap::with_capacity(TOTAL_TRACK_COUNT);
        for (index, &handle) in handles.iter().enumerate() {
            let bank = FunctionBank::from_index(index / BANK_SIZE)
                .ok_or(BindingError::SlotOutOfRange(index))?;
            let slot = Slot::new(index % BANK_SIZE)?;
            if positions.insert(handle, (bank, slot)).is_some() {
                return Err(BindingError::DuplicateChannel(handle));
            }
        }

        Ok(Self { handles, positions })
    }

    /// Handle windowed under `slot` of `bank`
    pub fn resolve(&self, bank: FunctionBank, slot: Slot) -> ChannelId {
        self.handles[bank.index() * BANK_SIZE + slot.index()]
    }

    /// Reverse lookup used by the visibility filter
    pub fn locate(&self, channel: ChannelId) -> Option<(FunctionBank, Slot)> {
        self.positions.get(&channel).copied()
    }

    /// The 8 channels shown for `bank`, in slot order
    pub fn window(&self, bank: FunctionBank) -> impl Iterator<Item = (Slot, ChannelId)> + '_ {
        Slot::ALL.into_iter().map(move |slot| (slot, self.resolve(bank, slot)))
    }

    pub fn handles(&self) -> &[ChannelId] {
        &self.handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sequential() -> ChannelBank {
        ChannelBank::new((0..24).map(ChannelId).collect()).unwrap()
    }

    #[test]
    fn test_resolve_windows_by_bank() {
        let bank = sequential();
        assert_eq!(bank.resolve(FunctionBank::F1, Slot::ALL[0]), ChannelId(0));
        assert_eq!(bank.resolve(FunctionBank::F2, Slot::ALL[0]), ChannelId(8));
        assert_eq!(bank.resolve(FunctionBank::F3, Slot::ALL[7]), ChannelId(23));

        let f2: Vec<_> = bank.window(FunctionBank::F2).map(|(_, c)| c.0).collect();
        assert_eq!(f2, (8..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_locate_inverts_resolve() {
        let bank = sequential();
        assert_eq!(
            bank.locate(ChannelId(11)),
            Some((FunctionBank::F2, Slot::ALL[3]))
        );
        assert_eq!(bank.locate(ChannelId(99)), None);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = ChannelBank::new((0..16).map(ChannelId).collect()).unwrap_err();
        assert_eq!(
            err,
            BindingError::ChannelCount {
                expected: 24,
                found: 16
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_handles() {
        let mut handles: Vec<_> = (0..24).map(ChannelId).collect();
        handles[20] = ChannelId(4);
        assert_eq!(
            ChannelBank::new(handles).unwrap_err(),
            BindingError::DuplicateChannel(ChannelId(4))
        );
    }

    proptest! {
        #[test]
        fn prop_resolve_is_injective_and_stable(seed in prop::collection::hash_set(0u16..1000, 24)) {
            let handles: Vec<ChannelId> = seed.into_iter().map(ChannelId).collect();
            let bank = ChannelBank::new(handles.clone()).unwrap();

            let mut seen = std::collections::HashSet::new();
            for fb in FunctionBank::ALL {
                for slot in Slot::ALL {
                    let first = bank.resolve(fb, slot);
                    prop_assert_eq!(first, bank.resolve(fb, slot));
                    prop_assert_eq!(bank.locate(first), Some((fb, slot)));
                    prop_assert!(seen.insert(first));
                }
            }
            prop_assert_eq!(seen.len(), handles.len());
        }
    }
}
