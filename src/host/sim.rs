//! Simulated host - an in-memory mixer that logs every command
//!
//! Lets the surface run without a DAW attached and backs the router tests.
//! Every write that actually changes a value queues a [`HostChange`] which the
//! dispatch loop feeds back into the LED feedback engine.

use super::{
    ChannelId, Host, HostChange, HostCommand, HostError, HostProperty, Parameter, Strip,
    TransportFlag,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Concrete strip after the selected-channel alias has been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StripKey {
    Mixer(ChannelId),
    MainOut,
    FirstFx,
}

pub struct SimHost {
    channels: Vec<ChannelId>,
    removed: HashSet<ChannelId>,
    values: HashMap<(StripKey, Parameter), f64>,
    selected: Option<ChannelId>,
    transport: HashMap<TransportFlag, bool>,
    locked: HashSet<HostProperty>,
    changes: Vec<HostChange>,
    command_counts: HashMap<HostCommand, usize>,
    commands_fired: usize,
}

impl SimHost {
    /// Create a host with `channel_count` mixer channels numbered from 0
    pub fn new(channel_count: u16) -> Self {
        Self {
            channels: (0..channel_count).map(ChannelId).collect(),
            removed: HashSet::new(),
            values: HashMap::new(),
            selected: None,
            transport: HashMap::new(),
            locked: HashSet::new(),
            changes: Vec::new(),
            command_counts: HashMap::new(),
            commands_fired: 0,
        }
    }

    /// Reject every subsequent write to `property`
    pub fn lock(&mut self, property: HostProperty) {
        self.locked.insert(property);
    }

    /// Make a channel disappear, as if the track was deleted in the host
    pub fn remove_channel(&mut self, channel: ChannelId) {
        self.removed.insert(channel);
        if self.selected == Some(channel) {
            self.selected = None;
        }
    }

    pub fn selected_channel(&self) -> Option<ChannelId> {
        self.selected
    }

    /// Number of commands fired so far
    pub fn commands_fired(&self) -> usize {
        self.commands_fired
    }

    pub fn command_count(&self, command: HostCommand) -> usize {
        self.command_counts.get(&command).copied().unwrap_or(0)
    }

    /// Simulate a change made in the host UI, bypassing locks
    pub fn push_external(&mut self, property: HostProperty, value: f64) -> Result<(), HostError> {
        self.store(&property, value)
    }

    /// Simulate a transport change made in the host UI
    pub fn push_external_transport(&mut self, flag: TransportFlag, active: bool) {
        self.apply_transport(flag, active);
    }

    fn resolve(&self, strip: Strip) -> Result<StripKey, HostError> {
        match strip {
            Strip::Mixer(channel) => {
                if self.channels.contains(&channel) && !self.removed.contains(&channel) {
                    Ok(StripKey::Mixer(channel))
                } else {
                    Err(HostError::UnknownChannel(channel))
                }
            }
            Strip::Selected => self
                .selected
                .map(StripKey::Mixer)
                .ok_or(HostError::NoSelection),
            Strip::MainOut => Ok(StripKey::MainOut),
            Strip::FirstFx => Ok(StripKey::FirstFx),
        }
    }

    fn read(&self, key: StripKey, parameter: Parameter) -> f64 {
        if parameter == Parameter::Selected {
            let selected = matches!(key, StripKey::Mixer(id) if Some(id) == self.selected);
            return if selected { 1.0 } else { 0.0 };
        }
        self.values
            .get(&(key, parameter))
            .copied()
            .unwrap_or_else(|| parameter.default_value())
    }

    fn store(&mut self, property: &HostProperty, value: f64) -> Result<(), HostError> {
        let key = self.resolve(property.strip)?;
        let value = value.clamp(0.0, 1.0);

        if property.parameter == Parameter::Selected {
            if let StripKey::Mixer(channel) = key {
                let next = if value >= 0.5 {
                    Some(channel)
                } else if self.selected == Some(channel) {
                    None
                } else {
                    self.selected
                };
                self.select(next);
            }
            return Ok(());
        }

        let previous = self.read(key, property.parameter);
        if (previous - value).abs() < f64::EPSILON {
            return Ok(());
        }
        self.values.insert((key, property.parameter), value);
        self.notify(key, property.parameter, value);
        Ok(())
    }

    /// Queue the notification for a concrete strip, mirrored onto the
    /// selected-channel alias when it points at the same channel
    fn notify(&mut self, key: StripKey, parameter: Parameter, value: f64) {
        let strip = match key {
            StripKey::Mixer(channel) => Strip::Mixer(channel),
            StripKey::MainOut => Strip::MainOut,
            StripKey::FirstFx => Strip::FirstFx,
        };
        self.changes.push(HostChange::Value {
            property: HostProperty::new(strip, parameter),
            value,
        });
        if matches!(key, StripKey::Mixer(id) if Some(id) == self.selected) {
            self.changes.push(HostChange::Value {
                property: HostProperty::selected(parameter),
                value,
            });
        }
    }

    fn select(&mut self, next: Option<ChannelId>) {
        if next == self.selected {
            return;
        }
        let previous = self.selected;
        self.selected = next;
        debug!("SimHost selection {:?} → {:?}", previous, next);

        if let Some(channel) = previous {
            self.changes.push(HostChange::Value {
                property: HostProperty::mixer(channel, Parameter::Selected),
                value: 0.0,
            });
        }
        if let Some(channel) = next {
            self.changes.push(HostChange::Value {
                property: HostProperty::mixer(channel, Parameter::Selected),
                value: 1.0,
            });
        }

        // The selected-channel strip now points elsewhere, or nowhere
        for parameter in Parameter::selected_indicators() {
            let value = next.map_or(0.0, |channel| self.read(StripKey::Mixer(channel), parameter));
            self.changes.push(HostChange::Value {
                property: HostProperty::selected(parameter),
                value,
            });
        }
    }

    fn step_selection(&mut self, forward: bool) {
        let live: Vec<ChannelId> = self
            .channels
            .iter()
            .copied()
            .filter(|c| !self.removed.contains(c))
            .collect();
        if live.is_empty() {
            return;
        }
        let next = match self.selected.and_then(|s| live.iter().position(|&c| c == s)) {
            Some(index) if forward => live[(index + 1).min(live.len() - 1)],
            Some(index) => live[index.saturating_sub(1)],
            None => live[0],
        };
        self.select(Some(next));
    }

    fn apply_transport(&mut self, flag: TransportFlag, active: bool) {
        if self.transport(flag) == active {
            return;
        }
        self.transport.insert(flag, active);
        self.changes.push(HostChange::Transport { flag, active });
    }
}

impl Host for SimHost {
    fn mixer_channels(&self) -> Vec<ChannelId> {
        self.channels.clone()
    }

    fn value(&self, property: &HostProperty) -> Option<f64> {
        self.resolve(property.strip)
            .ok()
            .map(|key| self.read(key, property.parameter))
    }

    fn set_value(&mut self, property: &HostProperty, value: f64) -> Result<(), HostError> {
        if self.locked.contains(property) {
            return Err(HostError::Locked(*property));
        }
        self.store(property, value)
    }

    fn transport(&self, flag: TransportFlag) -> bool {
        self.transport.get(&flag).copied().unwrap_or(false)
    }

    fn set_transport(&mut self, flag: TransportFlag, active: bool) -> Result<(), HostError> {
        debug!("SimHost transport {:?} = {}", flag, active);
        self.apply_transport(flag, active);
        Ok(())
    }

    fn command(&mut self, command: HostCommand, magnitude: u32) -> Result<(), HostError> {
        self.commands_fired += 1;
        *self.command_counts.entry(command).or_insert(0) += 1;
        info!(
            "🎮 [{}] {} → {} (x{}) [cmd #{}]",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            command.category(),
            command.name(),
            magnitude,
            self.commands_fired
        );

        match command {
            HostCommand::Stop => {
                self.apply_transport(TransportFlag::Start, false);
                self.apply_transport(TransportFlag::Record, false);
            }
            HostCommand::SelectPreviousTrack => self.step_selection(false),
            HostCommand::SelectNextTrack => self.step_selection(true),
            _ => {}
        }
        Ok(())
    }

    fn drain_changes(&mut self) -> Vec<HostChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(channel: u16) -> HostProperty {
        HostProperty::mixer(ChannelId(channel), Parameter::Volume)
    }

    #[test]
    fn test_set_value_queues_change_once() {
        let mut host = SimHost::new(24);
        host.set_value(&volume(3), 0.4).unwrap();
        host.set_value(&volume(3), 0.4).unwrap();

        let changes = host.drain_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0],
            HostChange::Value {
                property: volume(3),
                value: 0.4
            }
        );
        assert!(host.drain_changes().is_empty());
    }

    #[test]
    fn test_selected_strip_requires_selection() {
        let mut host = SimHost::new(24);
        let pan = HostProperty::selected(Parameter::Pan);

        assert_eq!(host.value(&pan), None);
        assert_eq!(host.set_value(&pan, 0.2), Err(HostError::NoSelection));

        host.set_value(&HostProperty::mixer(ChannelId(5), Parameter::Selected), 1.0)
            .unwrap();
        host.set_value(&pan, 0.2).unwrap();
        assert_eq!(
            host.value(&HostProperty::mixer(ChannelId(5), Parameter::Pan)),
            Some(0.2)
        );
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut host = SimHost::new(24);
        let select = |c| HostProperty::mixer(ChannelId(c), Parameter::Selected);

        host.set_value(&select(1), 1.0).unwrap();
        host.set_value(&select(2), 1.0).unwrap();

        assert_eq!(host.selected_channel(), Some(ChannelId(2)));
        assert_eq!(host.value(&select(1)), Some(0.0));
        assert_eq!(host.value(&select(2)), Some(1.0));

        host.set_value(&select(2), 0.0).unwrap();
        assert_eq!(host.selected_channel(), None);
    }

    #[test]
    fn test_deselect_clears_selected_strip_indicators() {
        let mut host = SimHost::new(24);
        let select = HostProperty::mixer(ChannelId(4), Parameter::Selected);
        let send_on = Parameter::SendOn(crate::state::AuxSend::Aux2);

        host.set_value(&select, 1.0).unwrap();
        host.set_value(&HostProperty::mixer(ChannelId(4), send_on), 1.0)
            .unwrap();
        host.drain_changes();

        host.set_value(&select, 0.0).unwrap();
        let changes = host.drain_changes();
        assert!(changes.contains(&HostChange::Value {
            property: HostProperty::selected(send_on),
            value: 0.0
        }));
        assert!(!changes.iter().any(|c| matches!(
            c,
            HostChange::Value { property, value } if property.strip == Strip::Selected && *value != 0.0
        )));
    }

    #[test]
    fn test_locked_and_removed_reject_writes() {
        let mut host = SimHost::new(24);
        host.lock(volume(0));
        assert_eq!(host.set_value(&volume(0), 1.0), Err(HostError::Locked(volume(0))));

        host.remove_channel(ChannelId(1));
        assert_eq!(
            host.set_value(&volume(1), 1.0),
            Err(HostError::UnknownChannel(ChannelId(1)))
        );
        assert!(host.drain_changes().is_empty());
    }

    #[test]
    fn test_stop_command_clears_start() {
        let mut host = SimHost::new(24);
        host.set_transport(TransportFlag::Start, true).unwrap();
        host.command(HostCommand::Stop, 1).unwrap();

        assert!(!host.transport(TransportFlag::Start));
        assert_eq!(host.command_count(HostCommand::Stop), 1);
        assert_eq!(
            host.drain_changes(),
            vec![
                HostChange::Transport {
                    flag: TransportFlag::Start,
                    active: true
                },
                HostChange::Transport {
                    flag: TransportFlag::Start,
                    active: false
                },
            ]
        );
    }

    #[test]
    fn test_commands_are_counted_not_logged() {
        let mut host = SimHost::new(24);
        for _ in 0..500 {
            host.command(HostCommand::ZoomIn, 1).unwrap();
        }
        host.command(HostCommand::ZoomOut, 1000).unwrap();

        assert_eq!(host.commands_fired(), 501);
        assert_eq!(host.command_count(HostCommand::ZoomIn), 500);
        assert_eq!(host.command_count(HostCommand::ZoomOut), 1);
        assert_eq!(host.command_count(HostCommand::Cycle), 0);
    }

    #[test]
    fn test_track_navigation_walks_channels() {
        let mut host = SimHost::new(3);
        host.command(HostCommand::SelectNextTrack, 1).unwrap();
        assert_eq!(host.selected_channel(), Some(ChannelId(0)));
        host.command(HostCommand::SelectNextTrack, 1).unwrap();
        host.command(HostCommand::SelectNextTrack, 1).unwrap();
        host.command(HostCommand::SelectNextTrack, 1).unwrap();
        assert_eq!(host.selected_channel(), Some(ChannelId(2)));
        host.command(HostCommand::SelectPreviousTrack, 1).unwrap();
        assert_eq!(host.selected_channel(), Some(ChannelId(1)));
    }
}
