//! US-428 binding layout
//!
//! Declares every (control, predicate, target) triple of the surface. Channel
//! strips get one binding per function bank with the resolved handle baked
//! in, so a bank switch only has to re-activate, never re-resolve.

use super::{Binding, ModeAction, ModePredicate, Target, ValuePolicy, ValueRange};
use crate::bank::ChannelBank;
use crate::config::SurfaceOptions;
use crate::controls::{Control, Slot};
use crate::host::{HostCommand, HostProperty, Parameter, Strip, TransportFlag};
use crate::state::{
    AssignMode, AuxSend, EqBand, FunctionBank, ModeValue, SoloMode,
};

/// Build the full binding list for the surface
pub fn us428_bindings(bank: &ChannelBank, options: &SurfaceOptions) -> Vec<Binding> {
    let mut bindings = Vec::with_capacity(160);
    strip_bindings(&mut bindings, bank, options);
    master_bindings(&mut bindings, options);
    eq_bindings(&mut bindings, options);
    aux_bindings(&mut bindings);
    transport_bindings(&mut bindings);
    mode_bindings(&mut bindings);
    bindings
}

fn normal() -> ModePredicate {
    ModePredicate::always().assign(AssignMode::Normal)
}

fn assign() -> ModePredicate {
    ModePredicate::always().assign(AssignMode::Assign)
}

fn strip_bindings(out: &mut Vec<Binding>, bank: &ChannelBank, options: &SurfaceOptions) {
    for fb in FunctionBank::ALL {
        for slot in Slot::ALL {
            let channel = bank.resolve(fb, slot);
            let in_bank = ModePredicate::always().bank(fb);

            if !options.disable_faders {
                out.push(Binding::new(
                    Control::Fader(slot),
                    in_bank,
                    Target::scaled(HostProperty::mixer(channel, Parameter::Volume)),
                ));
            }

            out.push(Binding::new(
                Control::Mute(slot),
                in_bank.solo(SoloMode::Mute),
                Target::Toggle(HostProperty::mixer(channel, Parameter::Mute)),
            ));
            out.push(Binding::new(
                Control::Mute(slot),
                in_bank.solo(SoloMode::Solo),
                Target::Toggle(HostProperty::mixer(channel, Parameter::Solo)),
            ));

            // In Solo the rec row becomes the select row
            out.push(Binding::new(
                Control::Rec(slot),
                in_bank.solo(SoloMode::Mute),
                Target::Toggle(HostProperty::mixer(channel, Parameter::RecordEnable)),
            ));
            out.push(Binding::new(
                Control::Rec(slot),
                in_bank.solo(SoloMode::Solo),
                Target::Toggle(HostProperty::mixer(channel, Parameter::Selected)),
            ));
        }
    }
}

fn master_bindings(out: &mut Vec<Binding>, options: &SurfaceOptions) {
    if !options.disable_faders {
        out.push(Binding::new(
            Control::MasterFader,
            normal(),
            Target::Property {
                property: HostProperty::new(Strip::MainOut, Parameter::Volume),
                policy: ValuePolicy::Scaled,
                range: ValueRange::new(0.0, options.master_fader_scale),
            },
        ));
        out.push(Binding::new(
            Control::MasterFader,
            assign(),
            Target::scaled(HostProperty::new(Strip::FirstFx, Parameter::Volume)),
        ));
    }

    out.push(Binding::new(
        Control::RecMaster,
        normal(),
        Target::Command(HostCommand::BypassMainInserts),
    ));
    out.push(Binding::new(
        Control::RecMaster,
        assign(),
        Target::Toggle(HostProperty::selected(Parameter::EditorOpen)),
    ));

    out.push(Binding::new(
        Control::Pan,
        normal(),
        Target::scaled(HostProperty::selected(Parameter::Pan)),
    ));
    out.push(Binding::new(
        Control::Pan,
        assign(),
        Target::scaled(HostProperty::selected(Parameter::Volume)),
    ));

    let locators = [
        (Control::LocateLeft, HostCommand::LocatePreviousMarker, HostCommand::SetLeftLocator),
        (Control::LocateRight, HostCommand::LocateNextMarker, HostCommand::SetRightLocator),
        (Control::LocateSet, HostCommand::InsertMarker, HostCommand::Cycle),
    ];
    for (control, plain, assigned) in locators {
        out.push(Binding::new(control, normal(), Target::Command(plain)));
        out.push(Binding::new(control, assign(), Target::Command(assigned)));
    }
}

fn eq_bindings(out: &mut Vec<Binding>, options: &SurfaceOptions) {
    for band in EqBand::ALL {
        let selected = ModePredicate::always().eq_band(band);
        let prefilter = options.low_eq_prefilter && band == EqBand::Low;

        let (gain, freq, q) = if prefilter {
            (
                Target::scaled(HostProperty::selected(Parameter::PreFilterGain)),
                Target::scaled(HostProperty::selected(Parameter::LowCutFreq)),
                Target::jump(HostProperty::selected(Parameter::LowCutSlope)),
            )
        } else {
            (
                Target::scaled(HostProperty::selected(Parameter::EqGain(band))),
                Target::scaled(HostProperty::selected(Parameter::EqFreq(band))),
                Target::scaled(HostProperty::selected(Parameter::EqQ(band))),
            )
        };
        out.push(Binding::new(Control::EqGain, selected, gain));
        out.push(Binding::new(Control::EqFreq, selected, freq));
        out.push(Binding::new(Control::EqQ, selected, q));

        let band_on = if prefilter {
            Parameter::LowCutOn
        } else {
            Parameter::EqOn(band)
        };
        out.push(Binding::new(
            Control::EqButton(band),
            normal(),
            Target::Mode(ModeAction::Set(ModeValue::EqBand(band))),
        ));
        out.push(Binding::new(
            Control::EqButton(band),
            assign(),
            Target::Toggle(HostProperty::selected(band_on)),
        ));
    }
}

fn aux_bindings(out: &mut Vec<Binding>) {
    for aux in AuxSend::ALL {
        out.push(Binding::new(
            Control::Aux(aux),
            normal(),
            Target::Mode(ModeAction::Set(ModeValue::Aux(aux))),
        ));
        out.push(Binding::new(
            Control::Aux(aux),
            assign(),
            Target::Toggle(HostProperty::selected(Parameter::SendOn(aux))),
        ));
        out.push(Binding::new(
            Control::JogWheel,
            normal().aux(aux),
            Target::scaled(HostProperty::selected(Parameter::SendLevel(aux))),
        ));
    }
    out.push(Binding::new(Control::JogWheel, assign(), Target::Zoom));
}

fn transport_bindings(out: &mut Vec<Binding>) {
    let toggles = [
        (Control::Play, TransportFlag::Start),
        (Control::Record, TransportFlag::Record),
        (Control::Null, TransportFlag::Metronome),
    ];
    for (control, flag) in toggles {
        out.push(Binding::always(control, Target::Transport { flag, toggle: true }));
    }
    out.push(Binding::always(
        Control::FastForward,
        Target::Transport {
            flag: TransportFlag::Forward,
            toggle: false,
        },
    ));
    out.push(Binding::always(Control::Rewind, Target::RewindChord));
    out.push(Binding::always(Control::Stop, Target::Command(HostCommand::Stop)));
    out.push(Binding::always(
        Control::BankLeft,
        Target::Command(HostCommand::SelectPreviousTrack),
    ));
    out.push(Binding::always(
        Control::BankRight,
        Target::Command(HostCommand::SelectNextTrack),
    ));
}

fn mode_bindings(out: &mut Vec<Binding>) {
    out.push(Binding::always(Control::Assign, Target::Mode(ModeAction::ToggleAssign)));
    out.push(Binding::always(Control::Solo, Target::Mode(ModeAction::ToggleSolo)));
    for fb in FunctionBank::ALL {
        out.push(Binding::always(
            Control::Function(fb),
            Target::Mode(ModeAction::Set(ModeValue::FunctionBank(fb))),
        ));
    }
}
