use super::codec::{EncodedCommand, PtzProtocolCodec};
use super::command::{Direction, LogicalCommand, PresetAction, DEFAULT_SPEED};
use super::frame::WireFrame;
use crate::config::Protocol;

/// Pelco command opcodes for preset handling
pub const OP_PRESET_SAVE: u8 = 0x03;
pub const OP_PRESET_CLEAR: u8 = 0x05;
pub const OP_PRESET_GO: u8 = 0x07;

#[derive(Debug, Clone, Copy, Default)]
pub struct PelcoCodec;

impl PelcoCodec {
    fn direction_bit(direction: Direction) -> u8 {
        match direction {
            Direction::Right => 1 << 1,
            Direction::Left => 1 << 2,
            Direction::Up => 1 << 3,
            Direction::Down => 1 << 4,
            Direction::ZoomIn => 1 << 5,
            Direction::ZoomOut => 1 << 6,
        }
    }

    fn preset_opcode(action: PresetAction) -> u8 {
        match action {
            PresetAction::Save => OP_PRESET_SAVE,
            PresetAction::Go => OP_PRESET_GO,
            PresetAction::Clear => OP_PRESET_CLEAR,
        }
    }
}

impl PtzProtocolCodec for PelcoCodec {
    fn protocol(&self) -> Protocol {
        Protocol::Pelco
    }

    fn encode(&self, address: u8, command: &LogicalCommand) -> EncodedCommand {
        match command {
            LogicalCommand::Stop => EncodedCommand {
                frame: WireFrame::new(address, 0, DEFAULT_SPEED, DEFAULT_SPEED),
                auto_stop: None,
            },
            LogicalCommand::Move { directions, speeds } => {
                let bits = directions
                    .iter()
                    .fold(0u8, |acc, d| acc | Self::direction_bit(d));
                EncodedCommand {
                    frame: WireFrame::new(address, bits, speeds.pan, speeds.tilt),
                    auto_stop: Some(WireFrame::stop()),
                }
            }
            // Presets reuse the data bytes: pan is zero, tilt carries the index
            LogicalCommand::Preset { action, id } => EncodedCommand {
                frame: WireFrame::new(address, Self::preset_opcode(*action), 0, *id),
                auto_stop: None,
            },
        }
    }
}
