//! Logical PTZ commands and the integer command space they are decoded from.

use serde::Serialize;

use super::{PtzError, Result};

pub const CMD_RIGHT: u32 = 0x0000_0001;
pub const CMD_LEFT: u32 = 0x0000_0002;
pub const CMD_UP: u32 = 0x0000_0010;
pub const CMD_DOWN: u32 = 0x0000_0020;
pub const CMD_IN: u32 = 0x0000_0100;
pub const CMD_OUT: u32 = 0x0000_0200;
pub const CMD_SAVE: u32 = 0x0000_1000;
pub const CMD_GO: u32 = 0x0000_2000;
pub const CMD_CLEAR: u32 = 0x0000_4000;
pub const CMD_STOP: u32 = 0x0001_0000;

pub const CMDS_MOVE_MASK: u32 = 0x0000_0FFF;
pub const CMDS_PRESET_MASK: u32 = 0x0000_F000;

const CMDS_KNOWN: u32 = CMD_RIGHT
    | CMD_LEFT
    | CMD_UP
    | CMD_DOWN
    | CMD_IN
    | CMD_OUT
    | CMD_SAVE
    | CMD_GO
    | CMD_CLEAR
    | CMD_STOP;

/// Mid-scale speed used when no valid speed is supplied
pub const DEFAULT_SPEED: u8 = 0x20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
        Direction::ZoomIn,
        Direction::ZoomOut,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::ZoomIn => Direction::ZoomOut,
            Direction::ZoomOut => Direction::ZoomIn,
        }
    }

    pub fn bit(self) -> u32 {
        match self {
            Direction::Right => CMD_RIGHT,
            Direction::Left => CMD_LEFT,
            Direction::Up => CMD_UP,
            Direction::Down => CMD_DOWN,
            Direction::ZoomIn => CMD_IN,
            Direction::ZoomOut => CMD_OUT,
        }
    }

    fn index(self) -> u8 {
        match self {
            Direction::Right => 0,
            Direction::Left => 1,
            Direction::Up => 2,
            Direction::Down => 3,
            Direction::ZoomIn => 4,
            Direction::ZoomOut => 5,
        }
    }
}

/// Set of directions in one move command.
///
/// Only built through [`CommandBuilder`], so a set taken from a valid
/// command never holds opposite directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Directions(u8);

impl Directions {
    const EMPTY: Directions = Directions(0);

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }

    fn insert(&mut self, direction: Direction) {
        self.0 |= 1 << direction.index();
    }

    fn has_conflict(self) -> bool {
        self.iter().any(|d| self.contains(d.opposite()))
    }
}

impl Serialize for Directions {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PresetAction {
    Save,
    Go,
    Clear,
}

impl PresetAction {
    pub const ALL: [PresetAction; 3] = [PresetAction::Save, PresetAction::Go, PresetAction::Clear];

    pub fn bit(self) -> u32 {
        match self {
            PresetAction::Save => CMD_SAVE,
            PresetAction::Go => CMD_GO,
            PresetAction::Clear => CMD_CLEAR,
        }
    }
}

/// Pan and tilt speed bytes carried by a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Speeds {
    pub pan: u8,
    pub tilt: u8,
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            pan: DEFAULT_SPEED,
            tilt: DEFAULT_SPEED,
        }
    }
}

impl Speeds {
    /// Out-of-range values fall back to mid-scale instead of being rejected
    pub fn from_raw(pan: i32, tilt: i32) -> Self {
        Self {
            pan: u8::try_from(pan).unwrap_or(DEFAULT_SPEED),
            tilt: u8::try_from(tilt).unwrap_or(DEFAULT_SPEED),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalCommand {
    Stop,
    Move { directions: Directions, speeds: Speeds },
    Preset { action: PresetAction, id: u8 },
}

impl LogicalCommand {
    pub fn builder() -> CommandBuilder {
        CommandBuilder::default()
    }

    pub fn movement(directions: &[Direction], speeds: Speeds) -> Result<Self> {
        directions
            .iter()
            .fold(CommandBuilder::default(), |b, d| b.direction(*d))
            .speeds(speeds)
            .build()
    }

    pub fn preset(action: PresetAction, id: u8) -> Self {
        LogicalCommand::Preset { action, id }
    }

    /// Decode the integer command space.
    ///
    /// Speeds outside 0..=255 fall back to mid-scale. The preset id only
    /// matters for preset commands, where it must fit in one byte.
    pub fn from_bits(bits: u32, pan_speed: i32, tilt_speed: i32, preset_id: i32) -> Result<Self> {
        if bits & !CMDS_KNOWN != 0 {
            return Err(PtzError::InvalidCommand("unknown command bits"));
        }

        let mut builder = CommandBuilder::default().speeds(Speeds::from_raw(pan_speed, tilt_speed));
        if bits & CMD_STOP != 0 {
            builder = builder.stop();
        }
        for direction in Direction::ALL {
            if bits & direction.bit() != 0 {
                builder = builder.direction(direction);
            }
        }
        for action in PresetAction::ALL {
            if bits & action.bit() != 0 {
                builder = builder.preset(action);
            }
        }
        if bits & CMDS_PRESET_MASK != 0 {
            let id = u8::try_from(preset_id)
                .map_err(|_| PtzError::InvalidCommand("preset id out of range"))?;
            builder = builder.preset_id(id);
        }

        builder.build()
    }

    pub fn to_bits(&self) -> u32 {
        match self {
            LogicalCommand::Stop => CMD_STOP,
            LogicalCommand::Move { directions, .. } => {
                directions.iter().fold(0, |acc, d| acc | d.bit())
            }
            LogicalCommand::Preset { action, .. } => action.bit(),
        }
    }

    /// Move commands must be followed by a stop after the caller's delay
    pub fn needs_auto_stop(&self) -> bool {
        matches!(self, LogicalCommand::Move { .. })
    }

    /// Re-check the legality rules before anything is sent
    pub fn validate(&self) -> Result<()> {
        match self {
            LogicalCommand::Move { directions, .. } if directions.is_empty() => {
                Err(PtzError::InvalidCommand("move without a direction"))
            }
            LogicalCommand::Move { directions, .. } if directions.has_conflict() => {
                Err(PtzError::InvalidCommand("conflicting directions"))
            }
            _ => Ok(()),
        }
    }
}

/// Collects command flags and checks them against the legality rules
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    stop: bool,
    directions: Directions,
    presets: Vec<PresetAction>,
    speeds: Speeds,
    preset_id: Option<u8>,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self {
            stop: false,
            directions: Directions::EMPTY,
            presets: Vec::new(),
            speeds: Speeds::default(),
            preset_id: None,
        }
    }
}

impl CommandBuilder {
    pub fn stop(mut self) -> Self {
        self.stop = true;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.directions.insert(direction);
        self
    }

    pub fn preset(mut self, action: PresetAction) -> Self {
        if !self.presets.contains(&action) {
            self.presets.push(action);
        }
        self
    }

    pub fn speeds(mut self, speeds: Speeds) -> Self {
        self.speeds = speeds;
        self
    }

    pub fn pan_speed(mut self, speed: i32) -> Self {
        self.speeds.pan = Speeds::from_raw(speed, 0).pan;
        self
    }

    pub fn tilt_speed(mut self, speed: i32) -> Self {
        self.speeds.tilt = Speeds::from_raw(0, speed).tilt;
        self
    }

    pub fn preset_id(mut self, id: u8) -> Self {
        self.preset_id = Some(id);
        self
    }

    pub fn build(self) -> Result<LogicalCommand> {
        let has_moves = !self.directions.is_empty();
        let has_presets = !self.presets.is_empty();

        // Stop is only useful by itself
        if self.stop {
            if has_moves || has_presets {
                return Err(PtzError::InvalidCommand("stop cannot be combined with other commands"));
            }
            return Ok(LogicalCommand::Stop);
        }

        if has_moves && has_presets {
            return Err(PtzError::InvalidCommand("move and preset commands cannot be combined"));
        }

        if self.directions.has_conflict() {
            return Err(PtzError::InvalidCommand("conflicting directions"));
        }

        if has_moves {
            return Ok(LogicalCommand::Move {
                directions: self.directions,
                speeds: self.speeds,
            });
        }

        match self.presets.as_slice() {
            [] => Err(PtzError::InvalidCommand("empty command")),
            [action] => {
                let id = self
                    .preset_id
                    .ok_or(PtzError::InvalidCommand("preset command without a preset id"))?;
                Ok(LogicalCommand::Preset { action: *action, id })
            }
            _ => Err(PtzError::InvalidCommand("preset commands are exclusive")),
        }
    }
}
