use super::values::{DecFloat, Numeral};
use crate::{config::Calibration, types::Command, CommandRecord, Config};

/// The field letters the parser knows about.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum Word {
    G,
    M,
    X,
    Y,
    Z,
    E,
    F,
    S,
    P,
    T,
    N,
    Checksum,
}

impl Word {
    /// `b` must already be upper case.
    pub(crate) fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'G' => Self::G,
            b'M' => Self::M,
            b'X' => Self::X,
            b'Y' => Self::Y,
            b'Z' => Self::Z,
            b'E' => Self::E,
            b'F' => Self::F,
            b'S' => Self::S,
            b'P' => Self::P,
            b'T' => Self::T,
            b'N' => Self::N,
            b'*' => Self::Checksum,
            _ => return None,
        })
    }

    pub(crate) fn letter(&self) -> char {
        match self {
            Self::G => 'G',
            Self::M => 'M',
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
            Self::E => 'E',
            Self::F => 'F',
            Self::S => 'S',
            Self::P => 'P',
            Self::T => 'T',
            Self::N => 'N',
            Self::Checksum => '*',
        }
    }

    /// How this field's value is turned into an integer given the current line's state.
    pub(crate) fn conversion(&self, record: &CommandRecord, config: &Config) -> Conversion {
        let distance = |calibration: Calibration| {
            if record.inches {
                Conversion::Scaled(calibration.steps_per_inch, 1)
            } else {
                Conversion::Scaled(calibration.steps_per_m, 1000)
            }
        };
        match self {
            Self::G | Self::M | Self::T | Self::Checksum => Conversion::Mantissa,
            Self::X => distance(config.calibration.x),
            Self::Y => distance(config.calibration.y),
            Self::Z => distance(config.calibration.z),
            Self::E => distance(config.calibration.e),
            Self::F if record.inches => Conversion::Scaled(254, 10),
            Self::F => Conversion::Scaled(1, 1),
            // quarter degrees
            Self::S if record.command.is_set_temperature() => Conversion::Scaled(4, 1),
            Self::S if record.command.is_heater_pid() => Conversion::Scaled(config.pid_scale, 1),
            Self::S => Conversion::Scaled(1, 1),
            // seconds to milliseconds
            Self::P if record.command.is_dwell() => Conversion::Scaled(1000, 1),
            Self::P => Conversion::Scaled(1, 1),
            Self::N => Conversion::Scaled(1, 1),
        }
    }

    /// Side effects of recognising the letter, before any digit is read.
    pub(crate) fn start(&self, record: &mut CommandRecord) {
        let seen = &mut record.seen;
        match self {
            Self::G => record.command = Command::General(0),
            Self::M => record.command = Command::Machine(0),
            Self::X => seen.x = true,
            Self::Y => seen.y = true,
            Self::Z => seen.z = true,
            Self::E => seen.e = true,
            Self::F => seen.f = true,
            Self::S => seen.s = true,
            Self::P => seen.p = true,
            Self::T => seen.t = true,
            Self::N => seen.n = true,
            Self::Checksum => seen.checksum = true,
        }
    }

    /// Stores the converted value in its slot.
    pub(crate) fn store(&self, record: &mut CommandRecord, value: i32) {
        match self {
            Self::G => record.command = Command::General(value as u32),
            Self::M => record.command = Command::Machine(value as u32),
            Self::X => record.target.x = value,
            Self::Y => record.target.y = value,
            Self::Z => record.target.z = value,
            Self::E => record.target.e = value,
            Self::F => record.feed_rate = value,
            Self::S => record.s = value,
            Self::P => record.p = value,
            Self::T => record.tool = value as u32,
            Self::N => record.line_number = value,
            Self::Checksum => record.checksum_read = value as u8,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum Conversion {
    /// The digits taken as an integer, ignoring the sign and the decimal point.
    Mantissa,
    /// `round(value * multiplicand / denominator)`.
    Scaled(u32, u32),
}

impl Conversion {
    pub(crate) fn apply(&self, value: &DecFloat) -> i32 {
        match *self {
            Self::Mantissa => value.mantissa() as i32,
            Self::Scaled(multiplicand, denominator) => value.to_int(multiplicand, denominator),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum State {
    Idle,
    /// Reading the value of a field. `None` for letters that are not understood, their value is
    /// read and then discarded.
    Field(Option<Word>),
    ParenComment,
    LineComment,
}

/// What the parser must do with the current byte, in field order.
#[derive(PartialEq, Eq, Debug, Default, Clone, Copy)]
pub(crate) struct Effects {
    /// The field being read is complete.
    pub commit: bool,
    pub start: Option<Word>,
    pub numeral: Option<Numeral>,
    pub end_of_line: bool,
}

pub(crate) fn transition(state: State, byte: u8) -> (State, Effects) {
    let pending = matches!(state, State::Field(_));
    let b = byte.to_ascii_uppercase();
    match (state, b) {
        (_, b'\r' | b'\n') => (
            State::Idle,
            Effects {
                commit: pending,
                end_of_line: true,
                ..Effects::default()
            },
        ),
        (State::LineComment, _) => (state, Effects::default()),
        (State::ParenComment, b')') => (State::Idle, Effects::default()),
        (State::ParenComment, _) => (state, Effects::default()),
        (_, b'A'..=b'Z' | b'*') => {
            let word = Word::from_byte(b);
            (
                State::Field(word),
                Effects {
                    commit: pending,
                    start: word,
                    ..Effects::default()
                },
            )
        }
        (_, b';') => (
            State::LineComment,
            Effects {
                commit: pending,
                ..Effects::default()
            },
        ),
        (_, b'(') => (
            State::ParenComment,
            Effects {
                commit: pending,
                ..Effects::default()
            },
        ),
        (State::Field(_), _) => (
            state,
            Effects {
                numeral: Numeral::from_byte(b),
                ..Effects::default()
            },
        ),
        (State::Idle, _) => (state, Effects::default()),
    }
}
