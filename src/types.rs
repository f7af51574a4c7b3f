/// One value per axis: three spatial axes and the extruder.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Axes<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub e: T,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    /// `G` code.
    General(u32),
    /// `M` code.
    Machine(u32),
}

impl Command {
    /// `G1`, assumed for every line that does not carry its own command.
    pub const LINEAR_MOVE: Self = Command::General(1);

    pub fn is_dwell(&self) -> bool {
        matches!(self, Command::General(4))
    }

    pub fn is_set_temperature(&self) -> bool {
        matches!(self, Command::Machine(104 | 109))
    }

    pub fn is_heater_pid(&self) -> bool {
        matches!(self, Command::Machine(130..=132))
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::LINEAR_MOVE
    }
}

/// Which fields were present on the current line.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Seen {
    pub x: bool,
    pub y: bool,
    pub z: bool,
    pub e: bool,
    pub f: bool,
    pub s: bool,
    pub p: bool,
    pub t: bool,
    pub n: bool,
    pub checksum: bool,
}

/// The command being assembled from the current line.
///
/// Targets are expressed in steps. `feed_rate` is kept in the unit it was received in (scaled to
/// mm when in inches mode) as converting it needs the move's length. `s` and `p` are scaled
/// according to the active command (quarter degrees for temperatures, milliseconds for dwells).
///
/// Values are modal: a field absent from a line leaves the previous value in place, use [`Seen`]
/// to know what the current line actually carried.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CommandRecord {
    pub command: Command,
    pub target: Axes<i32>,
    pub feed_rate: i32,
    pub s: i32,
    pub p: i32,
    pub seen: Seen,
    /// Distances are in inches instead of millimetres.
    pub inches: bool,
    /// X, Y and Z are relative to the current position. E is always relative.
    pub relative: bool,
    pub expected_line_number: i32,
    pub(crate) tool: u32,
    pub(crate) line_number: i32,
    pub(crate) checksum_read: u8,
    pub(crate) checksum_computed: u8,
}

impl CommandRecord {
    pub fn new() -> Self {
        Self {
            command: Command::LINEAR_MOVE,
            target: Axes::default(),
            feed_rate: 0,
            s: 0,
            p: 0,
            seen: Seen::default(),
            inches: false,
            relative: false,
            expected_line_number: 0,
            tool: 0,
            line_number: 0,
            checksum_read: 0,
            checksum_computed: 0,
        }
    }

    pub fn line_number(&self) -> Option<i32> {
        self.seen.n.then_some(self.line_number)
    }

    pub fn tool(&self) -> Option<u32> {
        self.seen.t.then_some(self.tool)
    }

    /// The value of the line's `*` field, if any.
    pub fn checksum_read(&self) -> Option<u8> {
        self.seen.checksum.then_some(self.checksum_read)
    }

    /// Running xor of the line bytes received so far.
    pub fn checksum_computed(&self) -> u8 {
        self.checksum_computed
    }

    /// Prepares the record for the next line.
    ///
    /// Mode flags, the expected line number and modal values survive.
    pub(crate) fn reset(&mut self) {
        self.seen = Seen::default();
        self.checksum_read = 0;
        self.checksum_computed = 0;
        self.command = Command::LINEAR_MOVE;
        if self.relative {
            self.target.x = 0;
            self.target.y = 0;
            self.target.z = 0;
        }
        self.target.e = 0;
    }
}

impl Default for CommandRecord {
    fn default() -> Self {
        Self::new()
    }
}
