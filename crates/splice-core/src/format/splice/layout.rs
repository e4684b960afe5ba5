pub const SPLICE_MAGIC: &[u8; 6] = b"SPLICE";

pub const MAGIC_LEN: usize = SPLICE_MAGIC.len();
pub const BODY_SIZE_LEN: usize = 8;

pub const VERSION_SLOT_LEN: usize = 32;

pub const STEPS_PER_TRACK: usize = 16;
pub const STEPS_PER_BEAT: usize = 4;

pub const STEP_SILENT: u8 = 0;
pub const STEP_TRIGGERED: u8 = 1;

