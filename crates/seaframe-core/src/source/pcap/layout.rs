pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
pub const MAGIC_LEN: usize = 4;
pub const READER_BUFFER_SIZE: usize = 64 * 1024;
pub const MICROS_PER_SECOND: i128 = 1_000_000;
pub const NANOS_PER_MICRO: i128 = 1_000;
