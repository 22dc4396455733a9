pub const SUCCESS: i32 = 0;
/// Computation failed or output could not be written
pub const EXECUTION_ERROR: i32 = 1;
/// Unreadable input file, malformed JSON or invalid parameters
pub const INPUT_ERROR: i32 = 2;
/// Request needs functionality this binary does not provide
pub const UNSUPPORTED: i32 = 3;
