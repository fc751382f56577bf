pub mod autoformat;
pub mod clock;
pub mod parser;
pub mod zone;

pub use autoformat::{FieldEdit, auto_format};
pub use clock::{
    MINUTES_PER_DAY, Period, TimeOfDay, add_minutes, decrement_by_one_minute, difference,
    from_time_of_day, increment_by_one_minute, is_valid_time12, is_valid_time24, to_12_hour,
    to_24_hour, to_time_of_day,
};
pub use parser::{ParsedTime, parse_parts, smart_parse};
pub use zone::{DEFAULT_TIMEZONE, ReferenceZone};
