//! Configuration access port trait.

use std::time::Duration;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Read a whole-second duration. Non-positive values fall back to the
    /// default, since a zero deadline would make every bounded phase expire.
    fn get_duration_secs(&self, section: &str, key: &str, default: Duration) -> Duration {
        let secs = self.get_int(section, key, default.as_secs() as i64);
        if secs > 0 {
            Duration::from_secs(secs as u64)
        } else {
            default
        }
    }
}
