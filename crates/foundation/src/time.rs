/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: u64) -> Self {
        Time(ms as f64 / 1000.0)
    }

    pub fn after_millis(self, ms: u64) -> Self {
        Time(self.0 + ms as f64 / 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }
}
