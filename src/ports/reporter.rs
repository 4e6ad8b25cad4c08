//! Reporter trait - the presentation collaborator
//!
//! The core emits section announcements, success/warning/failure events and
//! structured key-value fields; it defines no rendering. Banner numbering,
//! colors and operator pauses are entirely the implementor's business.

pub trait Reporter {
    /// Announce the next pipeline stage.
    fn step(&mut self, title: &str);

    /// A stage action completed as specified.
    fn success(&mut self, msg: &str);

    /// Advisory condition; the pipeline continues.
    fn warn(&mut self, msg: &str);

    /// Fatal condition; the pipeline is about to abort.
    fn fail(&mut self, msg: &str);

    /// Structured field for display.
    fn kv(&mut self, key: &str, value: &str);
}
