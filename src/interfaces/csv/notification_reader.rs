use crate::error::{NotifyError, Result};
use crate::interfaces::notification::Notification;
use std::io::Read;

/// Replays notifications captured on a device and exported as CSV.
///
/// Columns are `package,title,text,time`, with `time` the post time in epoch
/// millis. `title` and `text` may be left off the end of a row.
pub struct NotificationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> NotificationReader<R> {
    /// Wraps an exported capture. Cells are whitespace-trimmed.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Yields each row as a `Notification`. A bad row yields an error and
    /// does not stop the rows after it.
    pub fn notifications(self) -> impl Iterator<Item = Result<Notification>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(NotifyError::from))
    }
}
