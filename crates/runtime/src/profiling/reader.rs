use std::io::{self, BufReader, ErrorKind, Read};
use std::{fs::File, path::Path};

use super::ProfileRecord;

/// Reads profiling records back from a log.
///
/// The number of tracked operations is not stored in the log; it must match
/// the count the run was profiled with.
/// Iteration stops cleanly at the end of the stream and yields an error for a
/// trailing partial record.
#[derive(Debug)]
pub struct ProfileReader<R> {
    input: R,
    operations: usize,
    done: bool,
}

impl<R: Read> ProfileReader<R> {
    pub fn new(input: R, operations: usize) -> Self {
        Self {
            input,
            operations,
            done: false,
        }
    }

    fn next_record(&mut self) -> io::Result<Option<ProfileRecord>> {
        let mut first = [0u8; 1];
        loop {
            match self.input.read(&mut first) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        let mut rest = (&first[..]).chain(&mut self.input);
        ProfileRecord::read_from(&mut rest, self.operations).map(Some)
    }
}

impl ProfileReader<BufReader<File>> {
    /// Opens a profiling log on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, operations: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), operations))
    }
}

impl<R: Read> Iterator for ProfileReader<R> {
    type Item = io::Result<ProfileRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_record().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step_no: u32) -> ProfileRecord {
        ProfileRecord {
            step_no,
            time: f64::from(step_no) * 0.1,
            step_wall_time: 0.0,
            call_counts: vec![step_no],
            accumulated_times: vec![0.0],
        }
    }

    #[test]
    fn reads_every_record() {
        let mut bytes = Vec::new();
        for step_no in 0..3 {
            record(step_no).write_to(&mut bytes).unwrap();
        }

        let records: Vec<_> = ProfileReader::new(bytes.as_slice(), 1)
            .collect::<io::Result<_>>()
            .unwrap();

        assert_eq!(records, vec![record(0), record(1), record(2)]);
    }

    #[test]
    fn empty_log_has_no_records() {
        assert_eq!(ProfileReader::new(io::empty(), 4).count(), 0);
    }

    #[test]
    fn partial_record_is_reported_once() {
        let mut bytes = Vec::new();
        record(0).write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(&[9, 9, 9]);

        let results: Vec<_> = ProfileReader::new(bytes.as_slice(), 1).collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
