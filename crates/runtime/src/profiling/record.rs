use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use weft_core::OperationTimers;

/// One profiling record, written per committed step.
///
/// The on-disk layout is fixed and little-endian:
///
/// ```text
/// u32    step_no
/// f64    time
/// f64    step_wall_time
/// u32[n] call_counts
/// f64[n] accumulated_times
/// ```
///
/// where `n` is the number of tracked operations, constant across a file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub step_no: u32,
    /// Simulation time of the committed step, in seconds.
    pub time: f64,
    /// Wall time spent on the step, in seconds.
    pub step_wall_time: f64,
    pub call_counts: Vec<u32>,
    /// Accumulated wall time per operation, in seconds.
    pub accumulated_times: Vec<f64>,
}

impl ProfileRecord {
    /// Builds a record from the current operation timers.
    #[must_use]
    pub fn from_timers(
        step_no: u32,
        time: f64,
        step_wall_time: f64,
        timers: &OperationTimers,
    ) -> Self {
        let (call_counts, accumulated_times) = timers.iter().unzip();
        Self {
            step_no,
            time,
            step_wall_time,
            call_counts,
            accumulated_times,
        }
    }

    /// Returns the encoded size of a record with `operations` tracked operations.
    #[must_use]
    pub fn encoded_len(operations: usize) -> usize {
        4 + 8 + 8 + operations * (4 + 8)
    }

    /// Writes the record in the binary layout.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_u32::<LittleEndian>(self.step_no)?;
        out.write_f64::<LittleEndian>(self.time)?;
        out.write_f64::<LittleEndian>(self.step_wall_time)?;
        for &count in &self.call_counts {
            out.write_u32::<LittleEndian>(count)?;
        }
        for &seconds in &self.accumulated_times {
            out.write_f64::<LittleEndian>(seconds)?;
        }
        Ok(())
    }

    /// Reads one record with `operations` tracked operations.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying reader, including
    /// [`io::ErrorKind::UnexpectedEof`] for a truncated record.
    pub fn read_from<R: Read + ?Sized>(input: &mut R, operations: usize) -> io::Result<Self> {
        let step_no = input.read_u32::<LittleEndian>()?;
        let time = input.read_f64::<LittleEndian>()?;
        let step_wall_time = input.read_f64::<LittleEndian>()?;

        let mut call_counts = vec![0; operations];
        input.read_u32_into::<LittleEndian>(&mut call_counts)?;

        let mut accumulated_times = vec![0.0; operations];
        input.read_f64_into::<LittleEndian>(&mut accumulated_times)?;

        Ok(Self {
            step_no,
            time,
            step_wall_time,
            call_counts,
            accumulated_times,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_little_endian_and_fixed() {
        let record = ProfileRecord {
            step_no: 3,
            time: 0.5,
            step_wall_time: 2.0,
            call_counts: vec![1, 2],
            accumulated_times: vec![0.25, 0.125],
        };

        let mut bytes = Vec::new();
        record.write_to(&mut bytes).unwrap();

        assert_eq!(bytes.len(), ProfileRecord::encoded_len(2));
        assert_eq!(&bytes[..4], &3u32.to_le_bytes());
        assert_eq!(&bytes[4..12], &0.5f64.to_le_bytes());
        assert_eq!(&bytes[12..20], &2.0f64.to_le_bytes());
        assert_eq!(&bytes[20..24], &1u32.to_le_bytes());
        assert_eq!(&bytes[24..28], &2u32.to_le_bytes());
        assert_eq!(&bytes[28..36], &0.25f64.to_le_bytes());
    }

    #[test]
    fn truncated_record_is_an_error() {
        let mut bytes: &[u8] = &[1, 0, 0, 0, 0];
        let err = ProfileRecord::read_from(&mut bytes, 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn record_reflects_timers() {
        let mut timers = OperationTimers::new(2);
        timers.measure(0, || ());

        let record = ProfileRecord::from_timers(7, 1.5, 0.0, &timers);

        assert_eq!(record.step_no, 7);
        assert_eq!(record.call_counts, vec![1, 0]);
        assert_eq!(record.accumulated_times.len(), 2);
    }
}
