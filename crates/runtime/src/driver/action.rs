/// Control actions an observer can request from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current step and return the run summary so far.
    StopEarly,
}
