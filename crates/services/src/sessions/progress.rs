/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based number of the slot under the cursor; 0 for an empty queue.
    pub number: usize,
    pub total: usize,
    pub answered: usize,
    pub percent: u8,
    pub is_complete: bool,
}
