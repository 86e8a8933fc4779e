use quiz_core::model::{DEFAULT_RANGE_END, IndexRange, SelectionError, SelectionSpec};

/// Values behind the quiz setup screen.
///
/// Bounds are kept inside `[1, total]` as they are edited, and the start bound
/// snaps back to 1 whenever the end bound moves below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupForm {
    total: usize,
    start: u32,
    end: u32,
}

impl SetupForm {
    #[must_use]
    pub fn new(total: usize) -> Self {
        let end = u32::try_from(total).map_or(DEFAULT_RANGE_END, |t| t.min(DEFAULT_RANGE_END));
        Self {
            total,
            start: 1,
            end,
        }
    }

    fn max_index(&self) -> u32 {
        u32::try_from(self.total).unwrap_or(u32::MAX)
    }

    fn clamp(&self, value: u32) -> u32 {
        value.max(1).min(self.max_index())
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn set_start(&mut self, value: u32) {
        self.start = self.clamp(value);
    }

    pub fn set_end(&mut self, value: u32) {
        self.end = self.clamp(value);
        if self.start > self.end {
            self.start = 1;
        }
    }

    #[must_use]
    pub fn range(&self) -> IndexRange {
        IndexRange::new(self.start, self.end)
    }

    /// A range spec over the current bounds.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::InvalidRange` if the bounds are inverted or the bank
    /// is empty.
    pub fn range_spec(&self) -> Result<SelectionSpec, SelectionError> {
        let range = self.range().validate(self.total)?;
        Ok(SelectionSpec::Range {
            start: range.start,
            end: range.end,
        })
    }

    /// A random spec of `count` questions, drawn from the current bounds when
    /// `within_range` is set and from the whole bank otherwise.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::InvalidRange` for invalid bounds and
    /// `SelectionError::InsufficientPool` if `count` is larger than the pool.
    pub fn random_spec(
        &self,
        count: usize,
        within_range: bool,
    ) -> Result<SelectionSpec, SelectionError> {
        let pool = if within_range {
            Some(self.range().validate(self.total)?)
        } else {
            None
        };
        let available = pool.map_or(self.total, |p| p.len());
        if count > available {
            return Err(SelectionError::InsufficientPool {
                requested: count,
                available,
            });
        }
        Ok(SelectionSpec::Random { count, pool })
    }
}
