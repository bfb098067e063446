/// A forward cursor over a flat parameter buffer.
///
/// Every layer takes as many parameters as its size, in order, the same way the archive entries
/// were concatenated.
pub struct ParamIter<'p> {
    params: &'p [f32],
    cursor: usize,
}

impl<'p> ParamIter<'p> {
    /// Creates a new `ParamIter` at the start of `params`.
    pub fn new(params: &'p [f32]) -> Self {
        Self { params, cursor: 0 }
    }

    /// Tries to yield the next layer's parameters.
    ///
    /// # Arguments
    /// * `size` - The amount of parameters the layer needs.
    ///
    /// # Returns
    /// The parameter slice, or `None` if there aren't enough parameters left.
    pub fn next(&mut self, size: usize) -> Option<&'p [f32]> {
        let end = self.cursor.checked_add(size)?;
        let slice = self.params.get(self.cursor..end)?;
        self.cursor = end;
        Some(slice)
    }

    /// Returns the amount of parameters that haven't been handed out yet.
    pub fn remaining(&self) -> usize {
        self.params.len() - self.cursor
    }
}
