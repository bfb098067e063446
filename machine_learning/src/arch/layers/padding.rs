/// Border handling of windowed layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Padding {
    /// Pads so that `out = ceil(len / stride)`, splitting the padding with the extra element
    /// (if any) after the input.
    #[default]
    Same,
    /// No padding, windows never cross the border.
    Valid,
}

impl Padding {
    /// Computes the output length and the padding before the first element along one axis.
    ///
    /// # Arguments
    /// * `len` - The input length along the axis.
    /// * `kernel` - The window length along the axis.
    /// * `stride` - The step between windows.
    ///
    /// # Returns
    /// `(out_len, pad_before)`, or `None` if the window doesn't fit or the arguments are zero.
    pub fn window(&self, len: usize, kernel: usize, stride: usize) -> Option<(usize, usize)> {
        if len == 0 || kernel == 0 || stride == 0 {
            return None;
        }

        match self {
            Padding::Same => {
                let out = len.div_ceil(stride);
                let total = ((out - 1) * stride + kernel).saturating_sub(len);
                Some((out, total / 2))
            }
            Padding::Valid => {
                let span = len.checked_sub(kernel)?;
                Some((span / stride + 1, 0))
            }
        }
    }
}

/// Yields the in-bounds input indices covered by the window of output position `out`.
pub(super) fn taps(
    out: usize,
    stride: usize,
    pad_before: usize,
    kernel: usize,
    len: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let origin = (out * stride) as isize - pad_before as isize;

    (0..kernel).filter_map(move |k| {
        let i = origin + k as isize;
        (i >= 0 && (i as usize) < len).then_some((k, i as usize))
    })
}
