use num_traits::Num;
use serde::{Deserialize, Serialize};

/// Size of a rectangular area, for example of the container a map is shown in (in pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size<N = f64> {
    width: N,
    height: N,
}

impl<N: Num + Copy + PartialOrd> Size<N> {
    /// Creates a new size.
    pub fn new(width: N, height: N) -> Self {
        Self { width, height }
    }

    /// Width.
    pub fn width(&self) -> N {
        self.width
    }

    /// Height.
    pub fn height(&self) -> N {
        self.height
    }

    /// Returns true if either of the dimensions is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= N::zero() || self.height <= N::zero()
    }
}
