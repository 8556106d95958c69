use num_traits::{Float, FromPrimitive, Signed};
use rand::distr::uniform::SampleUniform;
use std::fmt::{Debug, Display};
use std::ops::AddAssign;

// A Float trait that captures the requirements we need for the various places
// we need floats. These requirements are imposed by ndarray-stats and rand.
pub trait ClusterFloat:
    Float
    + Debug
    + Display
    + Default
    + AddAssign
    + Signed
    + Copy
    + Sync
    + Send
    + FromPrimitive
    + SampleUniform
{
    /// Converts a member count into the float domain.
    fn from_count(n: usize) -> Self {
        Self::from_usize(n).unwrap_or_else(Self::infinity)
    }
}

impl ClusterFloat for f32 {}
impl ClusterFloat for f64 {}
