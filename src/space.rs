use crate::{BuildParams, RunParams, SweepPoint};

/// Cartesian product of tasklet counts and block sizes for a fixed device
/// count and run configuration.
///
/// Iteration is tasklet-major: every block size is visited for the first
/// tasklet count before moving to the next one. The space is restartable,
/// each call to [`ConfigSpace::iter`] starts from the first point.
#[derive(Clone, Debug)]
pub struct ConfigSpace {
    device_count: u32,
    run: RunParams,
    tasklets: Vec<u32>,
    block_sizes: Vec<u32>,
}

impl ConfigSpace {
    pub fn new(device_count: u32, run: RunParams, tasklets: Vec<u32>, block_sizes: Vec<u32>) -> Self {
        Self {
            device_count,
            run,
            tasklets,
            block_sizes,
        }
    }

    pub fn iter(&self) -> ConfigSpaceIter<'_> {
        ConfigSpaceIter {
            space: self,
            next: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tasklets.len() * self.block_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn point_at(&self, index: usize) -> SweepPoint {
        let tasklet_count = self.tasklets[index / self.block_sizes.len()];
        let block_size = self.block_sizes[index % self.block_sizes.len()];
        SweepPoint {
            build: BuildParams {
                device_count: self.device_count,
                tasklet_count,
                block_size,
            },
            run: self.run.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigSpace {
    type Item = SweepPoint;
    type IntoIter = ConfigSpaceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazily yields the points of a [`ConfigSpace`].
#[derive(Clone, Debug)]
pub struct ConfigSpaceIter<'a> {
    space: &'a ConfigSpace,
    next: usize,
}

impl Iterator for ConfigSpaceIter<'_> {
    type Item = SweepPoint;

    fn next(&mut self) -> Option<SweepPoint> {
        if self.next >= self.space.len() {
            return None;
        }
        let point = self.space.point_at(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.space.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ConfigSpaceIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySize;

    fn run_params() -> RunParams {
        RunParams {
            mode: 1,
            total_memory: MemorySize::default(),
            duration_seconds: 10,
            use_dpu: false,
        }
    }

    fn pairs(space: &ConfigSpace) -> Vec<(u32, u32)> {
        space
            .iter()
            .map(|p| (p.build.tasklet_count, p.build.block_size))
            .collect()
    }

    #[test]
    fn test_tasklet_major_order() {
        let space = ConfigSpace::new(4, run_params(), vec![1, 2], vec![2, 4]);
        assert_eq!(pairs(&space), vec![(1, 2), (1, 4), (2, 2), (2, 4)]);
    }

    #[test]
    fn test_points_carry_fixed_fields() {
        let space = ConfigSpace::new(4, run_params(), vec![1, 2], vec![2, 4]);
        for point in &space {
            assert_eq!(point.build.device_count, 4);
            assert_eq!(point.run, run_params());
        }
    }

    #[test]
    fn test_len_is_product() {
        let space = ConfigSpace::new(1, run_params(), vec![1, 2, 4], vec![2, 4, 8, 16]);
        assert_eq!(space.len(), 12);
        assert_eq!(space.iter().count(), 12);
        assert_eq!(space.iter().len(), 12);
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        let no_tasklets = ConfigSpace::new(1, run_params(), vec![], vec![2, 4]);
        assert!(no_tasklets.is_empty());
        assert_eq!(no_tasklets.iter().next(), None);

        let no_blocks = ConfigSpace::new(1, run_params(), vec![1], vec![]);
        assert!(no_blocks.is_empty());
        assert_eq!(no_blocks.iter().next(), None);
    }

    #[test]
    fn test_restartable() {
        let space = ConfigSpace::new(2, run_params(), vec![1, 8], vec![64]);
        let mut first = space.iter();
        first.next();
        assert_eq!(pairs(&space), vec![(1, 64), (8, 64)]);
        assert_eq!(first.size_hint(), (1, Some(1)));
    }
}
