use heapless::Deque;

/// Fixed length history of the most recent samples.
///
/// Pushing into a full window drops the oldest sample. `cycle` counts every
/// push since creation, so `cycle % N` is the slot the next sample overwrites.
#[derive(Debug, Clone)]
pub struct RollingWindow<T: Copy, const N: usize> {
    samples: Deque<T, N>,
    cycle: u32,
}

impl<T: Copy, const N: usize> RollingWindow<T, N> {
    pub fn new() -> Self {
        Self {
            samples: Deque::new(),
            cycle: 0,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // can't fail, a slot was freed above
        let _ = self.samples.push_back(sample);
        self.cycle = self.cycle.wrapping_add(1);
    }

    /// false until N samples have been pushed
    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn oldest(&self) -> Option<T> {
        self.samples.front().copied()
    }

    pub fn newest(&self) -> Option<T> {
        self.samples.back().copied()
    }

    /// oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.samples.iter().copied()
    }
}

impl<T: Copy, const N: usize> Default for RollingWindow<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partially_filled() {
        let mut window = RollingWindow::<f32, 3>::new();
        assert_eq!(window.oldest(), None);
        assert_eq!(window.newest(), None);

        window.push(1.0);
        window.push(2.0);
        assert!(!window.is_full());
        assert_eq!(window.len(), 2);
        assert_eq!(window.oldest(), Some(1.0));
        assert_eq!(window.newest(), Some(2.0));
    }

    #[test]
    fn wraps_around() {
        let mut window = RollingWindow::<f32, 3>::new();
        for i in 0..7 {
            window.push(i as f32);
        }
        assert!(window.is_full());
        assert_eq!(window.cycle(), 7);
        assert_eq!(window.cycle() % 3, 1);
        assert_eq!(window.oldest(), Some(4.0));
        assert_eq!(window.newest(), Some(6.0));
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![4.0, 5.0, 6.0]);
    }
}
