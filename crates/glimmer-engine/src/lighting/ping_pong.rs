/// Two fixed slots with a swappable active index.
///
/// The write slot is `items[active]`, the read slot the other one. `flip`
/// swaps roles without moving anything.
#[derive(Debug)]
pub struct PingPong<T> {
    items: [T; 2],
    active: usize,
}

impl<T> PingPong<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { items: [a, b], active: 0 }
    }

    #[inline]
    pub fn write(&self) -> &T {
        &self.items[self.active]
    }

    #[inline]
    pub fn read(&self) -> &T {
        &self.items[1 - self.active]
    }

    /// Index of the read slot.
    #[inline]
    pub fn read_index(&self) -> usize {
        1 - self.active
    }

    #[inline]
    pub fn flip(&mut self) {
        self.active = 1 - self.active;
    }

    /// Restores the initial roles.
    #[inline]
    pub fn reset(&mut self) {
        self.active = 0;
    }

    pub fn both(&self) -> &[T; 2] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_swaps_roles() {
        let mut pp = PingPong::new('a', 'b');
        assert_eq!((*pp.write(), *pp.read()), ('a', 'b'));
        pp.flip();
        assert_eq!((*pp.write(), *pp.read()), ('b', 'a'));
        assert_eq!(pp.read_index(), 0);
    }

    #[test]
    fn just_written_becomes_read() {
        let mut pp = PingPong::new(0, 1);
        for _ in 0..5 {
            let written = *pp.write();
            pp.flip();
            assert_eq!(*pp.read(), written);
        }
    }

    #[test]
    fn reset_restores_initial_roles() {
        let mut pp = PingPong::new(0, 1);
        pp.flip();
        pp.flip();
        pp.flip();
        pp.reset();
        assert_eq!(*pp.write(), 0);
    }
}
