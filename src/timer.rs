use std::time::Instant;

/// Stopwatch for the load / compose / save timing lines.
pub struct Timer{
    time: Instant,
    prev: u128,
}

impl Default for Timer{
    fn default() -> Self{
        Self::new()
    }
}

impl Timer{
    pub fn new() -> Self{
        Self{ time: Instant::now(), prev: 0 }
    }

    /// Milliseconds since the last checkpoint.
    pub fn elapsed(&self) -> u128{
        self.time.elapsed().as_millis() - self.prev
    }

    pub fn checkpoint(&mut self){
        self.prev = self.time.elapsed().as_millis();
    }

    /// Elapsed time since the last checkpoint, then checkpoint.
    pub fn lap(&mut self) -> u128{
        let ms = self.elapsed();
        self.checkpoint();
        ms
    }
}
