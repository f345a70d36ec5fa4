use std::time::Duration;

/// Waits between consecutive timesteps of a replay
pub trait Pacer {
    fn wait(&mut self, duration: Duration);
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}

/// Blocks the calling thread for the full duration
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Returns immediately; waits are still computed and reported
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWait;

impl Pacer for NoWait {
    fn wait(&mut self, _duration: Duration) {}
}
