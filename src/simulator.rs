// In-process simulated sensor: writes wire-format lines into a pipe read by a LineSource

use crate::detect;
use crate::history::RingBuffer;
use crate::source::{FeedKind, LineSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::AsyncWriteExt;
use tokio::time::{Duration, interval};

pub const MAX_HEARTBEAT: f64 = 210.0;
pub const MIN_HEARTBEAT: f64 = 40.0;
const RESTING_HEARTBEAT: f64 = 72.0;
const MIN_EPISODE_TICKS: u32 = 5;
const MAX_EPISODE_TICKS: u32 = 15;
const PIPE_CAPACITY: usize = 4096;

/// Device monitoring modes, in the order the button cycles through them.
pub const MODES: [char; 3] = ['0', '1', '2'];
/// Mode in which the device reports `RATE:` after each beat.
pub const DETECT_MODE: char = '2';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Steady,
    Rising,
    Falling,
    High,
    Low,
}

const TRENDS: [Trend; 5] = [
    Trend::Steady,
    Trend::Rising,
    Trend::Falling,
    Trend::High,
    Trend::Low,
];

/// Device model. Produces the lines the firmware would print per tick.
#[derive(Debug)]
pub struct SimulatedDevice {
    rng: StdRng,
    mode_idx: usize,
    trend: Trend,
    ticks_left: u32,
    heartbeat: f64,
    history: RingBuffer<f64>,
}

impl SimulatedDevice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            mode_idx: 0,
            trend: Trend::Steady,
            ticks_left: MIN_EPISODE_TICKS,
            heartbeat: RESTING_HEARTBEAT,
            history: RingBuffer::default(),
        }
    }

    pub fn mode(&self) -> char {
        MODES[self.mode_idx]
    }

    /// Lines emitted on boot.
    pub fn boot_lines(&self) -> Vec<String> {
        vec![format!("MODE:{}", self.mode())]
    }

    /// Advances one second of device time.
    pub fn tick(&mut self) -> Vec<String> {
        let mut lines = Vec::with_capacity(3);
        if self.ticks_left == 0 {
            self.start_episode();
            lines.push(format!("MODE:{}", self.mode()));
        }
        self.ticks_left -= 1;

        self.heartbeat = self.next_heartbeat();
        self.history.push(self.heartbeat);
        lines.push(format!("BEAT:{}", self.heartbeat));

        if self.mode() == DETECT_MODE {
            let code = detect::detect(&self.history.last_n(detect::RECENT));
            lines.push(format!("RATE:{}", code));
        }
        lines
    }

    fn start_episode(&mut self) {
        self.mode_idx = (self.mode_idx + 1) % MODES.len();
        self.trend = TRENDS[self.rng.gen_range(0..TRENDS.len())];
        self.ticks_left = self.rng.gen_range(MIN_EPISODE_TICKS..=MAX_EPISODE_TICKS);
    }

    fn next_heartbeat(&mut self) -> f64 {
        let hb = self.heartbeat;
        let next = match self.trend {
            Trend::Steady => {
                let toward_rest = (RESTING_HEARTBEAT - hb).clamp(-10.0, 10.0);
                hb + toward_rest + self.rng.gen_range(-2.0..=2.0)
            }
            Trend::Rising => hb + self.rng.gen_range(17.0..=30.0),
            Trend::Falling => hb - self.rng.gen_range(17.0..=30.0),
            Trend::High => hb + (MAX_HEARTBEAT - hb) * 0.5,
            Trend::Low => hb - (hb - MIN_HEARTBEAT) * 0.5,
        };
        next.clamp(MIN_HEARTBEAT, MAX_HEARTBEAT).round()
    }
}

/// Runs a simulated device on its own task and returns a line source reading
/// its output. The task stops when the reader side is dropped.
pub fn spawn(seed: u64, tick: Duration) -> (LineSource, tokio::task::JoinHandle<()>) {
    let (device_end, reader_end) = tokio::io::duplex(PIPE_CAPACITY);
    let handle = tokio::spawn(async move {
        let mut device = SimulatedDevice::new(seed);
        let mut writer = device_end;
        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut pending = device.boot_lines();
        loop {
            for line in pending.drain(..) {
                if let Err(e) = writer.write_all(format!("{}\n", line).as_bytes()).await {
                    tracing::debug!(error = %e, "simulator pipe closed");
                    return;
                }
            }
            ticker.tick().await;
            pending = device.tick();
        }
    });
    (LineSource::from_reader(reader_end, FeedKind::Live, "simulator"), handle)
}
