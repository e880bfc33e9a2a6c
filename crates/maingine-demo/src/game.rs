use maingine_engine::core::Mode;
use maingine_engine::time::LoopHandle;

/// Demo mode: advances a simulation clock and reports UPS/FPS once per
/// simulated second.
pub struct Game {
    handle: LoopHandle,
    sim_time: f64,
    ticks: u64,
    frames: u64,
    next_report: f64,
}

impl Game {
    pub fn new(handle: LoopHandle) -> Self {
        Self {
            handle,
            sim_time: 0.0,
            ticks: 0,
            frames: 0,
            next_report: 1.0,
        }
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}

impl Mode for Game {
    fn enter(&mut self) {
        self.sim_time = 0.0;
        self.ticks = 0;
        self.frames = 0;
        self.next_report = 1.0;
        log::info!("game started");
    }

    fn tick(&mut self, dt: f64) {
        self.sim_time += dt;
        self.ticks += 1;

        if self.sim_time >= self.next_report {
            self.next_report += 1.0;
            log::info!(
                "UPS: {}, FPS: {}",
                self.handle.current_ticks_per_second(),
                self.handle.current_frames_per_second()
            );
        }
    }

    fn draw(&mut self) {
        self.frames += 1;
    }

    fn exit(&mut self) {
        log::info!(
            "game ended after {:.2}s simulated ({} ticks, {} frames)",
            self.sim_time,
            self.ticks,
            self.frames
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_restarts_the_simulation() {
        let mut game = Game::new(LoopHandle::default());
        game.enter();
        game.tick(0.5);
        game.tick(0.5);
        assert_eq!(game.sim_time(), 1.0);

        game.exit();
        game.enter();
        assert_eq!(game.sim_time(), 0.0);
    }
}
