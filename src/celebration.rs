use rand::seq::SliceRandom;
use rand::Rng;

const SYMBOLS: [char; 6] = ['*', '+', 'o', '.', '~', '#'];
const GRAVITY: f64 = 12.0;

/// One piece of confetti, in terminal cell coordinates
#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiPiece {
    fn new<R: Rng + ?Sized>(rng: &mut R, width: f64) -> Self {
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(-3.0..0.0),
            vel_x: rng.gen_range(-2.0..2.0),
            vel_y: rng.gen_range(0.5..4.0),
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..5),
            age: 0.0,
            max_age: rng.gen_range(2.0..5.0),
        }
    }

    /// Advance by `dt` seconds; false once the piece has expired
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }
}

/// Falling confetti shown when a word or the whole session is done
#[derive(Debug, Default)]
pub struct Confetti {
    pub pieces: Vec<ConfettiPiece>,
    pub width: f64,
    pub height: f64,
    /// keep refilling until stopped, for the session-complete overlay
    pub looping: bool,
}

impl Confetti {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.pieces.is_empty()
    }

    /// Drop a burst of `count` pieces from the top of a `width` x `height` area
    pub fn burst(&mut self, width: u16, height: u16, count: usize) {
        let mut rng = rand::thread_rng();
        self.width = width as f64;
        self.height = height as f64;
        self.pieces
            .extend((0..count).map(|_| ConfettiPiece::new(&mut rng, self.width)));
    }

    pub fn start_loop(&mut self, width: u16, height: u16) {
        self.looping = true;
        self.burst(width, height, 50);
    }

    pub fn stop(&mut self) {
        self.looping = false;
        self.pieces.clear();
    }

    pub fn update(&mut self, dt: f64) {
        let height = self.height;
        self.pieces
            .retain_mut(|p| p.update(dt) && p.y < height + 1.0);

        if self.looping && self.pieces.len() < 25 {
            let mut rng = rand::thread_rng();
            let width = self.width;
            self.pieces
                .extend((0..10).map(|_| ConfettiPiece::new(&mut rng, width)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_confetti_is_inactive() {
        let confetti = Confetti::new();
        assert!(!confetti.is_active());
        assert!(!confetti.looping);
    }

    #[test]
    fn test_burst_spawns_pieces_in_bounds() {
        let mut confetti = Confetti::new();
        confetti.burst(80, 24, 30);

        assert_eq!(confetti.pieces.len(), 30);
        assert!(confetti.is_active());
        for p in &confetti.pieces {
            assert!(p.x >= 0.0 && p.x < 80.0);
            assert!(p.y < 0.0);
            assert!(SYMBOLS.contains(&p.symbol));
        }
    }

    #[test]
    fn test_burst_fades_out() {
        let mut confetti = Confetti::new();
        confetti.burst(80, 24, 30);

        for _ in 0..100 {
            confetti.update(0.1);
        }
        assert!(!confetti.is_active());
    }

    #[test]
    fn test_loop_keeps_refilling_until_stopped() {
        let mut confetti = Confetti::new();
        confetti.start_loop(80, 24);

        for _ in 0..100 {
            confetti.update(0.1);
        }
        assert!(confetti.is_active());

        confetti.stop();
        assert!(!confetti.is_active());
        confetti.update(0.1);
        assert!(!confetti.is_active());
    }

    #[test]
    fn test_pieces_fall() {
        let mut confetti = Confetti::new();
        confetti.burst(10, 10, 1);
        let y0 = confetti.pieces[0].y;

        confetti.update(0.1);
        if let Some(p) = confetti.pieces.first() {
            assert!(p.y > y0);
        }
    }
}
