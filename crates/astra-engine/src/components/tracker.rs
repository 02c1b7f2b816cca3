//! Parametric motion laws ("trackers").
//!
//! A tracker is an entity whose local position is driven by a motion law
//! instead of plain velocity. Terminal laws hand their children back to
//! the tracker's parent and remove themselves; the scene graph performs
//! that handover and reports it as a completion event.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::core::math::angle_to_direction;
use crate::core::scheduler::FRAME_INTERVAL_MS;

/// Which law a completion event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LawKind {
    Circle,
    Bezier,
    Sine,
    Follow,
}

/// Cubic Bezier curve with precomputed polynomial coefficients.
#[derive(Debug, Clone, Copy)]
pub struct CubicCurve {
    p0: Vec2,
    c: Vec2,
    b: Vec2,
    a: Vec2,
}

impl CubicCurve {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        let c = 3.0 * (p1 - p0);
        let b = 3.0 * (p2 - p1) - c;
        let a = p3 - p0 - c - b;
        Self { p0, c, b, a }
    }

    /// Evaluate at parameter t in [0, 1].
    pub fn at(&self, t: f32) -> Vec2 {
        ((self.a * t + self.b) * t + self.c) * t + self.p0
    }
}

/// Inputs the scene graph resolves for a Follow law before advancing it.
#[derive(Debug, Clone, Copy)]
pub struct FollowInfo {
    /// Absolute position of the tracked entity.
    pub target_abs: Vec2,
    /// Absolute position of the tracker itself.
    pub my_abs: Vec2,
    /// False when the target despawned or lost its parent.
    pub target_alive: bool,
}

/// Result of advancing a motion law by one step.
#[derive(Debug, Clone, Copy, Default)]
pub struct LawStep {
    /// Replace the local position outright.
    pub set_pos: Option<Vec2>,
    /// Translate the local position by a delta.
    pub translate: Option<Vec2>,
    /// The law reached its terminal state this step.
    pub terminal: bool,
    /// Velocity handed to the tracker's children on completion.
    pub exit_velocity: Option<Vec2>,
}

/// Parametric motion law state.
#[derive(Debug, Clone)]
pub enum MotionLaw {
    /// Orbit the parent origin at a fixed radius. Never terminal.
    Circle {
        radius: f32,
        /// Radians per nominal frame.
        angular_speed: f32,
        angle: f32,
    },
    /// Traverse a cubic Bezier curve in local space. Terminal past t = 1.
    Bezier {
        curve: CubicCurve,
        /// Parameter advance per nominal frame.
        rate: f32,
        t: f32,
    },
    /// Wall-clock driven sinusoidal drift, accumulated per axis. The two
    /// axes carry their own amplitude, frequency and phase.
    Sine {
        amplitude: Vec2,
        /// Angular rate in radians per second of wall-clock time, per axis.
        frequency: Vec2,
        /// Phase offset in degrees, per axis.
        phase_deg: Vec2,
        /// Set on the first step the law runs.
        started_at: Option<f64>,
    },
    /// Home in on another entity. Terminal on arrival or when the target
    /// is gone.
    Follow {
        target: EntityId,
        /// Units per nominal frame.
        speed: f32,
        last_direction: Vec2,
    },
}

impl MotionLaw {
    pub fn circle(radius: f32, angular_speed: f32) -> Self {
        MotionLaw::Circle {
            radius,
            angular_speed,
            angle: 0.0,
        }
    }

    pub fn bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, rate: f32) -> Self {
        MotionLaw::Bezier {
            curve: CubicCurve::new(p0, p1, p2, p3),
            rate,
            t: 0.0,
        }
    }

    pub fn sine(amplitude: Vec2, frequency: Vec2, phase_deg: Vec2) -> Self {
        MotionLaw::Sine {
            amplitude,
            frequency,
            phase_deg,
            started_at: None,
        }
    }

    pub fn follow(target: EntityId, speed: f32) -> Self {
        MotionLaw::Follow {
            target,
            speed,
            last_direction: Vec2::X,
        }
    }

    pub fn kind(&self) -> LawKind {
        match self {
            MotionLaw::Circle { .. } => LawKind::Circle,
            MotionLaw::Bezier { .. } => LawKind::Bezier,
            MotionLaw::Sine { .. } => LawKind::Sine,
            MotionLaw::Follow { .. } => LawKind::Follow,
        }
    }

    /// Entity this law tracks, if any.
    pub fn follow_target(&self) -> Option<EntityId> {
        match self {
            MotionLaw::Follow { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Advance by `dt_ms`. `follow` must be provided for Follow laws and
    /// is ignored otherwise.
    pub fn advance(&mut self, dt_ms: f32, now_ms: f64, follow: Option<FollowInfo>) -> LawStep {
        let frames = dt_ms / FRAME_INTERVAL_MS;
        match self {
            MotionLaw::Circle {
                radius,
                angular_speed,
                angle,
            } => {
                *angle += *angular_speed * frames;
                LawStep {
                    set_pos: Some(*radius * angle_to_direction(*angle)),
                    ..Default::default()
                }
            }
            MotionLaw::Bezier { curve, rate, t } => {
                *t += *rate * frames;
                let terminal = *t > 1.0;
                if terminal {
                    *t = 1.0;
                }
                LawStep {
                    set_pos: Some(curve.at(*t)),
                    terminal,
                    ..Default::default()
                }
            }
            MotionLaw::Sine {
                amplitude,
                frequency,
                phase_deg,
                started_at,
            } => {
                let start = *started_at.get_or_insert(now_ms);
                let elapsed_s = ((now_ms - start) / 1000.0) as f32;
                let wave = Vec2::new(
                    (elapsed_s * frequency.x + phase_deg.x.to_radians()).sin(),
                    (elapsed_s * frequency.y + phase_deg.y.to_radians()).sin(),
                );
                LawStep {
                    translate: Some(*amplitude * wave * (dt_ms / 1000.0)),
                    ..Default::default()
                }
            }
            MotionLaw::Follow {
                speed,
                last_direction,
                ..
            } => {
                let Some(info) = follow else {
                    return LawStep::default();
                };
                if !info.target_alive {
                    return LawStep {
                        terminal: true,
                        exit_velocity: Some(*last_direction * *speed),
                        ..Default::default()
                    };
                }
                let to_target = info.target_abs - info.my_abs;
                let direction = to_target.normalize_or_zero();
                if direction != Vec2::ZERO {
                    *last_direction = direction;
                }
                let step_vec = direction * *speed * frames;
                let closing = (info.my_abs + step_vec).distance(info.target_abs)
                    < info.my_abs.distance(info.target_abs);
                if !closing {
                    // Arrived (or would overshoot): snap onto the target.
                    LawStep {
                        translate: Some(to_target),
                        terminal: true,
                        exit_velocity: Some(*last_direction * *speed),
                        ..Default::default()
                    }
                } else {
                    LawStep {
                        translate: Some(step_vec),
                        ..Default::default()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_stays_on_radius() {
        let mut law = MotionLaw::circle(50.0, 0.1);
        for _ in 0..10 {
            let step = law.advance(FRAME_INTERVAL_MS, 0.0, None);
            let pos = step.set_pos.unwrap();
            assert_relative_eq!(pos.length(), 50.0, epsilon = 1e-3);
            assert!(!step.terminal);
        }
    }

    #[test]
    fn bezier_starts_at_p0_and_clamps_to_p3() {
        let p0 = Vec2::new(0.0, 0.0);
        let p3 = Vec2::new(90.0, -30.0);
        let curve = CubicCurve::new(p0, Vec2::new(10.0, 40.0), Vec2::new(60.0, 40.0), p3);
        assert_relative_eq!(curve.at(0.0).x, p0.x);
        assert_relative_eq!(curve.at(1.0).x, p3.x, epsilon = 1e-3);
        assert_relative_eq!(curve.at(1.0).y, p3.y, epsilon = 1e-3);

        let mut law = MotionLaw::bezier(p0, Vec2::new(10.0, 40.0), Vec2::new(60.0, 40.0), p3, 0.4);
        // 0.4, 0.8 advance, third step overshoots and must clamp.
        law.advance(FRAME_INTERVAL_MS, 0.0, None);
        law.advance(FRAME_INTERVAL_MS, 0.0, None);
        let step = law.advance(FRAME_INTERVAL_MS, 0.0, None);
        assert!(step.terminal);
        let pos = step.set_pos.unwrap();
        assert_relative_eq!(pos.x, p3.x, epsilon = 1e-3);
        assert_relative_eq!(pos.y, p3.y, epsilon = 1e-3);
    }

    #[test]
    fn sine_baselines_on_first_step() {
        let mut law = MotionLaw::sine(
            Vec2::new(10.0, 0.0),
            Vec2::splat(1.0),
            Vec2::new(90.0, 0.0),
        );
        // First step at an arbitrary wall-clock origin: elapsed is zero,
        // phase 90 degrees puts the x wave at its crest.
        let step = law.advance(1000.0, 5000.0, None);
        let delta = step.translate.unwrap();
        assert_relative_eq!(delta.x, 10.0, epsilon = 1e-3);
        assert_relative_eq!(delta.y, 0.0);
    }

    #[test]
    fn sine_is_wall_clock_driven() {
        let mut law = MotionLaw::sine(Vec2::new(1.0, 1.0), Vec2::splat(2.0), Vec2::ZERO);
        law.advance(16.0, 0.0, None);
        // Same dt, later wall clock: different wave sample.
        let a = law.advance(16.0, 100.0, None).translate.unwrap();
        let b = law.advance(16.0, 700.0, None).translate.unwrap();
        assert!((a.x - b.x).abs() > 1e-6);
    }

    #[test]
    fn sine_axes_oscillate_independently() {
        // y runs at double the x rate: one second in, the x wave (at
        // 3pi/4) is still positive while the y wave (at 3pi/2) has
        // crossed into its trough.
        use std::f32::consts::PI;
        let mut law = MotionLaw::sine(
            Vec2::new(10.0, 10.0),
            Vec2::new(0.75 * PI, 1.5 * PI),
            Vec2::ZERO,
        );
        law.advance(16.0, 0.0, None);
        let delta = law.advance(1000.0, 1000.0, None).translate.unwrap();
        assert!(delta.x > 0.0);
        assert!(delta.y < 0.0);
    }

    #[test]
    fn follow_closes_distance() {
        let mut law = MotionLaw::follow(EntityId(9), 5.0);
        let info = FollowInfo {
            target_abs: Vec2::new(100.0, 0.0),
            my_abs: Vec2::ZERO,
            target_alive: true,
        };
        let step = law.advance(FRAME_INTERVAL_MS, 0.0, Some(info));
        assert!(!step.terminal);
        assert_relative_eq!(step.translate.unwrap().x, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn follow_snaps_and_reports_exit_velocity() {
        let mut law = MotionLaw::follow(EntityId(9), 5.0);
        let approach = FollowInfo {
            target_abs: Vec2::new(100.0, 0.0),
            my_abs: Vec2::ZERO,
            target_alive: true,
        };
        law.advance(FRAME_INTERVAL_MS, 0.0, Some(approach));
        let arriving = FollowInfo {
            target_abs: Vec2::new(100.0, 0.0),
            my_abs: Vec2::new(98.0, 0.0),
            target_alive: true,
        };
        let step = law.advance(FRAME_INTERVAL_MS, 0.0, Some(arriving));
        assert!(step.terminal);
        // Snap covers exactly the remaining distance.
        assert_relative_eq!(step.translate.unwrap().x, 2.0, epsilon = 1e-4);
        let exit = step.exit_velocity.unwrap();
        assert_relative_eq!(exit.x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(exit.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn follow_terminates_when_target_gone() {
        let mut law = MotionLaw::follow(EntityId(9), 3.0);
        let info = FollowInfo {
            target_abs: Vec2::ZERO,
            my_abs: Vec2::ZERO,
            target_alive: false,
        };
        let step = law.advance(FRAME_INTERVAL_MS, 0.0, Some(info));
        assert!(step.terminal);
        assert!(step.exit_velocity.is_some());
    }
}
