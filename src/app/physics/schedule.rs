use crate::config::PhaseStage;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) struct ForceStrengths {
    pub link: f32,
    pub collision: f32,
}

/// Ramps link and collision strength in discrete stages so a fresh layout
/// unfolds from its initial ring instead of exploding outwards.
pub(in crate::app) struct PhaseScheduler {
    phase: u32,
    stages: Vec<PhaseStage>,
    reached: usize,
}

impl PhaseScheduler {
    pub(in crate::app) fn new(mut stages: Vec<PhaseStage>) -> Self {
        stages.sort_by_key(|stage| stage.at_tick);
        Self {
            phase: 0,
            stages,
            reached: 0,
        }
    }

    /// Counts one tick and returns the strengths to apply on it.
    pub(in crate::app) fn advance(&mut self) -> ForceStrengths {
        self.phase = self.phase.saturating_add(1);
        while let Some(stage) = self.stages.get(self.reached)
            && self.phase >= stage.at_tick
        {
            tracing::debug!(
                phase = self.phase,
                stage = self.reached,
                link = stage.link_strength,
                collision = stage.collision_strength,
                "force stage reached"
            );
            self.reached += 1;
        }
        self.strengths()
    }

    pub(in crate::app) fn strengths(&self) -> ForceStrengths {
        self.reached
            .checked_sub(1)
            .and_then(|index| self.stages.get(index))
            .map(|stage| ForceStrengths {
                link: stage.link_strength,
                collision: stage.collision_strength,
            })
            .unwrap_or_default()
    }

    pub(in crate::app) fn phase(&self) -> u32 {
        self.phase
    }

    /// Edges stay hidden until the last stage has been reached.
    pub(in crate::app) fn edges_revealed(&self) -> bool {
        self.reached >= self.stages.len()
    }
}

/// Fades edges in once the layout has reached its final stage.
pub(in crate::app) struct EdgeFade {
    duration_secs: f64,
    started_at: Option<f64>,
}

impl EdgeFade {
    pub(in crate::app) fn new(duration_millis: u64) -> Self {
        Self {
            duration_secs: duration_millis as f64 / 1000.0,
            started_at: None,
        }
    }

    pub(in crate::app) fn observe(&mut self, revealed: bool, now: f64) {
        if !revealed {
            self.started_at = None;
        } else if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Linear reveal in `[0, 1]`; zero until edges are revealed.
    pub(in crate::app) fn progress(&self, now: f64) -> f32 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        if self.duration_secs <= 0.0 {
            return 1.0;
        }
        ((now - started_at) / self.duration_secs).clamp(0.0, 1.0) as f32
    }

    pub(in crate::app) fn is_animating(&self, now: f64) -> bool {
        self.started_at
            .is_some_and(|started_at| now - started_at < self.duration_secs)
    }
}
